use crate::parsing::rope::TextLines;

use super::{
    classify::MarkdownLineClassifier,
    kinds::Fence,
};

/// A fenced code block in a text buffer, as 0-based line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceRegion {
    pub fence: Fence,
    /// The opening fence line.
    pub open: usize,
    /// The closing fence line; `None` for a fence left open at EOF.
    pub close: Option<usize>,
}

impl FenceRegion {
    /// Whether line `idx` is a content line of this block (strictly between
    /// the fences).
    pub fn contains(&self, idx: usize) -> bool {
        idx > self.open && self.close.is_none_or(|c| idx < c)
    }

    /// Last content line, or `None` for an empty block.
    pub fn last_content_line(&self, total_lines: usize) -> Option<usize> {
        let end = self.close.unwrap_or(total_lines);
        (end > self.open + 1).then(|| end - 1)
    }
}

/// Scans the whole buffer and returns every fenced block in order.
///
/// Fences are toggled forward from the top of the document so that an
/// opener is never mistaken for a closer.
pub fn fence_regions(lines: &TextLines) -> Vec<FenceRegion> {
    let classifier = MarkdownLineClassifier;
    let mut out = vec![];
    let mut open: Option<(usize, Fence)> = None;

    for (idx, line) in lines.iter().enumerate() {
        let lc = classifier.classify(line.content());
        let rest = &line.content()[lc.quote_end..];
        match open {
            Some((start, fence)) => {
                if fence.is_closed_by(rest) {
                    out.push(FenceRegion {
                        fence,
                        open: start,
                        close: Some(idx),
                    });
                    open = None;
                }
            }
            None => {
                if let Some(fence) = lc.fence {
                    open = Some((idx, fence));
                }
            }
        }
    }

    if let Some((start, fence)) = open {
        out.push(FenceRegion {
            fence,
            open: start,
            close: None,
        });
    }
    out
}

/// The fenced block whose content contains line `idx`, if any. Fence
/// delimiter lines themselves are not inside a block.
pub fn enclosing_fence(lines: &TextLines, idx: usize) -> Option<FenceRegion> {
    fence_regions(lines)
        .into_iter()
        .take_while(|r| r.open < idx)
        .find(|r| r.contains(idx))
}

/// Whether line `idx` is an opening or closing fence line.
pub fn is_fence_delimiter(lines: &TextLines, idx: usize) -> bool {
    fence_regions(lines)
        .iter()
        .any(|r| r.open == idx || r.close == Some(idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::kinds::FenceKind;

    #[test]
    fn finds_closed_region() {
        let lines = TextLines::from_text("a\n```\nx\ny\n```\nb");
        let regions = fence_regions(&lines);
        assert_eq!(
            regions,
            vec![FenceRegion {
                fence: Fence {
                    kind: FenceKind::Backticks,
                    len: 3,
                },
                open: 1,
                close: Some(4),
            }]
        );
    }

    #[test]
    fn enclosing_fence_only_for_content_lines() {
        let lines = TextLines::from_text("a\n```\nx\ny\n```\nb");
        assert_eq!(enclosing_fence(&lines, 0), None);
        assert_eq!(enclosing_fence(&lines, 1), None);
        assert_eq!(enclosing_fence(&lines, 2).map(|r| r.open), Some(1));
        assert_eq!(enclosing_fence(&lines, 3).map(|r| r.open), Some(1));
        assert_eq!(enclosing_fence(&lines, 4), None);
        assert_eq!(enclosing_fence(&lines, 5), None);
    }

    #[test]
    fn unterminated_fence_runs_to_eof() {
        let lines = TextLines::from_text("```\ncode\nmore");
        let region = enclosing_fence(&lines, 2).unwrap();
        assert_eq!(region.close, None);
        assert_eq!(region.last_content_line(lines.len()), Some(2));
    }

    #[test]
    fn tilde_does_not_close_backticks() {
        let lines = TextLines::from_text("```\n~~~\nstill code\n```");
        assert_eq!(enclosing_fence(&lines, 2).map(|r| r.open), Some(0));
    }

    #[test]
    fn fence_with_info_string_inside_block_does_not_close() {
        let lines = TextLines::from_text("```\n```rust\ninside\n```");
        assert_eq!(enclosing_fence(&lines, 2).map(|r| r.open), Some(0));
    }

    #[test]
    fn empty_block_has_no_content_line() {
        let lines = TextLines::from_text("```\n```");
        let regions = fence_regions(&lines);
        assert_eq!(regions[0].last_content_line(lines.len()), None);
        assert!(is_fence_delimiter(&lines, 0));
        assert!(is_fence_delimiter(&lines, 1));
    }

    #[test]
    fn short_closer_does_not_close_long_fence() {
        let lines = TextLines::from_text("````\n```\nstill code\n````");
        assert_eq!(enclosing_fence(&lines, 2).map(|r| r.open), Some(0));
        assert_eq!(fence_regions(&lines)[0].close, Some(3));
    }

    #[test]
    fn quoted_fence() {
        let lines = TextLines::from_text("> ```\n> code\n> ```");
        assert_eq!(enclosing_fence(&lines, 1).map(|r| r.open), Some(0));
    }
}
