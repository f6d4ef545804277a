use super::kinds::{BlockQuote, CodeFence, Fence, Heading, ListItem};

/// What a line of raw markdown looks like on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Paragraph,
    Heading { level: u8 },
    ListItem,
    BlockQuote,
}

/// Classification of a single line containing only local facts.
///
/// Nothing here knows about surrounding lines: whether the line sits inside
/// a fence or a table is decided by [`super::fences`] and [`super::tables`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClass {
    pub kind: LineKind,
    /// Number of blockquote `>` prefixes found.
    pub quote_depth: u8,
    /// Byte length of the structural prefix: quote markers, indentation,
    /// heading hashes, list bullet and task box. The rendered view never
    /// shows these bytes.
    pub prefix_len: usize,
    /// Byte offset where the text after quote markers begins.
    pub quote_end: usize,
    /// The fence this line would open if it is not already inside one.
    pub fence: Option<Fence>,
}

/// Classifies individual lines of the text representation.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    pub fn classify(&self, line: &str) -> LineClass {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        let (quote_depth, quote_end) = BlockQuote::strip_prefixes(trimmed);
        let rest = &trimmed[quote_end..];
        let fence = CodeFence::open(rest);

        let (kind, marker_len) = if rest.trim().is_empty() {
            (LineKind::Blank, rest.len())
        } else if let Some((level, n)) = Heading::strip_prefix(rest) {
            (LineKind::Heading { level }, n)
        } else if let Some(n) = ListItem::strip_prefix(rest) {
            (LineKind::ListItem, n)
        } else {
            let indent = rest.len() - rest.trim_start().len();
            let kind = if quote_depth > 0 {
                LineKind::BlockQuote
            } else {
                LineKind::Paragraph
            };
            (kind, indent)
        };

        LineClass {
            kind,
            quote_depth,
            prefix_len: quote_end + marker_len,
            quote_end,
            fence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::kinds::FenceKind;
    use rstest::rstest;

    #[rstest]
    #[case("plain text", LineKind::Paragraph, 0)]
    #[case("   indented", LineKind::Paragraph, 3)]
    #[case("# Title", LineKind::Heading { level: 1 }, 2)]
    #[case("## Sub", LineKind::Heading { level: 2 }, 3)]
    #[case("- item", LineKind::ListItem, 2)]
    #[case("  1. nested", LineKind::ListItem, 5)]
    #[case("- [ ] task", LineKind::ListItem, 6)]
    #[case("> quoted", LineKind::BlockQuote, 2)]
    #[case("> - quoted item", LineKind::ListItem, 4)]
    #[case("> # quoted heading", LineKind::Heading { level: 1 }, 4)]
    #[case("", LineKind::Blank, 0)]
    #[case(">   ", LineKind::Blank, 4)]
    fn classifies_prefixes(#[case] line: &str, #[case] kind: LineKind, #[case] prefix: usize) {
        let lc = MarkdownLineClassifier.classify(line);
        assert_eq!(lc.kind, kind);
        assert_eq!(lc.prefix_len, prefix);
    }

    #[test]
    fn newline_is_not_part_of_the_line() {
        let lc = MarkdownLineClassifier.classify("- item\r\n");
        assert_eq!(lc.kind, LineKind::ListItem);
        assert_eq!(lc.prefix_len, 2);
    }

    #[test]
    fn fence_inside_quote_is_detected() {
        let lc = MarkdownLineClassifier.classify("> ```rust");
        assert_eq!(lc.fence.map(|f| f.kind), Some(FenceKind::Backticks));
        assert_eq!(lc.quote_depth, 1);
        assert_eq!(lc.quote_end, 2);
    }
}
