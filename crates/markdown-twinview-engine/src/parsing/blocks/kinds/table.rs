use crate::parsing::{
    inline::{Cursor, kinds::CodeSpan},
    rope::span::Span,
};

/// One cell of a pipe table row. Both spans are byte offsets into the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Everything between the surrounding delimiters.
    pub raw: Span,
    /// `raw` with surrounding whitespace trimmed.
    pub content: Span,
}

/// GFM pipe table rows.
///
/// A `|` is a delimiter unless it is backslash-escaped or sits inside a
/// code span (a backtick run closed by a run of the same length).
pub struct TableRow;

impl TableRow {
    pub const PIPE: u8 = b'|';
    pub const ESCAPE: u8 = b'\\';

    /// Splits `line` into cells. Returns an empty vec when the line has no
    /// delimiter pipe at all.
    pub fn split(line: &str) -> Vec<Cell> {
        let delimiters = Self::delimiters(line);
        let (Some(&first), Some(&last)) = (delimiters.first(), delimiters.last()) else {
            return vec![];
        };

        let mut bounds = Vec::with_capacity(delimiters.len() + 1);
        let mut start = 0;
        for &d in &delimiters {
            bounds.push((start, d));
            start = d + 1;
        }
        bounds.push((start, line.len()));

        // Optional outer pipes leave an empty segment at either end.
        if line[..first].trim().is_empty() {
            bounds.remove(0);
        }
        if line[last + 1..].trim().is_empty() {
            bounds.pop();
        }

        bounds
            .into_iter()
            .map(|(start, end)| {
                let seg = &line[start..end];
                let lead = seg.len() - seg.trim_start().len();
                let trail = seg.len() - seg.trim_end().len();
                let content = if lead == seg.len() {
                    Span::new(start, start)
                } else {
                    Span::new(start + lead, end - trail)
                };
                Cell {
                    raw: Span::new(start, end),
                    content,
                }
            })
            .collect()
    }

    pub fn is_row(line: &str) -> bool {
        !Self::split(line).is_empty()
    }

    /// The `|---|:--:|` line between a table's header and its body.
    pub fn is_separator(line: &str) -> bool {
        let cells = Self::split(line);
        !cells.is_empty()
            && cells.iter().all(|c| {
                let t = &line[c.content.start..c.content.end];
                let t = t.strip_prefix(':').unwrap_or(t);
                let t = t.strip_suffix(':').unwrap_or(t);
                !t.is_empty() && t.bytes().all(|b| b == b'-')
            })
    }

    /// Index of the cell whose raw span contains `column`; columns past the
    /// last cell belong to it.
    pub fn cell_at_column(cells: &[Cell], column: usize) -> Option<usize> {
        if cells.is_empty() {
            return None;
        }
        Some(
            cells
                .iter()
                .position(|c| column <= c.raw.end)
                .unwrap_or(cells.len() - 1),
        )
    }

    fn delimiters(line: &str) -> Vec<usize> {
        let mut cur = Cursor::new(line);
        let mut out = vec![];
        while let Some(b) = cur.peek() {
            match b {
                Self::ESCAPE => cur.skip(2),
                CodeSpan::TICK => cur.skip_code_span(CodeSpan::TICK),
                Self::PIPE => {
                    out.push(cur.index());
                    cur.skip(1);
                }
                _ => cur.skip(1),
            }
        }
        out
    }
}

impl Cell {
    /// Offset of `column` relative to the trimmed content, clamped to it.
    pub fn offset_of(&self, column: usize) -> usize {
        column.clamp(self.content.start, self.content.end) - self.content.start
    }
}
