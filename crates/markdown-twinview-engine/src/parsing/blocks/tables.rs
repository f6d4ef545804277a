use crate::parsing::rope::TextLines;

use super::kinds::{BlockQuote, Cell, TableRow};

/// A pipe table in a text buffer, as 0-based line indices.
///
/// Row numbering skips the separator: row 0 is the header line, row 1 the
/// first body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRegion {
    pub header: usize,
    /// Last body line (inclusive).
    pub end: usize,
}

impl TableRegion {
    pub fn separator(&self) -> usize {
        self.header + 1
    }

    /// Header plus body rows.
    pub fn row_count(&self) -> usize {
        self.end - self.header
    }

    pub fn line_of_row(&self, row: usize) -> usize {
        if row == 0 {
            self.header
        } else {
            self.separator() + row
        }
    }

    /// Row index of line `idx`; `None` for the separator or lines outside.
    pub fn row_of_line(&self, idx: usize) -> Option<usize> {
        if idx == self.header {
            Some(0)
        } else if idx > self.separator() && idx <= self.end {
            Some(idx - self.separator())
        } else {
            None
        }
    }
}

/// Splits line `idx` into cells with spans relative to the line start,
/// looking past any blockquote prefix.
pub fn row_cells(lines: &TextLines, idx: usize) -> Vec<Cell> {
    let content = lines.content(idx);
    let (_, quote_end) = BlockQuote::strip_prefixes(content);
    TableRow::split(&content[quote_end..])
        .into_iter()
        .map(|c| Cell {
            raw: c.raw.offset_by(quote_end),
            content: c.content.offset_by(quote_end),
        })
        .collect()
}

fn is_row(lines: &TextLines, idx: usize) -> bool {
    idx < lines.len() && !lines.content(idx).trim().is_empty() && !row_cells(lines, idx).is_empty()
}

fn is_separator(lines: &TextLines, idx: usize) -> bool {
    if idx >= lines.len() {
        return false;
    }
    let content = lines.content(idx);
    let (_, quote_end) = BlockQuote::strip_prefixes(content);
    TableRow::is_separator(&content[quote_end..])
}

/// The table that line `idx` belongs to, if any. The separator line counts
/// as part of the table.
pub fn table_at(lines: &TextLines, idx: usize) -> Option<TableRegion> {
    if !is_row(lines, idx) {
        return None;
    }

    let mut start = idx;
    while start > 0 && is_row(lines, start - 1) {
        start -= 1;
    }

    let header = (start..=idx).rev().find(|&h| is_separator(lines, h + 1))?;
    if is_separator(lines, header) {
        return None;
    }

    let mut end = header + 1;
    while is_row(lines, end + 1) {
        end += 1;
    }

    Some(TableRegion { header, end })
}
