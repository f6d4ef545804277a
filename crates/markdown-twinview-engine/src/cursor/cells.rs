//! Table cell offsets in visible-text coordinates.
//!
//! A cell's raw markdown (`a \| **b**`) and the text the tree shows for it
//! (`a | b`) differ by escapes and inline markup. Anchors store offsets in
//! the visible text, so both views agree on them.

use crate::markdown::parse;
use crate::parsing::blocks::TableRegion;
use crate::parsing::blocks::kinds::BlockQuote;
use crate::parsing::rope::{TextLines, floor_char_boundary};
use crate::tree::NodeKind;

/// The text the tree shows for cell `col` of table line `idx`. `None` when
/// the table does not parse into a row of `cell_count` cells.
pub fn visible_cell_text(
    lines: &TextLines,
    table: &TableRegion,
    idx: usize,
    cell_count: usize,
    col: usize,
) -> Option<String> {
    let unquoted = |i: usize| {
        let content = lines.content(i);
        let (_, quote_end) = BlockQuote::strip_prefixes(content);
        content[quote_end..].to_string()
    };
    let mut source = vec![unquoted(table.header), unquoted(table.separator())];
    if idx != table.header {
        source.push(unquoted(idx));
    }

    let tree = parse(&source.join("\n"));
    let walk = tree.walk();
    let table_node = walk
        .iter()
        .find(|v| matches!(v.node.kind, NodeKind::Table { .. }))?;
    let row = table_node
        .node
        .children
        .get(usize::from(idx != table.header))?;
    if row.children.len() != cell_count {
        return None;
    }
    row.children.get(col).map(|cell| cell.text.clone())
}

/// Pairs the byte offset of each char of `visible` with the byte offset in
/// `raw` it was taken from. Raw chars with no visible counterpart (escapes,
/// delimiters) are skipped.
fn align(raw: &str, visible: &str) -> Vec<(usize, usize)> {
    let mut raw_chars = raw.char_indices();
    let mut pairs = Vec::with_capacity(visible.len());
    for (v, vc) in visible.char_indices() {
        match raw_chars.by_ref().find(|&(_, rc)| rc == vc) {
            Some((r, _)) => pairs.push((r, v)),
            None => break,
        }
    }
    pairs
}

/// Converts byte `offset` of `raw` to the matching offset in `visible`.
pub fn raw_to_visible(raw: &str, visible: &str, offset: usize) -> usize {
    let mut out = 0;
    for (r, v) in align(raw, visible) {
        if r >= offset {
            return v;
        }
        out = v + visible[v..].chars().next().map_or(0, char::len_utf8);
    }
    out
}

/// Converts byte `offset` of `visible` to the matching offset in `raw`.
pub fn visible_to_raw(raw: &str, visible: &str, offset: usize) -> usize {
    let mut out = None;
    for (r, v) in align(raw, visible) {
        if v >= offset {
            return r;
        }
        out = Some(r + raw[r..].chars().next().map_or(0, char::len_utf8));
    }
    out.unwrap_or_else(|| floor_char_boundary(raw, offset))
}
