//! Resolving [`BlockAnchor`]s against the current content of either
//! representation. Every resolver returns `None` when the structure the
//! anchor points into is gone, and the caller falls back to line matching.

use super::cells::{visible_cell_text, visible_to_raw};
use super::info::BlockAnchor;
use crate::parsing::blocks::{fence_regions, row_cells, table_at};
use crate::parsing::line_layout;
use crate::parsing::rope::{TextLines, floor_char_boundary};
use crate::tree::{NodeKind, Tree, TreePos, Visit};

/// Clamps a row or column index to a structure that now has `len` entries.
pub fn clamp_index(index: usize, len: usize) -> Option<usize> {
    (len > 0).then(|| index.min(len - 1))
}

/// Resolves `anchor` near 0-based line `approx` of a text buffer to a byte
/// offset.
pub fn resolve_in_text(anchor: &BlockAnchor, lines: &TextLines, approx: usize) -> Option<usize> {
    match *anchor {
        BlockAnchor::Code {
            line_in_block,
            column_in_line,
        } => {
            // The fence opening at or before `approx` that is still open there.
            let fence = fence_regions(lines)
                .into_iter()
                .take_while(|r| r.open <= approx)
                .filter(|r| r.close.is_none_or(|c| approx <= c))
                .last()?;
            let last = fence.last_content_line(lines.len())?;
            let target = (fence.open + 1 + line_in_block).min(last);

            let line = lines.get(target)?;
            let content = line.content();
            let prefix = line_layout(lines, target).prefix_len.min(content.len());
            let column = floor_char_boundary(content, prefix + column_in_line);
            Some(line.span.start + column)
        }
        BlockAnchor::Table {
            row,
            col,
            offset_in_cell,
        } => {
            let table = table_at(lines, approx)?;
            table.row_of_line(approx)?;
            let row = clamp_index(row, table.row_count())?;
            let idx = table.line_of_row(row);
            let cells = row_cells(lines, idx);
            let col = clamp_index(col, cells.len())?;
            let cell = cells[col];

            let line = lines.get(idx)?;
            let raw = &line.content()[cell.content.start..cell.content.end];
            let visible = visible_cell_text(lines, &table, idx, cells.len(), col)
                .unwrap_or_else(|| raw.to_string());
            let offset_in_cell = offset_in_cell.min(visible.len());
            let offset = cell.content.start + visible_to_raw(raw, &visible, offset_in_cell);
            Some(line.span.start + floor_char_boundary(line.content(), offset))
        }
    }
}

/// Last line a tree node covers in the text, closing fence included.
fn last_line(visit: &Visit<'_>, tree: &Tree) -> Option<usize> {
    let node = visit.node;
    match node.kind {
        NodeKind::CodeBlock { fenced, .. } => node
            .segment_line(node.segment_count() - 1)
            .map(|l| l + usize::from(fenced)),
        _ => tree
            .walk()
            .iter()
            .filter(|v| visit.is_ancestor_of(v))
            .filter_map(|v| v.node.source_line)
            .max(),
    }
}

/// The last node matching `pred` whose lines include `approx_line`.
fn enclosing<'a>(
    tree: &'a Tree,
    approx_line: usize,
    pred: impl Fn(&NodeKind) -> bool,
) -> Option<Visit<'a>> {
    tree.walk()
        .into_iter()
        .filter(|v| pred(&v.node.kind))
        .filter(|v| v.node.source_line.is_some_and(|l| l <= approx_line))
        .filter(|v| last_line(v, tree).is_some_and(|l| approx_line <= l))
        .last()
}

/// Resolves `anchor` near 1-indexed `approx_line` of a tree.
pub fn resolve_in_tree(anchor: &BlockAnchor, tree: &Tree, approx_line: usize) -> Option<TreePos> {
    match *anchor {
        BlockAnchor::Code {
            line_in_block,
            column_in_line,
        } => {
            let block = enclosing(tree, approx_line, |k| {
                matches!(k, NodeKind::CodeBlock { .. })
            })?;
            let node = block.node;
            let segment = clamp_index(line_in_block, node.segment_count())?;
            let range = node.segment_range(segment)?;
            let column = column_in_line.min(range.len());
            let offset = floor_char_boundary(&node.text, range.start + column);
            Some(block.content_start() + offset)
        }
        BlockAnchor::Table {
            row,
            col,
            offset_in_cell,
        } => {
            let table = enclosing(tree, approx_line, |k| matches!(k, NodeKind::Table { .. }))?;
            let row = clamp_index(row, table.node.children.len())?;
            let col = clamp_index(col, table.node.children[row].children.len())?;

            let mut path = table.path.clone();
            path.extend([row, col]);
            let cell = tree.textblocks().into_iter().find(|v| v.path == path)?;
            let offset = floor_char_boundary(&cell.node.text, offset_in_cell);
            Some(cell.content_start() + offset)
        }
    }
}
