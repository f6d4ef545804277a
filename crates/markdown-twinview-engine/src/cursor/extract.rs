//! Building a [`CursorInfo`] from a caret in either representation.

use markdown_twinview_config::SyncConfig;
use xi_rope::Rope;

use super::cells::{raw_to_visible, visible_cell_text};
use super::info::{BlockAnchor, CursorInfo, NodeType};
use super::words::{context_around, word_at};
use crate::parsing::blocks::kinds::TableRow;
use crate::parsing::blocks::{LineKind, enclosing_fence, is_fence_delimiter, row_cells, table_at};
use crate::parsing::line_layout;
use crate::parsing::rope::{TextLines, floor_char_boundary};
use crate::tree::{NodeKind, Tree, TreePos};

/// Fills in the word, context and percent fields for a caret at byte
/// `column` of the markup-free `text`.
fn describe(
    source_line: usize,
    node_type: NodeType,
    text: &str,
    column: usize,
    block_anchor: Option<BlockAnchor>,
    config: &SyncConfig,
) -> CursorInfo {
    let column = floor_char_boundary(text, column);
    let (word_at_cursor, offset_in_word) = word_at(text, column)
        .map(|w| (w.word, w.offset))
        .unwrap_or_default();
    let (context_before, context_after) = context_around(text, column, config.context_window);
    let percent_in_line = if text.is_empty() {
        0.0
    } else {
        column as f64 / text.len() as f64
    };

    CursorInfo {
        source_line: source_line.max(1),
        node_type,
        word_at_cursor,
        offset_in_word,
        context_before,
        context_after,
        percent_in_line,
        block_anchor,
    }
}

/// Describes the caret at byte `offset` of a raw markdown buffer.
pub fn extract_from_text(rope: &Rope, offset: usize, config: &SyncConfig) -> CursorInfo {
    let lines = TextLines::new(rope);
    let offset = offset.min(rope.len());
    let idx = lines.index_of_offset(offset);
    let source_line = idx + 1;
    let content = lines.content(idx);
    let line_start = lines.get(idx).map_or(0, |l| l.span.start);
    let column = floor_char_boundary(content, offset.saturating_sub(line_start));

    let layout = line_layout(&lines, idx);
    let prefix = layout.prefix_len.min(content.len());
    let stripped = &content[prefix..];
    let stripped_column = column.saturating_sub(prefix);

    if layout.in_fence
        && let Some(fence) = enclosing_fence(&lines, idx)
    {
        let anchor = BlockAnchor::Code {
            line_in_block: idx - fence.open - 1,
            column_in_line: stripped_column,
        };
        return describe(
            source_line,
            NodeType::CodeBlock,
            stripped,
            stripped_column,
            Some(anchor),
            config,
        );
    }

    if is_fence_delimiter(&lines, idx) {
        return describe(
            source_line,
            NodeType::CodeBlock,
            stripped,
            stripped_column,
            None,
            config,
        );
    }

    if let Some(table) = table_at(&lines, idx)
        && let Some(row) = table.row_of_line(idx)
    {
        let cells = row_cells(&lines, idx);
        if let Some(col) = TableRow::cell_at_column(&cells, column) {
            let cell = cells[col];
            let raw = &content[cell.content.start..cell.content.end];
            let visible = visible_cell_text(&lines, &table, idx, cells.len(), col)
                .unwrap_or_else(|| raw.to_string());
            let offset_in_cell = raw_to_visible(raw, &visible, cell.offset_of(column));
            let anchor = BlockAnchor::Table {
                row,
                col,
                offset_in_cell,
            };
            return describe(
                source_line,
                NodeType::TableCell,
                &visible,
                offset_in_cell,
                Some(anchor),
                config,
            );
        }
    }

    let node_type = match layout.class.kind {
        LineKind::Heading { .. } => NodeType::Heading,
        LineKind::ListItem => NodeType::ListItem,
        _ if layout.class.quote_depth > 0 => NodeType::Blockquote,
        _ => NodeType::Paragraph,
    };
    describe(
        source_line,
        node_type,
        stripped,
        stripped_column,
        None,
        config,
    )
}

fn classify(kind: &NodeKind) -> Option<NodeType> {
    match kind {
        NodeKind::Heading { .. } => Some(NodeType::Heading),
        NodeKind::CodeBlock { .. } => Some(NodeType::CodeBlock),
        NodeKind::TableCell => Some(NodeType::TableCell),
        NodeKind::ListItem { .. } => Some(NodeType::ListItem),
        NodeKind::BlockQuote { .. } => Some(NodeType::Blockquote),
        NodeKind::Document
        | NodeKind::Paragraph
        | NodeKind::HtmlBlock
        | NodeKind::ThematicBreak
        | NodeKind::List { .. }
        | NodeKind::Table { .. }
        | NodeKind::TableRow { .. } => None,
    }
}

/// Describes the caret at `pos` of a tree. Positions outside any textblock
/// are first moved into the nearest one.
pub fn extract_from_tree(tree: &Tree, pos: TreePos, config: &SyncConfig) -> CursorInfo {
    let pos = tree.clamp_position(pos);
    let Some(block) = tree.textblock_at(pos) else {
        return CursorInfo::default();
    };
    let node = block.node;
    let offset = floor_char_boundary(&node.text, pos - block.content_start());

    let head = &node.text[..offset];
    let segment = head.matches('\n').count();
    let segment_start = head.rfind('\n').map_or(0, |i| i + 1);
    let segment_text = node.text[segment_start..]
        .split('\n')
        .next()
        .unwrap_or_default();
    let column = offset - segment_start;

    let source_line = node
        .segment_line(segment)
        .or_else(|| block.ancestors.iter().rev().find_map(|a| a.source_line))
        .or_else(|| {
            tree.walk()
                .iter()
                .take_while(|v| v.start <= pos)
                .filter_map(|v| v.node.source_line)
                .last()
        })
        .unwrap_or(1);

    let node_type = std::iter::once(node)
        .chain(block.ancestors.iter().rev().copied())
        .find_map(|n| classify(&n.kind))
        .unwrap_or(NodeType::Paragraph);

    let block_anchor = match node.kind {
        NodeKind::CodeBlock { .. } => Some(BlockAnchor::Code {
            line_in_block: segment,
            column_in_line: column,
        }),
        NodeKind::TableCell => match block.path.as_slice() {
            [.., row, col] => Some(BlockAnchor::Table {
                row: *row,
                col: *col,
                offset_in_cell: column,
            }),
            _ => None,
        },
        _ => None,
    };

    describe(
        source_line,
        node_type,
        segment_text,
        column,
        block_anchor,
        config,
    )
}
