use serde::{Deserialize, Serialize};

/// Coarse structure at the cursor. Only ever used as a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Paragraph,
    Heading,
    ListItem,
    CodeBlock,
    TableCell,
    Blockquote,
}

/// Position relative to a fenced code block or a table, which survives
/// edits that shift the surrounding lines or change the cell's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BlockAnchor {
    #[serde(rename_all = "camelCase")]
    Code {
        /// 0-based line inside the block's content.
        line_in_block: usize,
        /// Byte column inside that line.
        column_in_line: usize,
    },
    #[serde(rename_all = "camelCase")]
    Table {
        /// 0 is the header row, 1 the first body row.
        row: usize,
        col: usize,
        /// Byte offset inside the cell's trimmed content.
        offset_in_cell: usize,
    },
}

/// A portable description of where the cursor is.
///
/// Built fresh by each extraction and consumed by one relocation. All text
/// fields are measured against markup-free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorInfo {
    /// 1-indexed line of the text representation.
    pub source_line: usize,
    pub node_type: NodeType,
    pub word_at_cursor: String,
    pub offset_in_word: usize,
    pub context_before: String,
    pub context_after: String,
    /// Cursor offset over line length, in `[0, 1]`.
    pub percent_in_line: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_anchor: Option<BlockAnchor>,
}

impl Default for CursorInfo {
    fn default() -> Self {
        Self {
            source_line: 1,
            node_type: NodeType::Paragraph,
            word_at_cursor: String::new(),
            offset_in_word: 0,
            context_before: String::new(),
            context_after: String::new(),
            percent_in_line: 0.0,
            block_anchor: None,
        }
    }
}

impl CursorInfo {
    /// Combined length of both context windows, in characters.
    pub fn context_len(&self) -> usize {
        self.context_before.chars().count() + self.context_after.chars().count()
    }
}
