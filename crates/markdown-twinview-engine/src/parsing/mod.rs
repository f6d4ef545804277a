//! # Text Representation Parsing
//!
//! Line-level recognition over an xi-rope buffer. The full markdown parser
//! lives in [`crate::markdown`]; this module only knows enough syntax to map
//! a caret in raw text onto markup-free coordinates and back.
//!
//! ## Modules
//!
//! - **`rope`**: spans, line tables and slicing helpers over `xi_rope::Rope`
//! - **`blocks`**: per-line classification, fences and tables
//! - **`inline`**: byte cursor used by the table row splitter

pub mod blocks;
pub mod inline;
pub mod rope;

use blocks::{LineClass, MarkdownLineClassifier, enclosing_fence};
use rope::TextLines;

/// How the caret-relevant part of a raw line is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLayout {
    /// Local facts about the line.
    pub class: LineClass,
    /// Bytes at the start of the line that the rendered view does not show.
    /// Zero inside fenced code.
    pub prefix_len: usize,
    /// Whether the line is a content line of a fenced code block.
    pub in_fence: bool,
}

/// Describes line `idx` of `lines`, taking enclosing fences into account.
pub fn line_layout(lines: &TextLines, idx: usize) -> LineLayout {
    let class = MarkdownLineClassifier.classify(lines.content(idx));
    let in_fence = enclosing_fence(lines, idx).is_some();
    let prefix_len = if in_fence {
        // Only blockquote markers are structural inside a quoted fence.
        class.quote_end
    } else {
        class.prefix_len
    };
    LineLayout {
        class,
        prefix_len,
        in_fence,
    }
}
