//! # Line Structure
//!
//! Lightweight, line-oriented recognition of the markdown structures the
//! cursor engine cares about in the text representation. This is not a
//! parser: it answers "what prefix does this line carry", "is this line
//! inside a fence" and "which table cell is this column in".
//!
//! ## Modules
//!
//! - **`kinds`**: Block-specific types with owned delimiters (BlockQuote,
//!   CodeFence, Heading, ListItem, TableRow)
//! - **`classify`**: `MarkdownLineClassifier` produces a `LineClass` per line
//! - **`fences`**: forward fence toggling and `enclosing_fence`
//! - **`tables`**: `table_at` and row/cell addressing
//!
//! ## Key Invariants
//!
//! - Fenced code lines are raw: no prefix is stripped inside a fence
//! - Row 0 of a table is its header; the separator line has no row index

pub mod classify;
pub mod fences;
pub mod kinds;
pub mod tables;

pub use classify::{LineClass, LineKind, MarkdownLineClassifier};
pub use fences::{FenceRegion, enclosing_fence, fence_regions, is_fence_delimiter};
pub use tables::{TableRegion, row_cells, table_at};
