//! # Cursor Synchronization Core
//!
//! Captures where the cursor is in one representation as a portable
//! [`CursorInfo`] and relocates it in the other.
//!
//! - **`extract`**: caret → `CursorInfo`, for raw text and for trees
//! - **`locate`**: `CursorInfo` → caret, with layered matching
//! - **`anchor`**: code block and table coordinates
//! - **`cells`**: table cell offsets between raw and visible text
//! - **`column`**: end-of-line, context, word and percent matching
//! - **`words`**: UAX #29 word lookup and context windows

pub mod anchor;
pub mod cells;
pub mod column;
pub mod extract;
pub mod info;
pub mod locate;
pub mod words;

pub use column::ColumnMatch;
pub use extract::{extract_from_text, extract_from_tree};
pub use info::{BlockAnchor, CursorInfo, NodeType};
pub use locate::{LineMatch, Located, locate_in_text, locate_in_tree};
