//! # Markdown Parser/Serializer
//!
//! The pair that turns text into a [`Tree`](crate::tree::Tree) and back.
//! Parsing stamps every block with the line it came from so cursors can
//! be carried across views; serializing prints normalized markdown that
//! parses back into the same shape.
//!
//! Inline formatting lives in textblock marks, so the tree's text stays
//! the visible text while emphasis, links and code spans survive a round
//! trip.

pub mod parse;
pub mod serialize;

pub use parse::parse;
pub use serialize::serialize;
