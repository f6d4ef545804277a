//! # Inline Scanning
//!
//! Byte-level scanning helpers for constructs that live inside a single line.
//! The only consumer today is the table row splitter, which must know where
//! code spans begin and end so that pipes inside them are not delimiters.
//!
//! - **`cursor`**: `Cursor`, a byte scanner that can step over code spans
//! - **`kinds`**: delimiter constants (`CodeSpan`)

pub mod cursor;
pub mod kinds;

pub use cursor::Cursor;
