pub mod lines;
pub mod slice;
pub mod span;

pub use lines::{LineRef, TextLines, lines_with_spans};
pub use slice::{floor_char_boundary, preview};
pub use span::Span;
