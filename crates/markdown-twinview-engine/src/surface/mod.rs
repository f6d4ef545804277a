//! # Editing Surfaces
//!
//! Minimal models of the two live views. Each holds a working copy of the
//! document, a collapsed selection, a pending scroll request and a `ready`
//! flag that is false until the view's first materialization completes.

pub mod text;
pub mod tree;

pub use text::{SurfaceError, TextSurface};
pub use tree::TreeSurface;

/// Which representation a surface shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Tree,
    Text,
}

/// What the coordinator needs from either surface regardless of its
/// addressing scheme. Positions are in the surface's own coordinates.
pub trait Surface {
    fn is_ready(&self) -> bool;
    fn set_ready(&mut self, ready: bool);
    /// Current caret position.
    fn head(&self) -> usize;
    /// Collapses the selection to `pos` (clamped) and asks the host to
    /// scroll it into view.
    fn select(&mut self, pos: usize);
    /// The position the host should scroll to, if one was requested since
    /// the last call.
    fn take_scroll_request(&mut self) -> Option<usize>;
    /// Where a caret goes on a fresh load.
    fn start_position(&self) -> usize;
}
