pub mod cursor;
pub mod markdown;
pub mod parsing;
pub mod surface;
pub mod sync;
pub mod tree;

// Re-export key types for easier usage
pub use cursor::{
    BlockAnchor, CursorInfo, Located, NodeType, extract_from_text, extract_from_tree,
    locate_in_text, locate_in_tree,
};
pub use markdown::{parse, serialize};
pub use markdown_twinview_config::SyncConfig;
pub use surface::{Surface, SurfaceError, TextSurface, TreeSurface, View};
pub use sync::SyncCoordinator;
pub use tree::{Mark, MarkKind, Node, NodeKind, Tree, TreePos};
