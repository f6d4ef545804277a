use super::Surface;
use crate::tree::{Tree, TreePos};

/// The rendered view: a [`Tree`] with a caret position.
#[derive(Debug, Clone, Default)]
pub struct TreeSurface {
    tree: Tree,
    selection: TreePos,
    scroll_request: Option<TreePos>,
    ready: bool,
    version: u64,
}

impl TreeSurface {
    pub fn new(tree: Tree) -> Self {
        Self {
            tree,
            ..Self::default()
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Inserts `text` at `pos` as a user edit. Returns the new caret, or
    /// `None` if `pos` is not inside a textblock.
    pub fn insert_text(&mut self, pos: TreePos, text: &str) -> Option<TreePos> {
        let head = self.tree.insert_text(pos, text)?;
        self.selection = head;
        self.version += 1;
        Some(head)
    }

    /// Swaps in a new tree without counting as an edit.
    pub fn replace_silently(&mut self, tree: Tree) {
        self.tree = tree;
        self.selection = self.tree.clamp_position(self.selection);
    }

    /// Refreshes line tags from a fresh parse of the same content. Returns
    /// `false`, leaving the tree alone, when the shapes differ.
    pub fn restamp(&mut self, fresh: &Tree) -> bool {
        self.tree.restamp_from(fresh)
    }
}

impl Surface for TreeSurface {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    fn head(&self) -> usize {
        self.selection
    }

    fn select(&mut self, pos: usize) {
        self.selection = self.tree.clamp_position(pos);
        self.scroll_request = Some(self.selection);
    }

    fn take_scroll_request(&mut self) -> Option<usize> {
        self.scroll_request.take()
    }

    fn start_position(&self) -> usize {
        self.tree.start_position()
    }
}
