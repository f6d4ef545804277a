//! # Tree Representation
//!
//! The structured document model behind the rendered view.
//!
//! Positions are flat integers in the ProseMirror style: the document's
//! content starts at 0, every container and textblock costs one position
//! for its opening and one for its closing boundary, and every byte of
//! textblock text costs one position. A caret lives inside a textblock at
//! `content_start + byte_offset`.

pub mod dump;
pub mod node;

pub use node::{Alignment, Mark, MarkKind, Node, NodeKind, NodeRole};

use crate::parsing::rope::floor_char_boundary;

/// A flat position in a [`Tree`].
pub type TreePos = usize;

/// A node reached by [`Tree::walk`], with everything needed to reason
/// about its place in the document.
#[derive(Debug, Clone)]
pub struct Visit<'a> {
    pub node: &'a Node,
    /// Child indices from the document root.
    pub path: Vec<usize>,
    /// Enclosing nodes, outermost first, excluding the document root.
    pub ancestors: Vec<&'a Node>,
    /// Position of the node's opening boundary.
    pub start: TreePos,
}

impl Visit<'_> {
    /// First position inside the node.
    pub fn content_start(&self) -> TreePos {
        self.start + 1
    }

    /// Position just past the node's content.
    pub fn content_end(&self) -> TreePos {
        self.content_start() + self.node.content_size()
    }

    /// Whether a caret at `pos` lies inside this node's content (ends
    /// inclusive).
    pub fn contains(&self, pos: TreePos) -> bool {
        pos >= self.content_start() && pos <= self.content_end()
    }

    /// Whether `other` is this node or lies underneath it.
    pub fn is_ancestor_of(&self, other: &Visit<'_>) -> bool {
        other.path.starts_with(&self.path)
    }
}

/// A whole document in tree form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    root: Node,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new(vec![])
    }
}

impl Tree {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            root: Node::container(NodeKind::Document, children),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Number of positions inside the document.
    pub fn content_size(&self) -> usize {
        self.root.content_size()
    }

    /// Chars of text across all textblocks.
    pub fn char_count(&self) -> usize {
        fn go(node: &Node) -> usize {
            node.text.chars().count() + node.children.iter().map(go).sum::<usize>()
        }
        go(&self.root)
    }

    /// All nodes in document (pre-)order.
    pub fn walk(&self) -> Vec<Visit<'_>> {
        fn go<'a>(
            node: &'a Node,
            start: TreePos,
            path: &mut Vec<usize>,
            ancestors: &mut Vec<&'a Node>,
            out: &mut Vec<Visit<'a>>,
        ) {
            out.push(Visit {
                node,
                path: path.clone(),
                ancestors: ancestors.clone(),
                start,
            });
            ancestors.push(node);
            let mut child_start = start + 1;
            for (i, child) in node.children.iter().enumerate() {
                path.push(i);
                go(child, child_start, path, ancestors, out);
                path.pop();
                child_start += child.size();
            }
            ancestors.pop();
        }

        let mut out = vec![];
        let mut path = vec![];
        let mut ancestors = vec![];
        let mut start = 0;
        for (i, child) in self.root.children.iter().enumerate() {
            path.push(i);
            go(child, start, &mut path, &mut ancestors, &mut out);
            path.pop();
            start += child.size();
        }
        out
    }

    /// Every textblock in document order.
    pub fn textblocks(&self) -> Vec<Visit<'_>> {
        self.walk()
            .into_iter()
            .filter(|v| v.node.is_textblock())
            .collect()
    }

    /// The textblock whose content contains `pos`.
    pub fn textblock_at(&self, pos: TreePos) -> Option<Visit<'_>> {
        self.textblocks().into_iter().find(|v| v.contains(pos))
    }

    /// The textblock containing `pos`, or else the nearest one to it.
    pub fn nearest_textblock(&self, pos: TreePos) -> Option<Visit<'_>> {
        let blocks = self.textblocks();
        if let Some(hit) = blocks.iter().find(|v| v.contains(pos)) {
            return Some(hit.clone());
        }
        blocks.into_iter().min_by_key(|v| {
            if pos < v.content_start() {
                v.content_start() - pos
            } else {
                pos - v.content_end()
            }
        })
    }

    /// The first textblock at or under `visit`.
    pub fn first_textblock_under(&self, visit: &Visit<'_>) -> Option<Visit<'_>> {
        self.textblocks()
            .into_iter()
            .find(|v| visit.is_ancestor_of(v))
    }

    /// Where a caret goes when the document is first shown.
    pub fn start_position(&self) -> TreePos {
        self.textblocks()
            .first()
            .map(Visit::content_start)
            .unwrap_or(0)
    }

    /// Clamps `pos` to a caret position inside some textblock.
    pub fn clamp_position(&self, pos: TreePos) -> TreePos {
        match self.nearest_textblock(pos) {
            Some(v) => {
                let offset = pos.clamp(v.content_start(), v.content_end()) - v.content_start();
                v.content_start() + floor_char_boundary(&v.node.text, offset)
            }
            None => 0,
        }
    }

    fn node_at_path_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut node = &mut self.root;
        for &i in path {
            node = node.children.get_mut(i)?;
        }
        Some(node)
    }

    /// Inserts `text` at caret `pos` and returns the caret after it, or
    /// `None` when `pos` is not inside a textblock.
    pub fn insert_text(&mut self, pos: TreePos, text: &str) -> Option<TreePos> {
        let (path, content_start) = {
            let hit = self.textblock_at(pos)?;
            let content_start = hit.content_start();
            (hit.path, content_start)
        };
        let node = self.node_at_path_mut(&path)?;
        let offset = floor_char_boundary(&node.text, pos - content_start);
        node.text.insert_str(offset, text);
        node.shift_marks(offset, text.len());
        Some(content_start + offset + text.len())
    }

    /// Copies kinds and line tags from `fresh` when it has the same shape
    /// as `self`. Returns `false` (changing nothing) otherwise.
    pub fn restamp_from(&mut self, fresh: &Tree) -> bool {
        fn copy(target: &mut Node, source: &Node) {
            target.kind = source.kind.clone();
            target.source_line = source.source_line;
            for (t, s) in target.children.iter_mut().zip(&source.children) {
                copy(t, s);
            }
        }

        if !self.root.same_shape(&fresh.root) {
            return false;
        }
        copy(&mut self.root, &fresh.root);
        true
    }
}
