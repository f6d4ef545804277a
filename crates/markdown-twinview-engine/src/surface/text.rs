use std::ops::Range;

use xi_rope::{Rope, delta::Builder};

use super::Surface;
use crate::parsing::rope::{LineRef, TextLines};

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// The plain-text view: an xi-rope buffer of raw markdown.
#[derive(Debug, Clone)]
pub struct TextSurface {
    buffer: Rope,
    /// Byte offsets; collapsed carets have `start == end`.
    selection: Range<usize>,
    scroll_request: Option<usize>,
    ready: bool,
    /// Incremented by user edits, not by silent replacement.
    version: u64,
}

impl TextSurface {
    pub fn new(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            selection: 0..0,
            scroll_request: None,
            ready: false,
            version: 0,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SurfaceError> {
        Ok(Self::new(std::str::from_utf8(bytes)?))
    }

    pub fn rope(&self) -> &Rope {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Line `number` (1-indexed), if it exists.
    pub fn line(&self, number: usize) -> Option<LineRef> {
        let lines = TextLines::new(&self.buffer);
        lines.get(number.checked_sub(1)?).cloned()
    }

    /// Document length in chars.
    pub fn char_count(&self) -> usize {
        self.buffer
            .iter_chunks(..)
            .map(|chunk| chunk.chars().count())
            .sum()
    }

    fn clamp(&self, offset: usize) -> usize {
        let offset = offset.min(self.buffer.len());
        self.buffer
            .at_or_prev_codepoint_boundary(offset)
            .unwrap_or(0)
    }

    /// Replaces `range` with `text` as a user edit and puts the caret after
    /// the inserted text. Returns the new caret.
    pub fn edit(&mut self, range: Range<usize>, text: &str) -> usize {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end).max(start);

        let mut builder = Builder::new(self.buffer.len());
        builder.replace(start..end, Rope::from(text));
        self.buffer = builder.build().apply(&self.buffer);

        let head = start + text.len();
        self.selection = head..head;
        self.version += 1;
        head
    }

    /// Swaps in new content without counting as an edit. The caret is
    /// clamped into the new content.
    pub fn replace_silently(&mut self, text: &str) {
        self.buffer = Rope::from(text);
        let head = self.clamp(self.selection.end);
        self.selection = head..head;
    }
}

impl Surface for TextSurface {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    fn head(&self) -> usize {
        self.selection.end
    }

    fn select(&mut self, pos: usize) {
        let pos = self.clamp(pos);
        self.selection = pos..pos;
        self.scroll_request = Some(pos);
    }

    fn take_scroll_request(&mut self) -> Option<usize> {
        self.scroll_request.take()
    }

    fn start_position(&self) -> usize {
        0
    }
}
