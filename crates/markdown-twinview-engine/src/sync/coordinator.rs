use std::ops::Range;
use std::time::Instant;

use log::{debug, trace, warn};
use markdown_twinview_config::SyncConfig;
use serde::Serialize;

use super::store::DocumentStore;
use super::task::{Deadline, Task};
use crate::cursor::{
    ColumnMatch, CursorInfo, LineMatch, Located, extract_from_text, extract_from_tree,
    locate_in_text, locate_in_tree,
};
use crate::markdown::{parse, serialize};
use crate::surface::{Surface, SurfaceError, TextSurface, TreeSurface, View};
use crate::tree::TreePos;

/// What happens to the cursor once the active surface reports ready.
#[derive(Debug, Clone, PartialEq)]
enum PendingCursor {
    Relocate(CursorInfo),
    DocumentStart,
}

/// The outcome of the most recent cursor placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Relocation {
    pub view: View,
    pub located: Located,
}

/// Moves content and cursor between the two surfaces and the store.
///
/// Only the active surface is mounted. Its edits are flushed to the store
/// on the next frame, or after a size-dependent debounce; switching views
/// captures the cursor on the outgoing surface and relocates it on the
/// incoming one once that surface is ready.
pub struct SyncCoordinator {
    config: SyncConfig,
    store: DocumentStore,
    text: TextSurface,
    tree: TreeSurface,
    active: View,
    mounted: Option<View>,
    flush: Task,
    /// Set from our own store write until the host goes idle.
    local_write: bool,
    /// Store version produced by our latest flush. Notifications up to it
    /// are our own.
    flushed_version: u64,
    /// The active surface has edits the store has not seen.
    dirty: bool,
    /// The user (or a relocation) has placed the cursor since load.
    has_cursor_state: bool,
    pending: Option<PendingCursor>,
    last_relocation: Option<Relocation>,
}

impl SyncCoordinator {
    /// Loads `text` and shows it in `view`, with the cursor at document
    /// start.
    pub fn new(text: &str, view: View, config: SyncConfig) -> Self {
        let store = DocumentStore::new(text);
        let mut coordinator = Self {
            config,
            flushed_version: store.version(),
            store,
            text: TextSurface::new(""),
            tree: TreeSurface::default(),
            active: view,
            mounted: None,
            flush: Task::new("flush"),
            local_write: false,
            dirty: false,
            has_cursor_state: false,
            pending: None,
            last_relocation: None,
        };
        coordinator.mount(view);
        coordinator.mark_ready(view);
        coordinator
    }

    pub fn from_bytes(bytes: &[u8], view: View, config: SyncConfig) -> Result<Self, SurfaceError> {
        Ok(Self::new(std::str::from_utf8(bytes)?, view, config))
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Direct store access for writers other than this coordinator. Their
    /// changes are picked up by [`Self::handle_store_changes`].
    pub fn store_mut(&mut self) -> &mut DocumentStore {
        &mut self.store
    }

    pub fn text_surface(&self) -> &TextSurface {
        &self.text
    }

    pub fn tree_surface(&self) -> &TreeSurface {
        &self.tree
    }

    pub fn active_view(&self) -> View {
        self.active
    }

    pub fn mounted_view(&self) -> Option<View> {
        self.mounted
    }

    pub fn is_local_write(&self) -> bool {
        self.local_write
    }

    pub fn flush_deadline(&self) -> Option<Deadline> {
        self.flush.deadline()
    }

    pub fn last_relocation(&self) -> Option<&Relocation> {
        self.last_relocation.as_ref()
    }

    fn surface(&self, view: View) -> &dyn Surface {
        match view {
            View::Text => &self.text,
            View::Tree => &self.tree,
        }
    }

    fn surface_mut(&mut self, view: View) -> &mut dyn Surface {
        match view {
            View::Text => &mut self.text,
            View::Tree => &mut self.tree,
        }
    }

    fn is_live(&self, view: View) -> bool {
        self.mounted == Some(view) && self.surface(view).is_ready()
    }

    /// Caret of the active surface.
    pub fn head(&self) -> usize {
        self.surface(self.active).head()
    }

    /// Scroll target the host should honour for the active surface.
    pub fn take_scroll_request(&mut self) -> Option<usize> {
        self.surface_mut(self.active).take_scroll_request()
    }

    /// Moves the caret of the active surface, as a user click would.
    pub fn select(&mut self, pos: usize) {
        self.surface_mut(self.active).select(pos);
        self.has_cursor_state = true;
    }

    /// Describes the cursor of the active surface.
    pub fn capture_cursor(&self) -> CursorInfo {
        match self.active {
            View::Text => extract_from_text(self.text.rope(), self.text.head(), &self.config),
            View::Tree => extract_from_tree(self.tree.tree(), self.tree.head(), &self.config),
        }
    }

    /// Places the cursor of the active surface at the spot `info` describes,
    /// or queues it until the surface is ready.
    pub fn relocate_cursor(&mut self, info: CursorInfo) {
        let view = self.active;
        if !self.is_live(view) {
            debug!(
                "{view:?} is not ready, deferring relocation to line {}",
                info.source_line
            );
            self.pending = Some(PendingCursor::Relocate(info));
            return;
        }

        let located = match view {
            View::Text => locate_in_text(&info, self.text.rope(), &self.config),
            View::Tree => locate_in_tree(&info, self.tree.tree(), &self.config),
        };
        debug!(
            "relocated line {} in {view:?}: {:?}/{:?} at {}",
            info.source_line, located.line_match, located.column_match, located.position
        );
        self.surface_mut(view).select(located.position);
        self.has_cursor_state = true;
        self.last_relocation = Some(Relocation { view, located });
    }

    fn place_at_start(&mut self) {
        let view = self.active;
        let position = self.surface(view).start_position();
        self.surface_mut(view).select(position);
        debug!("placed cursor at document start of {view:?}");
        self.last_relocation = Some(Relocation {
            view,
            located: Located {
                position,
                line_match: LineMatch::DocumentStart,
                column_match: ColumnMatch::None,
            },
        });
    }

    /// Replaces the document with externally supplied content, keeping the
    /// cursor where it was. Unflushed local edits are superseded.
    pub fn synchronize_content(&mut self, new_text: &str) {
        self.store.write(new_text);
        self.store.drain_changes();
        self.reload();
    }

    /// Handles queued store notifications. Notifications caused by our own
    /// flush are dropped; any newer one reloads the active surface.
    pub fn handle_store_changes(&mut self) {
        let changes = self.store.drain_changes();
        if changes.is_empty() {
            return;
        }
        let own = self.flushed_version;
        if changes.iter().all(|change| change.version <= own) {
            debug!(
                "ignoring {} store change(s) from our own flush",
                changes.len()
            );
            return;
        }
        if self.local_write {
            debug!("store changed under our local write, reloading");
        }
        self.reload();
    }

    fn reload(&mut self) {
        if self.flush.cancel() || self.dirty {
            warn!("discarding unflushed edits superseded by new store content");
        }
        self.dirty = false;

        let view = self.active;
        if self.mounted != Some(view) {
            trace!("no surface mounted, content will load on mount");
            return;
        }
        if !self.surface(view).is_ready() {
            self.materialize(view);
            return;
        }

        let info = self.has_cursor_state.then(|| self.capture_cursor());
        self.materialize(view);
        match info {
            Some(info) => self.relocate_cursor(info),
            None => self.place_at_start(),
        }
    }

    /// Rebuilds `view`'s working copy from the store without notifying.
    fn materialize(&mut self, view: View) {
        match view {
            View::Text => self.text.replace_silently(self.store.text()),
            View::Tree => self.tree.replace_silently(parse(self.store.text())),
        }
    }

    /// Applies a user edit to the text surface. Returns the new caret, or
    /// `None` when the text surface is not the live one.
    pub fn edit_text(&mut self, range: Range<usize>, text: &str, now: Instant) -> Option<usize> {
        if self.active != View::Text || !self.is_live(View::Text) {
            warn!("text edit ignored while {:?} is active", self.active);
            return None;
        }
        let head = self.text.edit(range, text);
        self.note_edit(now);
        Some(head)
    }

    /// Applies a user edit to the tree surface. Returns the new caret, or
    /// `None` when the tree surface is not live or `pos` is not in text.
    pub fn edit_tree(&mut self, pos: TreePos, text: &str, now: Instant) -> Option<TreePos> {
        if self.active != View::Tree || !self.is_live(View::Tree) {
            warn!("tree edit ignored while {:?} is active", self.active);
            return None;
        }
        let head = self.tree.insert_text(pos, text)?;
        self.note_edit(now);
        Some(head)
    }

    fn note_edit(&mut self, now: Instant) {
        self.has_cursor_state = true;
        self.dirty = true;
        let len = match self.active {
            View::Text => self.text.char_count(),
            View::Tree => self.tree.tree().char_count(),
        };
        let deadline = self
            .config
            .debounce_for(len)
            .map_or(Deadline::NextFrame, |delay| Deadline::At(now + delay));
        self.flush.arm(deadline);
    }

    /// Frame callback from the host: runs a flush that has come due.
    pub fn on_frame(&mut self, now: Instant) {
        if self.flush.take_due(now) {
            self.flush_now();
        }
    }

    /// Idle callback from the host: ends the local-write window.
    pub fn on_idle(&mut self) {
        if self.local_write {
            trace!("local write window closed");
            self.local_write = false;
        }
    }

    /// Writes pending edits of the active surface to the store right away.
    pub fn flush_now(&mut self) {
        self.flush.cancel();
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let content = match self.active {
            View::Text => self.text.text(),
            View::Tree => serialize(self.tree.tree()),
        };
        self.local_write = true;
        let version = self.store.write(&content);
        self.flushed_version = version;
        trace!(
            "flushed {} bytes from {:?} as version {version}",
            content.len(),
            self.active
        );
        self.handle_store_changes();

        if self.active == View::Tree {
            self.restamp_tree();
        }
    }

    /// Points the tree's line tags at the freshly flushed text.
    fn restamp_tree(&mut self) {
        let fresh = parse(self.store.text());
        if self.tree.restamp(&fresh) {
            return;
        }
        warn!("flushed tree parses back to a different shape, rebuilding it");
        let info = self.capture_cursor();
        self.tree.replace_silently(fresh);
        self.relocate_cursor(info);
    }

    /// Shows `view`'s surface. Its content is rebuilt from the store and it
    /// stays not-ready until [`Self::mark_ready`].
    pub fn mount(&mut self, view: View) {
        if let Some(current) = self.mounted
            && current != view
        {
            self.unmount(current);
        }
        self.active = view;
        self.materialize(view);
        self.surface_mut(view).set_ready(false);
        self.mounted = Some(view);
        if self.pending.is_none() && !self.has_cursor_state {
            self.pending = Some(PendingCursor::DocumentStart);
        }
        debug!("mounted {view:?}");
    }

    /// Tears down `view`'s surface: pending edits are flushed, its pending
    /// callbacks cancelled and its cursor kept for the next mount.
    pub fn unmount(&mut self, view: View) {
        if self.mounted != Some(view) {
            return;
        }
        self.flush_now();
        if self.is_live(view) && self.has_cursor_state && self.pending.is_none() {
            self.pending = Some(PendingCursor::Relocate(self.capture_cursor()));
        }
        self.surface_mut(view).set_ready(false);
        self.mounted = None;
        debug!("unmounted {view:?}");
    }

    /// Signals that `view` finished materializing; runs any deferred
    /// relocation.
    pub fn mark_ready(&mut self, view: View) {
        if self.mounted != Some(view) {
            debug!("ready signal from unmounted {view:?} ignored");
            return;
        }
        self.surface_mut(view).set_ready(true);
        match self.pending.take() {
            Some(PendingCursor::Relocate(info)) => self.relocate_cursor(info),
            Some(PendingCursor::DocumentStart) => self.place_at_start(),
            None => {}
        }
    }

    /// Switches the visible representation. The cursor is captured on the
    /// outgoing surface now and relocated when the incoming one is ready.
    pub fn switch_view(&mut self, to: View) {
        if self.mounted == Some(to) {
            return;
        }
        if let Some(from) = self.mounted {
            self.unmount(from);
        }
        self.mount(to);
    }
}
