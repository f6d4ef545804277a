use std::collections::VecDeque;

use log::trace;

/// A committed change to the store's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChange {
    pub version: u64,
}

/// Owns the canonical text of the document. Surfaces only hold working
/// copies; every cross-surface update goes through here.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    text: String,
    version: u64,
    pending: VecDeque<StoreChange>,
}

impl DocumentStore {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Commits `text` and queues a change notification. Writing identical
    /// content is a no-op. Returns the store version afterwards.
    pub fn write(&mut self, text: &str) -> u64 {
        if text == self.text {
            trace!("store write skipped, content unchanged");
            return self.version;
        }
        self.text = text.to_string();
        self.version += 1;
        self.pending.push_back(StoreChange {
            version: self.version,
        });
        self.version
    }

    /// Takes all queued notifications, oldest first.
    pub fn drain_changes(&mut self) -> Vec<StoreChange> {
        self.pending.drain(..).collect()
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn write_queues_notifications() {
        let mut store = DocumentStore::new("a");
        assert_eq!(store.write("b"), 1);
        assert_eq!(store.write("c"), 2);
        assert_eq!(
            store.drain_changes(),
            vec![StoreChange { version: 1 }, StoreChange { version: 2 }]
        );
        assert!(!store.has_pending_changes());
        assert_eq!(store.text(), "c");
    }

    #[test]
    fn identical_write_is_noop() {
        let mut store = DocumentStore::new("same");
        assert_eq!(store.write("same"), 0);
        assert!(store.drain_changes().is_empty());
    }
}
