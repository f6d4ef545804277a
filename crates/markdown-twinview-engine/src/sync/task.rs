//! Cancellable, re-armable scheduling handles driven by host callbacks.

use std::time::Instant;

use log::trace;

/// When an armed [`Task`] becomes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    /// Due on the next `on_frame` call.
    NextFrame,
    /// Due on the first `on_frame` call at or after this instant.
    At(Instant),
}

/// A single pending callback. Arming replaces whatever was pending, so a
/// superseded deadline can never fire.
#[derive(Debug, Default)]
pub struct Task {
    name: &'static str,
    deadline: Option<Deadline>,
}

impl Task {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            deadline: None,
        }
    }

    pub fn arm(&mut self, deadline: Deadline) {
        if let Some(previous) = self.deadline.replace(deadline) {
            trace!("{}: {previous:?} replaced by {deadline:?}", self.name);
        } else {
            trace!("{}: armed for {deadline:?}", self.name);
        }
    }

    /// Drops the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.deadline.take().is_some();
        if cancelled {
            trace!("{}: cancelled", self.name);
        }
        cancelled
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Deadline> {
        self.deadline
    }

    /// Disarms and returns `true` if the task is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        let due = match self.deadline {
            Some(Deadline::NextFrame) => true,
            Some(Deadline::At(at)) => now >= at,
            None => false,
        };
        if due {
            self.deadline = None;
            trace!("{}: fired", self.name);
        }
        due
    }
}
