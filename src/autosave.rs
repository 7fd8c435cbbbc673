//! Debounced scheduling of text saves.
//!
//! Each edit pushes the save deadline out by the quiet period, so a burst of
//! typing produces a single save. Blur and navigation flush immediately and
//! cancel the pending deadline, so a stale debounced save can never fire
//! afterwards. There is no periodic save: the debounce is the only trigger.

#[cfg(test)]
#[path = "autosave_test.rs"]
mod autosave_test;

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
pub struct AutoSaveScheduler {
    quiet: Duration,
    deadline: Option<Instant>,
    dirty: bool,
}

impl AutoSaveScheduler {
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, deadline: None, dirty: false }
    }

    /// Record an edit: the buffer is unsaved and the deadline restarts.
    pub fn note_edit(&mut self, now: Instant) {
        self.dirty = true;
        self.deadline = Some(now + self.quiet);
    }

    /// Whether the quiet period has elapsed. Consumes the pending save.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                std::mem::take(&mut self.dirty)
            }
            _ => false,
        }
    }

    /// Cancel the pending deadline and report whether unsaved edits exist.
    pub fn flush(&mut self) -> bool {
        self.deadline = None;
        std::mem::take(&mut self.dirty)
    }

    /// Mark the buffer unsaved again (e.g. after a failed save) without scheduling.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Forget everything, e.g. after loading another day.
    pub fn reset(&mut self) {
        self.deadline = None;
        self.dirty = false;
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
