//! Restartable debounce timer driven by an external clock.

use std::time::{Duration, Instant};

/// A single pending deadline that every new change pushes back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceTimer {
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)start the timer so it fires `interval` after `now`.
    pub fn arm(&mut self, now: Instant, interval: Duration) -> Instant {
        let deadline = now + interval;
        self.deadline = Some(deadline);
        deadline
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}
