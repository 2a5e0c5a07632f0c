//! Coalescing of bursty signals.
//!
//! The debouncer is clock-agnostic: callers pass the current timestamp with
//! every call, so the browser feeds it `performance.now()` while tests feed
//! synthetic instants.

use std::time::Duration;

/// Keeps the latest signalled value until no new signal has arrived for a full
/// quiet window, then releases it exactly once.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet_window: Duration,
    pending: Option<(T, Duration)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet_window: Duration) -> Self {
        Self {
            quiet_window,
            pending: None,
        }
    }

    pub fn quiet_window(&self) -> Duration {
        self.quiet_window
    }

    /// Record a signal at `now`, replacing any value still waiting.
    pub fn signal(&mut self, value: T, now: Duration) {
        self.pending = Some((value, now + self.quiet_window));
    }

    /// Release the pending value if its quiet window has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
