//! The "next frame" primitive the controller registers with.

use crate::error::Result;

/// Identifies one outstanding frame registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Schedules a single callback for the next display frame.
///
/// Implementations must deliver at most one callback per registration and
/// must never deliver a callback for a handle passed to `cancel_frame`.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle>;

    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler driven by hand, for headless use and tests.
///
/// Requests are queued until the owner collects them with [`take_due`] and
/// feeds each handle back into the controller.
///
/// [`take_due`]: ManualScheduler::take_due
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: i32,
    pending: Vec<FrameHandle>,
    requested: usize,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registrations not yet delivered or cancelled.
    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    /// Remove and return every pending registration, as a display frame would.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle> {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        self.requested += 1;
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|pending| *pending != handle);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_frame().unwrap();
        let b = scheduler.request_frame().unwrap();
        assert_ne!(a, b);
        assert_eq!(scheduler.pending(), &[a, b]);
    }

    #[test]
    fn cancel_removes_only_that_handle() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_frame().unwrap();
        let b = scheduler.request_frame().unwrap();
        scheduler.cancel_frame(a);
        scheduler.cancel_frame(a);
        assert_eq!(scheduler.pending(), &[b]);
        assert_eq!(scheduler.cancelled(), 1);
        assert_eq!(scheduler.take_due(), vec![b]);
        assert!(scheduler.pending().is_empty());
    }
}
