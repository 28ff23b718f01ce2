//! Per-frame callback registration.

/// Token for a requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host facility that runs a callback once before the next frame is presented.
pub trait FrameScheduler {
    /// Register interest in the next frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request that has not fired yet.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Frame scheduler driven by hand, for tests and headless hosts.
///
/// Requested frames accumulate until [`ManualFrames::take_due`] hands them to
/// the caller, which then delivers each one to its owner.
#[derive(Debug, Default)]
pub struct ManualFrames {
    next: u64,
    queued: Vec<FrameHandle>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that have not fired or been cancelled.
    pub fn pending(&self) -> &[FrameHandle] {
        &self.queued
    }

    /// Fire the frame: take every queued request.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.queued)
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next);
        self.next += 1;
        self.queued.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queued.retain(|h| *h != handle);
    }
}
