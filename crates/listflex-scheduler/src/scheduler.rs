//! The recompute state machine.
//!
//! Two states: [`SchedulerState::Idle`] and [`SchedulerState::Pending`]. A
//! change that arrives after a quiet period runs the layout immediately. A
//! change inside the quiescence window schedules one frame callback, and any
//! further change before that frame fires is folded into it.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::frames::{FrameHandle, FrameScheduler};
use crate::subscriptions::SubscriptionSet;

/// Window after a change during which further changes are deferred.
pub const DEFAULT_QUIESCENCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    /// A frame callback is registered and will run the layout
    Pending(FrameHandle),
}

/// What the scheduler decided to do about a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Run the layout synchronously
    RunNow,
    /// A frame callback was requested
    Deferred,
    /// A frame callback was already pending
    Coalesced,
    /// The scheduler is disabled
    Ignored,
}

/// Frame-coalescing scheduler for one container.
///
/// Time is injected by the caller so behavior is deterministic under test.
/// The scheduler also owns the container's [`SubscriptionSet`], which the
/// controller swaps out wholesale on structural changes.
#[derive(Debug)]
pub struct ChangeScheduler {
    state: SchedulerState,
    last_change: Option<Instant>,
    quiescence: Duration,
    enabled: bool,
    subscriptions: SubscriptionSet,
}

impl Default for ChangeScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_QUIESCENCE)
    }
}

impl ChangeScheduler {
    /// A disabled scheduler with the given quiescence window.
    pub fn new(quiescence: Duration) -> Self {
        Self {
            state: SchedulerState::Idle,
            last_change: None,
            quiescence,
            enabled: false,
            subscriptions: SubscriptionSet::default(),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn quiescence(&self) -> Duration {
        self.quiescence
    }

    pub fn last_change(&self) -> Option<Instant> {
        self.last_change
    }

    pub fn subscriptions(&self) -> &SubscriptionSet {
        &self.subscriptions
    }

    pub fn subscriptions_mut(&mut self) -> &mut SubscriptionSet {
        &mut self.subscriptions
    }

    /// Install a new subscription set, returning the previous one.
    pub fn replace_subscriptions(&mut self, subscriptions: SubscriptionSet) -> SubscriptionSet {
        std::mem::replace(&mut self.subscriptions, subscriptions)
    }

    /// Start accepting changes. Counts as a change at `now`.
    pub fn enable(&mut self, now: Instant) {
        self.enabled = true;
        self.last_change = Some(now);
    }

    /// Stop accepting changes and withdraw any pending frame.
    pub fn disable<F: FrameScheduler + ?Sized>(&mut self, frames: &mut F) {
        self.enabled = false;
        self.cancel_pending(frames);
    }

    /// Record a change at `now` without scheduling anything.
    pub fn touch(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    /// Withdraw the pending frame, if any.
    pub fn cancel_pending<F: FrameScheduler + ?Sized>(&mut self, frames: &mut F) {
        if let SchedulerState::Pending(handle) = self.state {
            frames.cancel_frame(handle);
            self.state = SchedulerState::Idle;
        }
    }

    /// Decide how to react to a change observed at `now`.
    pub fn on_change<F>(&mut self, now: Instant, frames: &mut F) -> Decision
    where
        F: FrameScheduler + ?Sized,
    {
        if !self.enabled {
            return Decision::Ignored;
        }

        let quiet = self
            .last_change
            .map_or(true, |last| now.saturating_duration_since(last) > self.quiescence);
        self.last_change = Some(now);

        let decision = if quiet {
            // The pending frame would only repeat the pass we run now.
            self.cancel_pending(frames);
            Decision::RunNow
        } else {
            match self.state {
                SchedulerState::Pending(_) => Decision::Coalesced,
                SchedulerState::Idle => {
                    self.state = SchedulerState::Pending(frames.request_frame());
                    Decision::Deferred
                }
            }
        };
        trace!("Change decision: {:?}", decision);
        decision
    }

    /// A frame callback fired. Returns `true` if the layout should run.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if self.enabled && self.state == SchedulerState::Pending(handle) {
            self.state = SchedulerState::Idle;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::ManualFrames;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_disabled_scheduler_ignores_changes() {
        let mut frames = ManualFrames::new();
        let mut scheduler = ChangeScheduler::default();

        assert_eq!(scheduler.on_change(Instant::now(), &mut frames), Decision::Ignored);
        assert!(frames.pending().is_empty());
    }

    #[test]
    fn test_burst_inside_window_requests_one_frame() {
        let t0 = Instant::now();
        let mut frames = ManualFrames::new();
        let mut scheduler = ChangeScheduler::default();
        scheduler.enable(t0);

        assert_eq!(scheduler.on_change(t0 + ms(10), &mut frames), Decision::Deferred);
        assert_eq!(scheduler.on_change(t0 + ms(20), &mut frames), Decision::Coalesced);
        assert_eq!(scheduler.on_change(t0 + ms(30), &mut frames), Decision::Coalesced);
        assert_eq!(frames.pending().len(), 1);

        let handle = frames.take_due()[0];
        assert!(scheduler.on_frame(handle));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        // A stale handle does nothing.
        assert!(!scheduler.on_frame(handle));
    }

    #[test]
    fn test_change_after_quiet_period_runs_now() {
        let t0 = Instant::now();
        let mut frames = ManualFrames::new();
        let mut scheduler = ChangeScheduler::default();
        scheduler.enable(t0);

        assert_eq!(scheduler.on_change(t0 + ms(501), &mut frames), Decision::RunNow);
        assert_eq!(scheduler.on_change(t0 + ms(1100), &mut frames), Decision::RunNow);
        assert!(frames.pending().is_empty());
    }

    #[test]
    fn test_quiet_change_cancels_stale_frame() {
        let t0 = Instant::now();
        let mut frames = ManualFrames::new();
        let mut scheduler = ChangeScheduler::default();
        scheduler.enable(t0);

        assert_eq!(scheduler.on_change(t0 + ms(100), &mut frames), Decision::Deferred);
        assert_eq!(scheduler.on_change(t0 + ms(700), &mut frames), Decision::RunNow);
        assert!(frames.pending().is_empty());
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_window_is_exclusive_at_boundary() {
        let t0 = Instant::now();
        let mut frames = ManualFrames::new();
        let mut scheduler = ChangeScheduler::new(ms(100));
        scheduler.enable(t0);

        assert_eq!(scheduler.on_change(t0 + ms(100), &mut frames), Decision::Deferred);
    }

    #[test]
    fn test_disable_cancels_pending_frame() {
        let t0 = Instant::now();
        let mut frames = ManualFrames::new();
        let mut scheduler = ChangeScheduler::default();
        scheduler.enable(t0);
        scheduler.on_change(t0 + ms(1), &mut frames);
        let handle = frames.pending()[0];

        scheduler.disable(&mut frames);

        assert!(frames.pending().is_empty());
        assert!(!scheduler.is_enabled());
        assert!(!scheduler.on_frame(handle));
    }
}
