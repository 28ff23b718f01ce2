//! Deciding when a listflex layout runs.
//!
//! A [`ListLayout`] binds one [`LayoutEngine`](listflex_layout::LayoutEngine)
//! to one container. It watches the container, its ancestors, and its
//! children through host subscriptions and re-runs the layout when something
//! relevant changes. Changes arriving in quick succession are coalesced into
//! a single pass on the next display frame.

mod controller;
mod frames;
mod scheduler;
mod subscriptions;

pub use controller::ListLayout;
pub use frames::{FrameHandle, FrameScheduler, ManualFrames};
pub use scheduler::{ChangeScheduler, Decision, SchedulerState, DEFAULT_QUIESCENCE};
pub use subscriptions::SubscriptionSet;
