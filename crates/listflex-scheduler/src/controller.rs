//! Binding of a layout engine to one container.

use std::time::{Duration, Instant};

use listflex_config::migrate_legacy_config;
use listflex_core::{ChangeEvent, HostError, HostTree, LayoutError, NodeId, Signal};
use listflex_layout::{LayoutEngine, LayoutReport};
use tracing::{debug, trace};

use crate::frames::{FrameHandle, FrameScheduler};
use crate::scheduler::{ChangeScheduler, Decision, DEFAULT_QUIESCENCE};
use crate::subscriptions::SubscriptionSet;

/// A list layout attached to a container.
///
/// The host feeds every delivered [`ChangeEvent`] to [`ListLayout::handle_event`]
/// and every fired frame to [`ListLayout::on_frame`]. Both return the report of
/// the pass they ran, if any.
#[derive(Debug)]
pub struct ListLayout {
    container: NodeId,
    engine: LayoutEngine,
    scheduler: ChangeScheduler,
    passes: usize,
}

impl ListLayout {
    pub fn new(container: NodeId) -> Self {
        Self::with_quiescence(container, DEFAULT_QUIESCENCE)
    }

    pub fn with_quiescence(container: NodeId, quiescence: Duration) -> Self {
        Self {
            container,
            engine: LayoutEngine::new(),
            scheduler: ChangeScheduler::new(quiescence),
            passes: 0,
        }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn scheduler(&self) -> &ChangeScheduler {
        &self.scheduler
    }

    /// Number of layout passes run so far.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn is_enabled(&self) -> bool {
        self.scheduler.is_enabled()
    }

    /// Attach to the host and lay out immediately.
    ///
    /// Legacy configuration nodes under the container are folded into its
    /// attributes first. Enabling an enabled layout rebuilds its subscriptions.
    pub fn enable<H, F>(
        &mut self,
        host: &mut H,
        frames: &mut F,
        now: Instant,
    ) -> Result<Option<LayoutReport>, LayoutError>
    where
        H: HostTree + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        if migrate_legacy_config(host, self.container)? {
            debug!("Migrated legacy configuration of {:?}", self.container);
        }
        self.scheduler.cancel_pending(frames);
        self.scheduler.enable(now);
        self.resubscribe(host)?;
        self.run_if_visible(host)
    }

    /// Detach from the host. Nothing runs until the layout is enabled again.
    pub fn disable<H, F>(&mut self, host: &mut H, frames: &mut F)
    where
        H: HostTree + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        self.scheduler.disable(frames);
        self.scheduler.replace_subscriptions(SubscriptionSet::default()).tear_down(host);
        debug!("Disabled layout of {:?}", self.container);
    }

    /// React to a change notification observed at `now`.
    pub fn handle_event<H, F>(
        &mut self,
        host: &mut H,
        frames: &mut F,
        event: &ChangeEvent,
        now: Instant,
    ) -> Result<Option<LayoutReport>, LayoutError>
    where
        H: HostTree + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        if !self.scheduler.is_enabled() {
            return Ok(None);
        }

        let structural = match event.signal {
            Signal::Ancestry => true,
            Signal::Visibility => self.scheduler.subscriptions().is_lineage(event.node),
            _ => false,
        };
        if structural {
            debug!("Structural change {:?} on {:?}", event.signal, event.node);
            self.scheduler.cancel_pending(frames);
            self.scheduler.touch(now);
            self.resubscribe(host)?;
            return self.run_if_visible(host);
        }

        if event.node == self.container {
            match (event.signal, event.child) {
                // The child may already be gone again by the time the event is handled.
                (Signal::ChildAdded, Some(child)) => {
                    match self.scheduler.subscriptions_mut().watch_item(host, child) {
                        Ok(()) | Err(HostError::UnknownNode { .. }) => {}
                        Err(err) => return Err(err.into()),
                    }
                }
                (Signal::ChildRemoved, Some(child)) => {
                    self.scheduler.subscriptions_mut().unwatch_item(host, child);
                }
                _ => {}
            }
        }

        if self.engine.is_echo(host, event.node, event.signal) {
            trace!("Ignoring echo {:?} on {:?}", event.signal, event.node);
            return Ok(None);
        }
        if !self.lineage_visible(host)? {
            return Ok(None);
        }

        match self.scheduler.on_change(now, frames) {
            Decision::RunNow => self.run(host).map(Some),
            Decision::Deferred | Decision::Coalesced | Decision::Ignored => Ok(None),
        }
    }

    /// A frame requested by this layout fired.
    pub fn on_frame<H>(
        &mut self,
        host: &mut H,
        handle: FrameHandle,
    ) -> Result<Option<LayoutReport>, LayoutError>
    where
        H: HostTree + ?Sized,
    {
        if self.scheduler.on_frame(handle) {
            self.run_if_visible(host)
        } else {
            Ok(None)
        }
    }

    /// Run a pass right away, regardless of scheduling state.
    pub fn compute_now<H>(&mut self, host: &mut H) -> Result<LayoutReport, LayoutError>
    where
        H: HostTree + ?Sized,
    {
        self.run(host)
    }

    fn resubscribe<H: HostTree + ?Sized>(&mut self, host: &mut H) -> Result<(), HostError> {
        let fresh = SubscriptionSet::build(host, self.container)?;
        self.scheduler.replace_subscriptions(fresh).tear_down(host);
        Ok(())
    }

    /// Whether the container and all of its ancestors are visible.
    fn lineage_visible<H: HostTree + ?Sized>(&self, host: &H) -> Result<bool, HostError> {
        let mut node = Some(self.container);
        while let Some(current) = node {
            if !host.is_visible(current)? {
                return Ok(false);
            }
            node = host.parent(current)?;
        }
        Ok(true)
    }

    fn run_if_visible<H: HostTree + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<Option<LayoutReport>, LayoutError> {
        if self.lineage_visible(host)? {
            self.run(host).map(Some)
        } else {
            trace!("Skipping layout of hidden {:?}", self.container);
            Ok(None)
        }
    }

    fn run<H: HostTree + ?Sized>(&mut self, host: &mut H) -> Result<LayoutReport, LayoutError> {
        let report = self.engine.compute(host, self.container)?;
        self.passes += 1;
        Ok(report)
    }
}
