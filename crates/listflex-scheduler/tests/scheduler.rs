use std::time::{Duration, Instant};

use glam::DVec2;
use listflex_config::attrs;
use listflex_core::{AttributeValue, HostTree, MemoryTree, NodeId, NodeKind, UDim2};
use listflex_scheduler::{ListLayout, ManualFrames, SchedulerState};

struct Harness {
    tree: MemoryTree,
    frames: ManualFrames,
    layout: ListLayout,
    outer: NodeId,
    list: NodeId,
    items: Vec<NodeId>,
    start: Instant,
}

impl Harness {
    /// A root holding an `outer` frame holding the list container.
    fn new() -> Self {
        let mut tree = MemoryTree::new();
        let root = tree.add_root("root", DVec2::new(300.0, 300.0));
        let outer = tree.add_box(root, "outer", UDim2::from_scale(1.0, 1.0)).unwrap();
        let list = tree.add_box(outer, "list", UDim2::from_offset(100.0, 200.0)).unwrap();
        let items = (0..3)
            .map(|i| {
                tree.add_box(list, format!("item{i}"), UDim2::from_offset(40.0, 30.0))
                    .unwrap()
            })
            .collect();

        let mut harness = Self {
            tree,
            frames: ManualFrames::new(),
            layout: ListLayout::new(list),
            outer,
            list,
            items,
            start: Instant::now(),
        };
        harness.layout.enable(&mut harness.tree, &mut harness.frames, harness.start).unwrap();
        harness.tree.drain_events();
        harness
    }

    fn at(&self, ms: u64) -> Instant {
        self.start + Duration::from_millis(ms)
    }

    /// Deliver queued host events as if observed at `ms`.
    fn pump(&mut self, ms: u64) {
        let now = self.at(ms);
        for event in self.tree.drain_events() {
            self.layout.handle_event(&mut self.tree, &mut self.frames, &event, now).unwrap();
        }
    }

    /// Fire the next display frame.
    fn frame(&mut self) {
        for handle in self.frames.take_due() {
            self.layout.on_frame(&mut self.tree, handle).unwrap();
        }
    }

    fn position(&self, node: NodeId) -> DVec2 {
        self.tree.position(node).unwrap().resolve(DVec2::ZERO)
    }
}

#[test]
fn test_burst_of_changes_runs_one_pass() {
    let mut h = Harness::new();
    assert_eq!(h.layout.passes(), 1);

    for (i, height) in [35.0, 40.0, 45.0, 50.0, 55.0].into_iter().enumerate() {
        h.tree.set_size(h.items[0], UDim2::from_offset(40.0, height)).unwrap();
        h.pump(50 * i as u64 + 10);
    }

    assert_eq!(h.layout.passes(), 1);
    assert_eq!(h.frames.pending().len(), 1);

    h.frame();
    assert_eq!(h.layout.passes(), 2);
    assert_eq!(h.position(h.items[1]), DVec2::new(0.0, 55.0));

    // The pass's own writes do not schedule anything.
    h.pump(300);
    assert!(h.frames.pending().is_empty());
    assert_eq!(h.layout.scheduler().state(), SchedulerState::Idle);
}

#[test]
fn test_change_after_quiet_period_runs_synchronously() {
    let mut h = Harness::new();

    h.tree.set_size(h.items[0], UDim2::from_offset(40.0, 60.0)).unwrap();
    h.pump(2_000);

    assert_eq!(h.layout.passes(), 2);
    assert!(h.frames.pending().is_empty());
    assert_eq!(h.position(h.items[1]), DVec2::new(0.0, 60.0));
}

#[test]
fn test_disable_cancels_pending_and_detaches() {
    let mut h = Harness::new();
    h.tree.set_layout_order(h.items[2], -1).unwrap();
    h.pump(10);
    assert_eq!(h.frames.pending().len(), 1);

    h.layout.disable(&mut h.tree, &mut h.frames);

    assert!(h.frames.pending().is_empty());
    assert_eq!(h.tree.subscription_count(), 0);

    h.tree.set_size(h.items[0], UDim2::from_offset(40.0, 90.0)).unwrap();
    h.pump(5_000);
    assert_eq!(h.layout.passes(), 1);
}

#[test]
fn test_reenable_resubscribes_and_recomputes() {
    let mut h = Harness::new();
    let subscriptions = h.tree.subscription_count();
    h.layout.disable(&mut h.tree, &mut h.frames);

    h.tree.set_layout_order(h.items[2], -1).unwrap();
    let now = h.at(100);
    let report = h.layout.enable(&mut h.tree, &mut h.frames, now).unwrap();

    assert!(report.is_some());
    assert_eq!(h.layout.passes(), 2);
    assert_eq!(h.tree.subscription_count(), subscriptions);
    assert_eq!(h.position(h.items[2]), DVec2::ZERO);
}

#[test]
fn test_added_child_is_watched_and_laid_out() {
    let mut h = Harness::new();
    let before = h.tree.subscription_count();

    let extra = h.tree.add_box(h.list, "item3", UDim2::from_offset(40.0, 30.0)).unwrap();
    h.pump(1_000);

    assert_eq!(h.tree.subscription_count(), before + 5);
    assert_eq!(h.layout.passes(), 2);
    assert_eq!(h.position(extra), DVec2::new(0.0, 90.0));

    // Changes on the new child are now observed.
    h.tree.set_size(extra, UDim2::from_offset(40.0, 10.0)).unwrap();
    h.pump(3_000);
    assert_eq!(h.layout.passes(), 3);
}

#[test]
fn test_removed_child_is_unwatched() {
    let mut h = Harness::new();
    let before = h.tree.subscription_count();

    h.tree.destroy(h.items[0]).unwrap();
    h.pump(1_000);

    assert_eq!(h.tree.subscription_count(), before - 5);
    assert!(!h.layout.scheduler().subscriptions().is_watching(h.items[0]));
    assert_eq!(h.position(h.items[1]), DVec2::ZERO);
}

#[test]
fn test_hidden_ancestor_suspends_layout() {
    let mut h = Harness::new();

    h.tree.set_visible(h.outer, false).unwrap();
    h.pump(1_000);
    assert_eq!(h.layout.passes(), 1);

    h.tree.set_size(h.items[0], UDim2::from_offset(40.0, 80.0)).unwrap();
    h.pump(2_000);
    assert_eq!(h.layout.passes(), 1);
    assert!(h.frames.pending().is_empty());

    h.tree.set_visible(h.outer, true).unwrap();
    h.pump(2_100);
    assert_eq!(h.layout.passes(), 2);
    assert_eq!(h.position(h.items[1]), DVec2::new(0.0, 80.0));
}

#[test]
fn test_reparenting_rebuilds_subscriptions() {
    let mut h = Harness::new();
    let other = h.tree.add_root("other", DVec2::new(500.0, 500.0));
    let holder = h.tree.add_box(other, "holder", UDim2::from_scale(1.0, 1.0)).unwrap();
    let before = h.tree.subscription_count();

    h.tree.reparent(h.list, holder).unwrap();
    h.pump(100);

    assert!(h.layout.passes() >= 2);
    let lineage = h.layout.scheduler().subscriptions().lineage();
    assert_eq!(lineage, &[h.list, holder, other]);
    assert!(!lineage.contains(&h.outer));
    assert_eq!(h.tree.subscription_count(), before);
}

#[test]
fn test_legacy_config_migrates_on_enable() {
    let mut tree = MemoryTree::new();
    let list = tree.add_root("list", DVec2::new(200.0, 100.0));
    let legacy = tree.add_child(list, "config", NodeKind::LegacyConfig, UDim2::ZERO).unwrap();
    tree.set_attribute(legacy, "FillDirection", AttributeValue::from("Horizontal")).unwrap();
    let items: Vec<_> = (0..2)
        .map(|i| tree.add_box(list, format!("item{i}"), UDim2::from_offset(50.0, 20.0)).unwrap())
        .collect();
    let mut frames = ManualFrames::new();
    let mut layout = ListLayout::new(list);

    layout.enable(&mut tree, &mut frames, Instant::now()).unwrap();

    assert!(tree.get(legacy).is_none());
    assert_eq!(
        tree.attribute(list, attrs::DIRECTION).unwrap(),
        Some(AttributeValue::from("Horizontal"))
    );
    assert_eq!(tree.position(items[1]).unwrap(), UDim2::from_offset(50.0, 0.0));
}

#[test]
fn test_child_added_then_destroyed_is_harmless() {
    let mut h = Harness::new();
    let before = h.tree.subscription_count();

    let fleeting = h.tree.add_box(h.list, "fleeting", UDim2::from_offset(10.0, 10.0)).unwrap();
    h.tree.destroy(fleeting).unwrap();
    h.pump(1_000);

    assert_eq!(h.tree.subscription_count(), before);
    assert!(!h.layout.scheduler().subscriptions().is_watching(fleeting));
}
