//! The set of host subscriptions a container depends on.

use std::collections::HashMap;

use listflex_core::{HostError, HostTree, NodeId, Signal, SubscriptionId};
use tracing::trace;

/// Signals that affect the container itself.
const CONTAINER_SIGNALS: [Signal; 5] = [
    Signal::AbsoluteSize,
    Signal::Position,
    Signal::ChildAdded,
    Signal::ChildRemoved,
    Signal::Attribute,
];

/// Signals watched on the container and every ancestor.
const LINEAGE_SIGNALS: [Signal; 2] = [Signal::Visibility, Signal::Ancestry];

/// Signals watched on every child.
const ITEM_SIGNALS: [Signal; 5] = [
    Signal::Size,
    Signal::Position,
    Signal::Visibility,
    Signal::Attribute,
    Signal::Order,
];

/// Subscriptions held for one container.
///
/// The lineage part (container plus ancestors) is only ever rebuilt as a
/// whole. Items are added and removed individually as children come and go.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    container: Vec<SubscriptionId>,
    /// Container followed by its ancestors, nearest first
    lineage: Vec<NodeId>,
    lineage_subscriptions: Vec<SubscriptionId>,
    items: HashMap<NodeId, Vec<SubscriptionId>>,
}

impl SubscriptionSet {
    /// Subscribe to everything a layout of `container` depends on.
    pub fn build<H: HostTree + ?Sized>(host: &mut H, container: NodeId) -> Result<Self, HostError> {
        let mut set = Self::default();
        if let Err(err) = set.populate(host, container) {
            set.tear_down(host);
            return Err(err);
        }
        trace!("Subscribed {} signals for {:?}", set.len(), container);
        Ok(set)
    }

    fn populate<H: HostTree + ?Sized>(
        &mut self,
        host: &mut H,
        container: NodeId,
    ) -> Result<(), HostError> {
        for signal in CONTAINER_SIGNALS {
            self.container.push(host.subscribe(container, signal)?);
        }

        let mut node = Some(container);
        while let Some(current) = node {
            for signal in LINEAGE_SIGNALS {
                self.lineage_subscriptions.push(host.subscribe(current, signal)?);
            }
            self.lineage.push(current);
            node = host.parent(current)?;
        }

        for child in host.children(container)? {
            self.watch_item(host, child)?;
        }
        Ok(())
    }

    /// Drop every subscription.
    pub fn tear_down<H: HostTree + ?Sized>(self, host: &mut H) {
        let ids = self
            .container
            .into_iter()
            .chain(self.lineage_subscriptions)
            .chain(self.items.into_values().flatten());
        for id in ids {
            host.unsubscribe(id);
        }
    }

    /// Start watching a child. Already watched children are left alone.
    pub fn watch_item<H: HostTree + ?Sized>(
        &mut self,
        host: &mut H,
        item: NodeId,
    ) -> Result<(), HostError> {
        if self.items.contains_key(&item) {
            return Ok(());
        }
        let mut ids = Vec::with_capacity(ITEM_SIGNALS.len());
        for signal in ITEM_SIGNALS {
            match host.subscribe(item, signal) {
                Ok(id) => ids.push(id),
                Err(err) => {
                    for id in ids {
                        host.unsubscribe(id);
                    }
                    return Err(err);
                }
            }
        }
        self.items.insert(item, ids);
        Ok(())
    }

    /// Stop watching a child. Returns whether it was watched.
    pub fn unwatch_item<H: HostTree + ?Sized>(&mut self, host: &mut H, item: NodeId) -> bool {
        match self.items.remove(&item) {
            Some(ids) => {
                for id in ids {
                    host.unsubscribe(id);
                }
                true
            }
            None => false,
        }
    }

    /// Whether `node` is the container or one of its ancestors.
    pub fn is_lineage(&self, node: NodeId) -> bool {
        self.lineage.contains(&node)
    }

    pub fn is_watching(&self, item: NodeId) -> bool {
        self.items.contains_key(&item)
    }

    /// Container followed by its ancestors, nearest first.
    pub fn lineage(&self) -> &[NodeId] {
        &self.lineage
    }

    /// Total number of subscriptions held.
    pub fn len(&self) -> usize {
        let items: usize = self.items.values().map(Vec::len).sum();
        self.container.len() + self.lineage_subscriptions.len() + items
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use listflex_core::{MemoryTree, UDim2};

    fn nested() -> (MemoryTree, NodeId, NodeId, Vec<NodeId>) {
        let mut tree = MemoryTree::new();
        let root = tree.add_root("root", DVec2::new(200.0, 200.0));
        let list = tree.add_box(root, "list", UDim2::from_scale(1.0, 1.0)).unwrap();
        let items = (0..3)
            .map(|i| {
                tree.add_box(list, format!("item{i}"), UDim2::from_offset(10.0, 10.0))
                    .unwrap()
            })
            .collect();
        (tree, root, list, items)
    }

    #[test]
    fn test_build_covers_lineage_and_items() {
        let (mut tree, root, list, items) = nested();

        let set = SubscriptionSet::build(&mut tree, list).unwrap();

        assert_eq!(set.lineage(), &[list, root]);
        assert!(set.is_lineage(root));
        assert!(!set.is_lineage(items[0]));
        assert!(items.iter().all(|i| set.is_watching(*i)));
        // 5 container + 2 * 2 lineage + 3 * 5 items
        assert_eq!(set.len(), 24);
        assert_eq!(tree.subscription_count(), 24);
    }

    #[test]
    fn test_tear_down_releases_everything() {
        let (mut tree, _, list, _) = nested();
        let set = SubscriptionSet::build(&mut tree, list).unwrap();

        set.tear_down(&mut tree);

        assert_eq!(tree.subscription_count(), 0);
    }

    #[test]
    fn test_watch_and_unwatch_item() {
        let (mut tree, _, list, items) = nested();
        let mut set = SubscriptionSet::build(&mut tree, list).unwrap();
        let before = tree.subscription_count();

        set.watch_item(&mut tree, items[0]).unwrap();
        assert_eq!(tree.subscription_count(), before);

        assert!(set.unwatch_item(&mut tree, items[0]));
        assert!(!set.unwatch_item(&mut tree, items[0]));
        assert_eq!(tree.subscription_count(), before - 5);
    }

    #[test]
    fn test_build_fails_for_unknown_container() {
        let mut tree = MemoryTree::new();

        let err = SubscriptionSet::build(&mut tree, NodeId(42)).unwrap_err();

        assert_eq!(err, HostError::UnknownNode { node: NodeId(42) });
        assert_eq!(tree.subscription_count(), 0);
    }
}
