//! Host tree binding.
//!
//! The layout engine never owns UI nodes. It reads and writes them through
//! [`HostTree`], and learns about changes through subscriptions. [`MemoryTree`]
//! is a self-contained implementation used by tests, benchmarks and headless hosts.

use std::collections::HashMap;

use glam::DVec2;

use crate::attributes::{AttributeValue, Attributes};
use crate::errors::HostError;
use crate::types::{AspectConstraint, NodeId, NodeKind, UDim2};

/// A change notification a node can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Authored size changed
    Size,
    /// Authored position changed
    Position,
    /// Visibility flag toggled
    Visibility,
    /// Resolved pixel size changed
    AbsoluteSize,
    /// Any attribute (or attached constraint) changed
    Attribute,
    /// Name or explicit layout order changed
    Order,
    ChildAdded,
    ChildRemoved,
    /// The node or one of its ancestors was re-parented
    Ancestry,
}

/// Handle returned by [`HostTree::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// A delivered change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Node the subscription was made on
    pub node: NodeId,
    pub signal: Signal,
    /// Affected child for `ChildAdded` / `ChildRemoved`
    pub child: Option<NodeId>,
}

/// Access to the host UI tree required by the layout engine.
pub trait HostTree {
    fn parent(&self, node: NodeId) -> Result<Option<NodeId>, HostError>;

    /// Children in tree order.
    fn children(&self, node: NodeId) -> Result<Vec<NodeId>, HostError>;

    fn kind(&self, node: NodeId) -> Result<NodeKind, HostError>;

    fn name(&self, node: NodeId) -> Result<String, HostError>;

    /// Explicit ordering key used by `SortOrder::ExplicitOrder`.
    fn layout_order(&self, node: NodeId) -> Result<i64, HostError>;

    fn is_visible(&self, node: NodeId) -> Result<bool, HostError>;

    /// Resolved pixel size of the node.
    fn absolute_size(&self, node: NodeId) -> Result<DVec2, HostError>;

    fn size(&self, node: NodeId) -> Result<UDim2, HostError>;

    fn set_size(&mut self, node: NodeId, size: UDim2) -> Result<(), HostError>;

    fn position(&self, node: NodeId) -> Result<UDim2, HostError>;

    fn set_position(&mut self, node: NodeId, position: UDim2) -> Result<(), HostError>;

    fn aspect_constraint(&self, node: NodeId) -> Result<Option<AspectConstraint>, HostError>;

    fn attribute(&self, node: NodeId, name: &str) -> Result<Option<AttributeValue>, HostError>;

    fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), HostError>;

    fn remove_attribute(
        &mut self,
        node: NodeId,
        name: &str,
    ) -> Result<Option<AttributeValue>, HostError>;

    /// Remove a node and its subtree from the tree.
    fn destroy(&mut self, node: NodeId) -> Result<(), HostError>;

    fn subscribe(&mut self, node: NodeId, signal: Signal) -> Result<SubscriptionId, HostError>;

    /// Unknown or already removed subscriptions are ignored.
    fn unsubscribe(&mut self, subscription: SubscriptionId);
}

/// A node stored in a [`MemoryTree`].
#[derive(Debug, Clone)]
pub struct MemoryNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Authored size (parent-relative)
    pub size: UDim2,
    /// Authored position (parent-relative)
    pub position: UDim2,
    pub visible: bool,
    pub layout_order: i64,
    pub aspect: Option<AspectConstraint>,
    pub attributes: Attributes,
    /// Pixel size, only meaningful for roots
    root_size: DVec2,
}

impl MemoryNode {
    fn new(id: NodeId, name: String, kind: NodeKind) -> Self {
        Self {
            id,
            name,
            kind,
            parent: None,
            children: Vec::new(),
            size: UDim2::ZERO,
            position: UDim2::ZERO,
            visible: true,
            layout_order: 0,
            aspect: None,
            attributes: Attributes::new(),
            root_size: DVec2::ZERO,
        }
    }
}

/// In-memory host tree.
///
/// Mutations queue a [`ChangeEvent`] for every matching subscription, and only
/// when the value actually changed. Callers drain the queue with
/// [`MemoryTree::drain_events`].
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    nodes: HashMap<NodeId, MemoryNode>,
    roots: Vec<NodeId>,
    next_id: u64,
    next_subscription: u64,
    subscriptions: HashMap<SubscriptionId, (NodeId, Signal)>,
    events: Vec<ChangeEvent>,
}

impl MemoryTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a root box with a fixed pixel size.
    pub fn add_root(&mut self, name: impl Into<String>, size: DVec2) -> NodeId {
        let id = self.next_id();
        let mut node = MemoryNode::new(id, name.into(), NodeKind::Box);
        node.root_size = size;
        node.size = UDim2::from_pixels(size);
        self.nodes.insert(id, node);
        self.roots.push(id);
        id
    }

    /// Append a child node to a parent.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        kind: NodeKind,
        size: UDim2,
    ) -> Result<NodeId, HostError> {
        self.node(parent)?;
        let id = self.next_id();
        let mut node = MemoryNode::new(id, name.into(), kind);
        node.parent = Some(parent);
        node.size = size;
        self.nodes.insert(id, node);
        self.node_mut(parent)?.children.push(id);
        self.emit(parent, Signal::ChildAdded, Some(id));
        Ok(id)
    }

    /// Append a box child.
    pub fn add_box(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        size: UDim2,
    ) -> Result<NodeId, HostError> {
        self.add_child(parent, name, NodeKind::Box, size)
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(&id)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), HostError> {
        let node = self.node_mut(id)?;
        if node.visible != visible {
            node.visible = visible;
            self.emit(id, Signal::Visibility, None);
        }
        Ok(())
    }

    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), HostError> {
        let name = name.into();
        let node = self.node_mut(id)?;
        if node.name != name {
            node.name = name;
            self.emit(id, Signal::Order, None);
        }
        Ok(())
    }

    pub fn set_layout_order(&mut self, id: NodeId, order: i64) -> Result<(), HostError> {
        let node = self.node_mut(id)?;
        if node.layout_order != order {
            node.layout_order = order;
            self.emit(id, Signal::Order, None);
        }
        Ok(())
    }

    pub fn set_aspect(
        &mut self,
        id: NodeId,
        aspect: Option<AspectConstraint>,
    ) -> Result<(), HostError> {
        let node = self.node_mut(id)?;
        if node.aspect != aspect {
            node.aspect = aspect;
            self.emit(id, Signal::Attribute, None);
        }
        Ok(())
    }

    /// Resize a root node.
    pub fn set_root_size(&mut self, id: NodeId, size: DVec2) -> Result<(), HostError> {
        let node = self.node_mut(id)?;
        if node.parent.is_some() {
            return Err(HostError::Detached { node: id });
        }
        if node.root_size != size {
            node.root_size = size;
            node.size = UDim2::from_pixels(size);
            self.emit_subtree(id, Signal::AbsoluteSize);
        }
        Ok(())
    }

    /// Move a node under a new parent.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> Result<(), HostError> {
        self.node(new_parent)?;
        if self.descendants(id)?.contains(&new_parent) {
            return Err(HostError::CyclicParent { child: id, parent: new_parent });
        }

        let old_parent = self.node(id)?.parent;
        match old_parent {
            Some(old_parent) => {
                self.node_mut(old_parent)?.children.retain(|c| *c != id);
                self.emit(old_parent, Signal::ChildRemoved, Some(id));
            }
            None => self.roots.retain(|r| *r != id),
        }

        self.node_mut(id)?.parent = Some(new_parent);
        self.node_mut(new_parent)?.children.push(id);
        self.emit(new_parent, Signal::ChildAdded, Some(id));
        self.emit_subtree(id, Signal::Ancestry);
        self.emit_subtree(id, Signal::AbsoluteSize);
        Ok(())
    }

    /// Take all queued events.
    pub fn drain_events(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn node(&self, id: NodeId) -> Result<&MemoryNode, HostError> {
        self.nodes.get(&id).ok_or(HostError::UnknownNode { node: id })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut MemoryNode, HostError> {
        self.nodes.get_mut(&id).ok_or(HostError::UnknownNode { node: id })
    }

    /// The node and all of its descendants, parents first.
    fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>, HostError> {
        let mut result = vec![id];
        let mut i = 0;
        while i < result.len() {
            result.extend(self.node(result[i])?.children.iter().copied());
            i += 1;
        }
        Ok(result)
    }

    fn emit(&mut self, node: NodeId, signal: Signal, child: Option<NodeId>) {
        let subscribed = self
            .subscriptions
            .values()
            .any(|(n, s)| *n == node && *s == signal);
        if subscribed {
            self.events.push(ChangeEvent { node, signal, child });
        }
    }

    fn emit_subtree(&mut self, id: NodeId, signal: Signal) {
        let ids = self.descendants(id).unwrap_or_default();
        for node in ids {
            self.emit(node, signal, None);
        }
    }
}

impl HostTree for MemoryTree {
    fn parent(&self, node: NodeId) -> Result<Option<NodeId>, HostError> {
        Ok(self.node(node)?.parent)
    }

    fn children(&self, node: NodeId) -> Result<Vec<NodeId>, HostError> {
        Ok(self.node(node)?.children.clone())
    }

    fn kind(&self, node: NodeId) -> Result<NodeKind, HostError> {
        Ok(self.node(node)?.kind)
    }

    fn name(&self, node: NodeId) -> Result<String, HostError> {
        Ok(self.node(node)?.name.clone())
    }

    fn layout_order(&self, node: NodeId) -> Result<i64, HostError> {
        Ok(self.node(node)?.layout_order)
    }

    fn is_visible(&self, node: NodeId) -> Result<bool, HostError> {
        Ok(self.node(node)?.visible)
    }

    fn absolute_size(&self, node: NodeId) -> Result<DVec2, HostError> {
        let n = self.node(node)?;
        match n.parent {
            None => Ok(n.root_size),
            Some(parent) => {
                let parent_size = self.absolute_size(parent)?;
                Ok(n.size.resolve(parent_size).max(DVec2::ZERO))
            }
        }
    }

    fn size(&self, node: NodeId) -> Result<UDim2, HostError> {
        Ok(self.node(node)?.size)
    }

    fn set_size(&mut self, node: NodeId, size: UDim2) -> Result<(), HostError> {
        let n = self.node_mut(node)?;
        if n.size != size {
            n.size = size;
            self.emit(node, Signal::Size, None);
            self.emit_subtree(node, Signal::AbsoluteSize);
        }
        Ok(())
    }

    fn position(&self, node: NodeId) -> Result<UDim2, HostError> {
        Ok(self.node(node)?.position)
    }

    fn set_position(&mut self, node: NodeId, position: UDim2) -> Result<(), HostError> {
        let n = self.node_mut(node)?;
        if n.position != position {
            n.position = position;
            self.emit(node, Signal::Position, None);
        }
        Ok(())
    }

    fn aspect_constraint(&self, node: NodeId) -> Result<Option<AspectConstraint>, HostError> {
        Ok(self.node(node)?.aspect)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Result<Option<AttributeValue>, HostError> {
        Ok(self.node(node)?.attributes.get(name).cloned())
    }

    fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), HostError> {
        let n = self.node_mut(node)?;
        if n.attributes.get(name) != Some(&value) {
            n.attributes.insert(name.to_string(), value);
            self.emit(node, Signal::Attribute, None);
        }
        Ok(())
    }

    fn remove_attribute(
        &mut self,
        node: NodeId,
        name: &str,
    ) -> Result<Option<AttributeValue>, HostError> {
        let removed = self.node_mut(node)?.attributes.shift_remove(name);
        if removed.is_some() {
            self.emit(node, Signal::Attribute, None);
        }
        Ok(removed)
    }

    fn destroy(&mut self, node: NodeId) -> Result<(), HostError> {
        let doomed = self.descendants(node)?;
        let parent = self.node(node)?.parent;
        match parent {
            Some(parent) => {
                self.node_mut(parent)?.children.retain(|c| *c != node);
                self.emit(parent, Signal::ChildRemoved, Some(node));
            }
            None => self.roots.retain(|r| *r != node),
        }
        for id in &doomed {
            self.nodes.remove(id);
        }
        self.subscriptions.retain(|_, (n, _)| !doomed.contains(n));
        Ok(())
    }

    fn subscribe(&mut self, node: NodeId, signal: Signal) -> Result<SubscriptionId, HostError> {
        self.node(node)?;
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.insert(id, (node, signal));
        Ok(id)
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        self.subscriptions.remove(&subscription);
    }
}
