//! The layout pass.
//!
//! A pass runs start to finish every time it is invoked:
//!
//! 1. Collect visible box children, reset each to its basis size, and read
//!    padding insets
//! 2. Flip horizontal containers so the rest of the pass lays out vertically
//! 3. Sort items
//! 4. Wrap items into lines
//! 5. Size lines along the cross axis
//! 6. Size items along the main axis within each line
//! 7. Enforce aspect-ratio constraints and refit unfilled lines
//! 8. Place items, flip back, and write sizes and positions to the host

use std::collections::{HashMap, HashSet};

use glam::DVec2;
use listflex_config::{
    attrs, resolve_item_config, resolve_list_config, Direction, Distribution, FlexRatios,
    LineAlignment, ListConfig, SortOrder,
};
use listflex_core::{
    AspectConstraint, AttributeValue, HostError, HostTree, LayoutError, NodeId, NodeKind, Signal,
    UDim2,
};
use tracing::{debug, trace};

use crate::distribute::distribute;
use crate::lines::{span, wrap_lines, Line, Spacing};

/// Final geometry of one item, in container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPlacement {
    pub node: NodeId,
    /// Offset from the container origin
    pub position: DVec2,
    pub size: DVec2,
    /// Index of the line holding the item
    pub line: usize,
}

/// Result of a layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutReport {
    /// Placements in layout order
    pub placements: Vec<ItemPlacement>,
    /// Number of lines produced by wrapping
    pub lines: usize,
}

impl LayoutReport {
    /// Placement of a specific item.
    pub fn get(&self, node: NodeId) -> Option<&ItemPlacement> {
        self.placements.iter().find(|p| p.node == node)
    }
}

/// What the engine remembers about an item between passes.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ItemState {
    /// Authored size that flexing starts from
    basis: UDim2,
    written_size: Option<UDim2>,
    written_position: Option<UDim2>,
}

/// Attributes a pass reads from the container.
const CONTAINER_ATTRIBUTES: &[&str] = &[
    attrs::DIRECTION,
    attrs::MAIN_FLEX,
    attrs::CROSS_FLEX,
    attrs::MAIN_ALIGNMENT,
    attrs::CROSS_ALIGNMENT,
    attrs::ITEM_LINE_ALIGNMENT,
    attrs::SORT_ORDER,
    attrs::PADDING,
    attrs::WRAPS,
];

/// Attributes a pass reads from, or writes to, an item.
const ITEM_ATTRIBUTES: &[&str] = &[
    attrs::FLEX_MODE,
    attrs::GROW_RATIO,
    attrs::SHRINK_RATIO,
    attrs::ITEM_LINE_ALIGNMENT,
    attrs::BASIS_SIZE,
];

/// Attribute values of a node as they stood when a pass finished.
#[derive(Debug, Clone, PartialEq)]
struct AttributeSnapshot {
    names: &'static [&'static str],
    values: Vec<Option<AttributeValue>>,
    aspect: Option<AspectConstraint>,
}

impl AttributeSnapshot {
    fn take<H: HostTree + ?Sized>(
        host: &H,
        node: NodeId,
        names: &'static [&'static str],
    ) -> Result<Self, HostError> {
        let values = names
            .iter()
            .map(|name| host.attribute(node, name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { names, values, aspect: host.aspect_constraint(node)? })
    }

    fn matches<H: HostTree + ?Sized>(&self, host: &H, node: NodeId) -> bool {
        Self::take(host, node, self.names).map_or(false, |now| now == *self)
    }
}

/// An item during a pass. Geometry is in the flipped (vertical) frame.
#[derive(Debug, Clone)]
struct Item {
    node: NodeId,
    name: String,
    order: i64,
    size: DVec2,
    offset: DVec2,
    ratios: FlexRatios,
    line_alignment: LineAlignment,
    aspect: Option<AspectConstraint>,
}

/// Lays out the children of a container.
///
/// One engine belongs to one container. It caches each item's basis size so
/// flexing is always computed from the authored size, never from the result
/// of a previous pass.
#[derive(Debug, Default)]
pub struct LayoutEngine {
    states: HashMap<NodeId, ItemState>,
    snapshots: HashMap<NodeId, AttributeSnapshot>,
}

impl LayoutEngine {
    /// Create an engine with an empty basis cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items with cached state.
    pub fn tracked_items(&self) -> usize {
        self.states.len()
    }

    /// Basis size cached for an item.
    pub fn basis(&self, node: NodeId) -> Option<UDim2> {
        self.states.get(&node).map(|s| s.basis)
    }

    /// Whether a change notification only reflects this engine's own write.
    ///
    /// Size and position changes are echoes when the node still holds what the
    /// last pass wrote. Attribute changes are echoes when every attribute the
    /// pass depends on is as the last pass left it.
    pub fn is_echo<H: HostTree + ?Sized>(&self, host: &H, node: NodeId, signal: Signal) -> bool {
        match signal {
            Signal::Size => self.states.get(&node).is_some_and(|s| {
                s.written_size.is_some() && host.size(node).ok() == s.written_size
            }),
            Signal::Position => self.states.get(&node).is_some_and(|s| {
                s.written_position.is_some() && host.position(node).ok() == s.written_position
            }),
            Signal::Attribute => self.snapshots.get(&node).is_some_and(|s| s.matches(host, node)),
            _ => false,
        }
    }

    /// Run a full layout pass over `container`.
    pub fn compute<H: HostTree + ?Sized>(
        &mut self,
        host: &mut H,
        container: NodeId,
    ) -> Result<LayoutReport, LayoutError> {
        let config = resolve_list_config(host, container)?;
        let container_size = host.absolute_size(container)?;
        let children = host.children(container)?;

        let present: HashSet<NodeId> = children.iter().copied().collect();
        self.states.retain(|node, _| present.contains(node));
        self.snapshots.clear();

        let mut leading = DVec2::ZERO;
        let mut trailing = DVec2::ZERO;
        let mut items = Vec::new();

        for &child in &children {
            match host.kind(child)? {
                NodeKind::Padding(insets) => {
                    leading += insets.leading(container_size);
                    trailing += insets.trailing(container_size);
                }
                NodeKind::Box => {
                    if host.is_visible(child)? {
                        items.push(self.collect(host, child)?);
                    }
                }
                NodeKind::LegacyConfig | NodeKind::Other => {}
            }
        }

        if items.is_empty() {
            self.snapshot(host, container, &[])?;
            debug!(?container, "no items to lay out");
            return Ok(LayoutReport::default());
        }

        let horizontal = config.direction == Direction::Horizontal;
        let content = (container_size - leading - trailing).max(DVec2::ZERO);
        let gap = DVec2::new(config.padding.resolve(content.x), config.padding.resolve(content.y));

        let space = flip(content, horizontal);
        let gap = flip(gap, horizontal);
        for item in &mut items {
            item.size = flip(item.size, horizontal);
        }

        sort_items(&mut items, config.sort_order);

        let sizes: Vec<DVec2> = items.iter().map(|i| i.size).collect();
        let mut lines = wrap_lines(&sizes, space.y, gap.y, config.wraps);

        size_lines(&mut lines, &mut items, &config, space.x, gap.x);

        if config.main_flex == Distribution::Fill {
            for line in &lines {
                flex_line(line, &mut items, space.y, gap.y);
            }
        }

        for item in &mut items {
            if let Some(aspect) = item.aspect {
                let real = aspect.apply(flip(item.size, horizontal)).round();
                item.size = flip(real, horizontal);
            }
        }
        if config.cross_flex != Distribution::Fill {
            refit_lines(&mut lines, &mut items);
        }

        place(&lines, &mut items, &config, space, gap);

        let mut report = LayoutReport {
            placements: Vec::with_capacity(items.len()),
            lines: lines.len(),
        };
        for (line_index, line) in lines.iter().enumerate() {
            for &i in &line.items {
                let item = &items[i];
                let size = flip(item.size, horizontal).round().max(DVec2::ZERO);
                let position = (flip(item.offset, horizontal) + leading).round().max(DVec2::ZERO);
                self.write(host, item.node, size, position)?;

                trace!(node = ?item.node, line = line_index, ?position, ?size, "placed item");
                report.placements.push(ItemPlacement {
                    node: item.node,
                    position,
                    size,
                    line: line_index,
                });
            }
        }

        let placed: Vec<NodeId> = items.iter().map(|i| i.node).collect();
        self.snapshot(host, container, &placed)?;

        debug!(?container, items = items.len(), lines = lines.len(), "layout pass complete");
        Ok(report)
    }

    /// Reset an item to its basis size and snapshot what the pass needs.
    fn collect<H: HostTree + ?Sized>(
        &mut self,
        host: &mut H,
        node: NodeId,
    ) -> Result<Item, LayoutError> {
        let current = host.size(node)?;
        let basis = match self.states.get(&node) {
            Some(state) if state.written_size == Some(current) => state.basis,
            Some(_) => current,
            None => host
                .attribute(node, attrs::BASIS_SIZE)?
                .and_then(|v| v.as_udim2())
                .unwrap_or(current),
        };

        let stored = AttributeValue::UDim2(basis);
        if host.attribute(node, attrs::BASIS_SIZE)?.as_ref() != Some(&stored) {
            host.set_attribute(node, attrs::BASIS_SIZE, stored)?;
        }

        host.set_size(node, basis)?;
        let size = host.absolute_size(node)?.round();

        let state = self.states.entry(node).or_insert(ItemState {
            basis,
            written_size: None,
            written_position: None,
        });
        state.basis = basis;
        state.written_size = Some(basis);

        let flex = resolve_item_config(host, node)?;

        Ok(Item {
            node,
            name: host.name(node)?,
            order: host.layout_order(node)?,
            size,
            offset: DVec2::ZERO,
            ratios: flex.ratios(),
            line_alignment: flex.line_alignment,
            aspect: host.aspect_constraint(node)?,
        })
    }

    fn snapshot<H: HostTree + ?Sized>(
        &mut self,
        host: &H,
        container: NodeId,
        items: &[NodeId],
    ) -> Result<(), HostError> {
        self.snapshots
            .insert(container, AttributeSnapshot::take(host, container, CONTAINER_ATTRIBUTES)?);
        for &item in items {
            self.snapshots.insert(item, AttributeSnapshot::take(host, item, ITEM_ATTRIBUTES)?);
        }
        Ok(())
    }

    fn write<H: HostTree + ?Sized>(
        &mut self,
        host: &mut H,
        node: NodeId,
        size: DVec2,
        position: DVec2,
    ) -> Result<(), LayoutError> {
        let size = UDim2::from_pixels(size);
        let position = UDim2::from_pixels(position);
        host.set_size(node, size)?;
        host.set_position(node, position)?;

        if let Some(state) = self.states.get_mut(&node) {
            state.written_size = Some(size);
            state.written_position = Some(position);
        }
        Ok(())
    }
}

fn flip(v: DVec2, horizontal: bool) -> DVec2 {
    if horizontal {
        DVec2::new(v.y, v.x)
    } else {
        v
    }
}

fn sort_items(items: &mut [Item], order: SortOrder) {
    match order {
        SortOrder::ExplicitOrder => items.sort_by_key(|i| i.order),
        SortOrder::Name => items.sort_by(|a, b| a.name.cmp(&b.name)),
    }
}

/// Effective alignment of an item across its line.
fn line_alignment(item: LineAlignment, container: LineAlignment) -> LineAlignment {
    match (item, container) {
        (LineAlignment::Automatic, LineAlignment::Automatic) => LineAlignment::Start,
        (LineAlignment::Automatic, fallback) => fallback,
        (own, _) => own,
    }
}

/// Stretch lines to fill the cross axis when requested, then stretch items
/// to their line where their alignment asks for it.
fn size_lines(lines: &mut [Line], items: &mut [Item], config: &ListConfig, space: f64, gap: f64) {
    if config.cross_flex == Distribution::Fill {
        let widths: Vec<f64> = lines.iter().map(|l| l.cross).collect();
        let ratios = vec![FlexRatios::new(1.0, 1.0); lines.len()];
        let target = (space - gap * lines.len().saturating_sub(1) as f64).round() as i64;

        for (line, width) in lines.iter_mut().zip(distribute(&widths, &ratios, target)) {
            line.cross = width as f64;
        }
    }

    for line in lines.iter() {
        for &i in &line.items {
            let item = &mut items[i];
            item.line_alignment = line_alignment(item.line_alignment, config.item_line_alignment);
            if item.line_alignment == LineAlignment::Stretch {
                item.size.x = line.cross;
            }
        }
    }
}

/// Fit unfilled lines to their widest member after aspect constraints ran.
fn refit_lines(lines: &mut [Line], items: &mut [Item]) {
    for line in lines.iter_mut() {
        let widest = line.items.iter().map(|&i| items[i].size.x).fold(0.0, f64::max);
        if widest == line.cross {
            continue;
        }
        line.cross = widest;
        for &i in &line.items {
            let item = &mut items[i];
            if item.line_alignment == LineAlignment::Stretch && item.aspect.is_none() {
                item.size.x = widest;
            }
        }
    }
}

/// Grow or shrink the items of one line to fill the main axis.
fn flex_line(line: &Line, items: &mut [Item], space: f64, gap: f64) {
    let sizes: Vec<f64> = line.items.iter().map(|&i| items[i].size.y).collect();
    let ratios: Vec<FlexRatios> = line.items.iter().map(|&i| items[i].ratios).collect();
    let target = (space - gap * line.items.len().saturating_sub(1) as f64).round() as i64;

    for (&i, size) in line.items.iter().zip(distribute(&sizes, &ratios, target)) {
        items[i].size.y = size as f64;
    }
}

/// Assign offsets: lines advance along the cross axis, items along the main axis.
fn place(lines: &[Line], items: &mut [Item], config: &ListConfig, space: DVec2, gap: DVec2) {
    let used_cross = span(lines.iter().map(|l| l.cross), gap.x);
    let across = Spacing::resolve(
        config.cross_flex,
        config.cross_alignment,
        space.x,
        used_cross,
        lines.len(),
        gap.x,
    );

    let mut line_cursor = across.lead;
    for line in lines {
        let used_main = span(line.items.iter().map(|&i| items[i].size.y), gap.y);
        let along = Spacing::resolve(
            config.main_flex,
            config.main_alignment,
            space.y,
            used_main,
            line.items.len(),
            gap.y,
        );

        let mut cursor = along.lead;
        for &i in &line.items {
            let item = &mut items[i];
            let within = match item.line_alignment {
                LineAlignment::Center => (line.cross - item.size.x) / 2.0,
                LineAlignment::End => line.cross - item.size.x,
                _ => 0.0,
            };
            item.offset = DVec2::new(line_cursor + within, cursor);
            cursor += item.size.y + along.between;
        }

        line_cursor += line.cross + across.between;
    }
}
