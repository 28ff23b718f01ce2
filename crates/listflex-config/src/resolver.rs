//! Typed resolution of container and item configuration.

use listflex_core::{AttributeValue, ConfigError, HostError, HostTree, NodeId, UDim};
use tracing::warn;

use crate::choice::{
    snap, Alignment, Choice, Direction, Distribution, FlexMode, LineAlignment, Snapped, SortOrder,
};

/// Attribute names read by the resolver.
pub mod attrs {
    pub const DIRECTION: &str = "Direction";
    pub const MAIN_FLEX: &str = "MainFlex";
    pub const CROSS_FLEX: &str = "CrossFlex";
    pub const MAIN_ALIGNMENT: &str = "MainAlignment";
    pub const CROSS_ALIGNMENT: &str = "CrossAlignment";
    pub const ITEM_LINE_ALIGNMENT: &str = "ItemLineAlignment";
    pub const SORT_ORDER: &str = "SortOrder";
    pub const PADDING: &str = "Padding";
    pub const WRAPS: &str = "Wraps";

    pub const FLEX_MODE: &str = "FlexMode";
    pub const GROW_RATIO: &str = "GrowRatio";
    pub const SHRINK_RATIO: &str = "ShrinkRatio";
    pub const BASIS_SIZE: &str = "BasisSize";
}

/// Container-level layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ListConfig {
    /// Defines the main axis
    pub direction: Direction,
    /// Distribution of items within a line
    pub main_flex: Distribution,
    /// Distribution of lines across the container
    pub cross_flex: Distribution,
    /// Used when `main_flex` is `None`
    pub main_alignment: Alignment,
    /// Used when `cross_flex` is `None`
    pub cross_alignment: Alignment,
    /// Fallback for items whose own line alignment is automatic
    pub item_line_alignment: LineAlignment,
    pub sort_order: SortOrder,
    /// Gap between consecutive items and between lines
    pub padding: UDim,
    /// Overflowing items start a new line
    pub wraps: bool,
}

/// Canonical grow and shrink weights of an item.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlexRatios {
    pub grow: f64,
    pub shrink: f64,
}

impl FlexRatios {
    pub const fn new(grow: f64, shrink: f64) -> Self {
        Self { grow, shrink }
    }
}

/// Per-item flex settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlexItemConfig {
    pub flex_mode: FlexMode,
    /// Explicit ratio, only used with `FlexMode::None`
    pub grow_ratio: f64,
    /// Explicit ratio, only used with `FlexMode::None`
    pub shrink_ratio: f64,
    pub line_alignment: LineAlignment,
}

impl FlexItemConfig {
    /// Collapse the flex mode into a (grow, shrink) pair.
    pub fn ratios(&self) -> FlexRatios {
        match self.flex_mode {
            FlexMode::Grow => FlexRatios::new(1.0, 0.0),
            FlexMode::Shrink => FlexRatios::new(0.0, 1.0),
            FlexMode::Fill => FlexRatios::new(1.0, 1.0),
            FlexMode::None => FlexRatios::new(self.grow_ratio.max(0.0), self.shrink_ratio.max(0.0)),
        }
    }
}

/// Read the container's layout configuration, repairing stored values.
pub fn resolve_list_config<H: HostTree + ?Sized>(
    host: &mut H,
    container: NodeId,
) -> Result<ListConfig, HostError> {
    let defaults = ListConfig::default();
    let mut r = Resolver { host, node: container };

    Ok(ListConfig {
        direction: r.choice(attrs::DIRECTION, defaults.direction)?,
        main_flex: r.choice(attrs::MAIN_FLEX, defaults.main_flex)?,
        cross_flex: r.choice(attrs::CROSS_FLEX, defaults.cross_flex)?,
        main_alignment: r.choice(attrs::MAIN_ALIGNMENT, defaults.main_alignment)?,
        cross_alignment: r.choice(attrs::CROSS_ALIGNMENT, defaults.cross_alignment)?,
        item_line_alignment: r.choice(attrs::ITEM_LINE_ALIGNMENT, defaults.item_line_alignment)?,
        sort_order: r.choice(attrs::SORT_ORDER, defaults.sort_order)?,
        padding: r.udim(attrs::PADDING, defaults.padding)?,
        wraps: r.flag(attrs::WRAPS, defaults.wraps)?,
    })
}

/// Read an item's flex configuration, repairing stored values.
pub fn resolve_item_config<H: HostTree + ?Sized>(
    host: &mut H,
    item: NodeId,
) -> Result<FlexItemConfig, HostError> {
    let defaults = FlexItemConfig::default();
    let mut r = Resolver { host, node: item };

    Ok(FlexItemConfig {
        flex_mode: r.choice(attrs::FLEX_MODE, defaults.flex_mode)?,
        grow_ratio: r.ratio(attrs::GROW_RATIO, defaults.grow_ratio)?,
        shrink_ratio: r.ratio(attrs::SHRINK_RATIO, defaults.shrink_ratio)?,
        line_alignment: r.choice(attrs::ITEM_LINE_ALIGNMENT, defaults.line_alignment)?,
    })
}

struct Resolver<'a, H: HostTree + ?Sized> {
    host: &'a mut H,
    node: NodeId,
}

impl<H: HostTree + ?Sized> Resolver<'_, H> {
    fn choice<T: Choice>(&mut self, attribute: &str, default: T) -> Result<T, HostError> {
        let value = match self.host.attribute(self.node, attribute)? {
            None => default,
            Some(AttributeValue::Text(text)) => match snap(&text, default) {
                Snapped::Exact(v) | Snapped::Nearest(v) => v,
                Snapped::Fallback(v) => {
                    self.report(ConfigError::UnknownVariant {
                        attribute: attribute.to_string(),
                        value: text.clone(),
                    });
                    v
                }
            },
            Some(other) => {
                self.report(wrong_type(attribute, "text", &other));
                default
            }
        };

        self.store(attribute, AttributeValue::Text(value.name().to_string()))?;
        Ok(value)
    }

    fn flag(&mut self, attribute: &str, default: bool) -> Result<bool, HostError> {
        let value = match self.host.attribute(self.node, attribute)? {
            None => default,
            Some(AttributeValue::Bool(b)) => b,
            Some(other) => {
                self.report(wrong_type(attribute, "bool", &other));
                default
            }
        };

        self.store(attribute, AttributeValue::Bool(value))?;
        Ok(value)
    }

    fn ratio(&mut self, attribute: &str, default: f64) -> Result<f64, HostError> {
        let value = match self.host.attribute(self.node, attribute)? {
            None => default,
            Some(AttributeValue::Number(n)) if n.is_finite() && n >= 0.0 => n,
            Some(AttributeValue::Number(n)) => {
                self.report(ConfigError::OutOfRange { attribute: attribute.to_string(), value: n });
                if n.is_finite() { 0.0 } else { default }
            }
            Some(other) => {
                self.report(wrong_type(attribute, "number", &other));
                default
            }
        };

        self.store(attribute, AttributeValue::Number(value))?;
        Ok(value)
    }

    fn udim(&mut self, attribute: &str, default: UDim) -> Result<UDim, HostError> {
        let value = match self.host.attribute(self.node, attribute)? {
            None => default,
            Some(stored) => match stored.as_udim() {
                Some(u) if u.scale.is_finite() && u.offset.is_finite() => u,
                _ => {
                    self.report(wrong_type(attribute, "udim", &stored));
                    default
                }
            },
        };

        self.store(attribute, AttributeValue::UDim(value))?;
        Ok(value)
    }

    /// Write the resolved value back unless it is already stored verbatim.
    fn store(&mut self, attribute: &str, value: AttributeValue) -> Result<(), HostError> {
        if self.host.attribute(self.node, attribute)?.as_ref() != Some(&value) {
            self.host.set_attribute(self.node, attribute, value)?;
        }
        Ok(())
    }

    fn report(&self, error: ConfigError) {
        warn!(node = ?self.node, %error, "replacing invalid layout attribute");
    }
}

fn wrong_type(attribute: &str, expected: &'static str, found: &AttributeValue) -> ConfigError {
    ConfigError::WrongType {
        attribute: attribute.to_string(),
        expected,
        found: found.type_name(),
    }
}
