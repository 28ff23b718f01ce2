//! One-time migration of legacy layout configuration objects.
//!
//! Older containers carried their settings on a dedicated child object whose
//! fields were named after screen axes. Migration copies those fields onto the
//! container as attributes, translating axis names into main/cross roles, and
//! then destroys the legacy object. Running it again finds nothing to do.

use listflex_core::{HostError, HostTree, NodeId, NodeKind};
use tracing::debug;

use crate::choice::{snap, Direction};
use crate::resolver::attrs;

/// Field names found on legacy configuration objects.
pub mod legacy_attrs {
    pub const FILL_DIRECTION: &str = "FillDirection";
    pub const HORIZONTAL_FLEX: &str = "HorizontalFlex";
    pub const VERTICAL_FLEX: &str = "VerticalFlex";
    pub const HORIZONTAL_ALIGNMENT: &str = "HorizontalAlignment";
    pub const VERTICAL_ALIGNMENT: &str = "VerticalAlignment";
    pub const ITEM_LINE_ALIGNMENT: &str = "ItemLineAlignment";
    pub const SORT_ORDER: &str = "SortOrder";
    pub const PADDING: &str = "Padding";
    pub const WRAPS: &str = "Wraps";
}

/// Fold a legacy configuration object into the container's attributes.
///
/// Attributes already present on the container win over legacy fields.
/// Returns `true` if a legacy object was found and removed.
pub fn migrate_legacy_config<H: HostTree + ?Sized>(
    host: &mut H,
    container: NodeId,
) -> Result<bool, HostError> {
    let mut legacy = Vec::new();
    for child in host.children(container)? {
        if host.kind(child)? == NodeKind::LegacyConfig {
            legacy.push(child);
        }
    }

    let Some(&source) = legacy.first() else {
        return Ok(false);
    };

    let direction = host
        .attribute(source, legacy_attrs::FILL_DIRECTION)?
        .and_then(|v| v.as_text().map(|t| snap(t, Direction::default()).value()))
        .unwrap_or_default();

    let (main, cross) = match direction {
        Direction::Vertical => (
            (legacy_attrs::VERTICAL_FLEX, legacy_attrs::VERTICAL_ALIGNMENT),
            (legacy_attrs::HORIZONTAL_FLEX, legacy_attrs::HORIZONTAL_ALIGNMENT),
        ),
        Direction::Horizontal => (
            (legacy_attrs::HORIZONTAL_FLEX, legacy_attrs::HORIZONTAL_ALIGNMENT),
            (legacy_attrs::VERTICAL_FLEX, legacy_attrs::VERTICAL_ALIGNMENT),
        ),
    };

    let mapping = [
        (legacy_attrs::FILL_DIRECTION, attrs::DIRECTION),
        (main.0, attrs::MAIN_FLEX),
        (main.1, attrs::MAIN_ALIGNMENT),
        (cross.0, attrs::CROSS_FLEX),
        (cross.1, attrs::CROSS_ALIGNMENT),
        (legacy_attrs::ITEM_LINE_ALIGNMENT, attrs::ITEM_LINE_ALIGNMENT),
        (legacy_attrs::SORT_ORDER, attrs::SORT_ORDER),
        (legacy_attrs::PADDING, attrs::PADDING),
        (legacy_attrs::WRAPS, attrs::WRAPS),
    ];

    for (from, to) in mapping {
        let Some(value) = host.attribute(source, from)? else {
            continue;
        };
        if host.attribute(container, to)?.is_none() {
            host.set_attribute(container, to, value)?;
        }
    }

    for node in legacy {
        host.destroy(node)?;
    }

    debug!(?container, ?direction, "migrated legacy layout configuration");
    Ok(true)
}
