//! Layout configuration for listflex containers and items.
//!
//! Configuration is stored by the host as loosely-typed named attributes.
//! This crate is the single boundary where those values become the typed
//! [`ListConfig`] and [`FlexItemConfig`] the engine works with:
//!
//! 1. **Snapping**: free text is matched case-insensitively against each
//!    enumeration, falling back to a default instead of failing
//! 2. **Self-healing**: absent, wrong-typed, or non-canonical values are
//!    rewritten to the value that was actually used
//! 3. **Migration**: a legacy configuration object is folded into the
//!    attribute representation once

pub mod choice;
mod migration;
mod resolver;

pub use choice::{
    snap, Alignment, Choice, Direction, Distribution, FlexMode, LineAlignment, Snapped, SortOrder,
};
pub use migration::{migrate_legacy_config, legacy_attrs};
pub use resolver::{
    attrs, resolve_item_config, resolve_list_config, FlexItemConfig, FlexRatios, ListConfig,
};
