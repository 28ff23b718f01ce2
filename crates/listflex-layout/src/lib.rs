//! Flex list layout computation.
//!
//! Lays out the visible box children of a container along a main axis,
//! wrapping them into lines and distributing the lines along the cross axis.
//!
//! # Architecture
//!
//! 1. **Rounding**: largest-remainder allocation of fractional sizes to whole pixels
//! 2. **Distribution**: flexbox-style grow/shrink of sizes toward a target total
//! 3. **Lines**: wrapping and gap computation for distribution/alignment modes
//! 4. **Engine**: the full pass, from basis reset to final placement
//!
//! # Example
//!
//! ```ignore
//! use listflex_layout::LayoutEngine;
//!
//! let mut engine = LayoutEngine::new();
//! let report = engine.compute(&mut tree, container)?;
//!
//! for placement in &report.placements {
//!     println!("{:?}: {:?} {:?}", placement.node, placement.position, placement.size);
//! }
//! ```

mod distribute;
mod engine;
mod lines;
mod rounding;

pub use distribute::distribute;
pub use engine::{ItemPlacement, LayoutEngine, LayoutReport};
pub use lines::{wrap_lines, Line, Spacing};
pub use rounding::round_allocation;
