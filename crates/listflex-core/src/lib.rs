//! Core types and host binding for the listflex layout engine.
//!
//! This crate provides the foundational types shared by the other listflex crates:
//! - Parent-relative size units (`UDim`, `UDim2`, `Insets`)
//! - Node identity, node kinds, and aspect-ratio constraints
//! - Loosely-typed attribute values as stored by the host
//! - The `HostTree` collaborator trait and an in-memory implementation
//! - Error types

pub mod attributes;
pub mod errors;
pub mod tree;
pub mod types;

pub use attributes::*;
pub use errors::*;
pub use tree::*;
pub use types::*;
