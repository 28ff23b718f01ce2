//! Error types for the listflex engine.

use crate::types::NodeId;
use thiserror::Error;

/// Top-level error type for the listflex engine.
#[derive(Debug, Error)]
pub enum ListFlexError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Errors raised by a host tree binding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("Unknown node: {node:?}")]
    UnknownNode { node: NodeId },

    #[error("Node {node:?} has no parent")]
    Detached { node: NodeId },

    #[error("Cannot attach {child:?} under its own descendant {parent:?}")]
    CyclicParent { child: NodeId, parent: NodeId },
}

/// Problems found while resolving loosely-typed configuration.
///
/// These never abort a layout pass; the resolver substitutes a default and
/// reports the problem through logging.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Attribute '{attribute}' has type {found}, expected {expected}")]
    WrongType {
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Attribute '{attribute}' has unknown value '{value}'")]
    UnknownVariant { attribute: String, value: String },

    #[error("Attribute '{attribute}' value {value} is out of range")]
    OutOfRange { attribute: String, value: f64 },
}

/// Errors during layout computation.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}
