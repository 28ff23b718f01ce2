//! Loosely-typed attribute values as stored on host nodes.

use indexmap::IndexMap;

use crate::types::{UDim, UDim2};

/// Named attribute storage of a single node, in insertion order.
pub type Attributes = IndexMap<String, AttributeValue>;

/// A value held in host attribute storage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    Bool(bool),
    Number(f64),
    Text(String),
    UDim(UDim),
    UDim2(UDim2),
}

impl AttributeValue {
    /// Human readable type name, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Number(_) => "number",
            AttributeValue::Text(_) => "text",
            AttributeValue::UDim(_) => "udim",
            AttributeValue::UDim2(_) => "udim2",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// UDim value; a bare number is read as a pixel offset.
    pub fn as_udim(&self) -> Option<UDim> {
        match self {
            AttributeValue::UDim(u) => Some(*u),
            AttributeValue::Number(n) => Some(UDim::from_offset(*n)),
            _ => None,
        }
    }

    pub fn as_udim2(&self) -> Option<UDim2> {
        match self {
            AttributeValue::UDim2(u) => Some(*u),
            _ => None,
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Number(n)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<UDim> for AttributeValue {
    fn from(u: UDim) -> Self {
        AttributeValue::UDim(u)
    }
}

impl From<UDim2> for AttributeValue {
    fn from(u: UDim2) -> Self {
        AttributeValue::UDim2(u)
    }
}
