//! Primitive values: the only shape parameters are allowed to take once
//! they've crossed the sandbox boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON value restricted to `string | number | boolean | null`.
///
/// Action parameters are declared primitives-only by the protocol (§3,
/// `ActionMessage` invariant). [`Primitive::from_value`] is the one place
/// that decides whether an arbitrary [`Value`] qualifies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
    /// A UTF-8 string.
    String(String),
    /// Any JSON number (integer or float).
    Number(serde_json::Number),
    /// A boolean.
    Bool(bool),
    /// JSON `null`.
    Null,
}

impl Primitive {
    /// Attempt to interpret `value` as a primitive.
    ///
    /// Returns `None` for objects, arrays, and anything else that isn't one
    /// of the four primitive JSON shapes.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Null => Some(Self::Null),
            Value::Object(_) | Value::Array(_) => None,
        }
    }

    /// Convert back to a [`Value`] for re-serialization onto the wire.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Null => Value::Null,
        }
    }
}
