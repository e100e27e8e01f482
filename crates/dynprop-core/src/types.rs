//! Property type tags
//!
//! A property name is bound to exactly one [`PropertyType`] at first use. Values pushed
//! from outside the process arrive as [`serde_json::Value`] and are checked against that
//! tag with [`PropertyType::matches`].
//!
//! [`PropertyKind`] links the Rust types a handle can hold to their tag. It is
//! implemented for exactly the supported kinds, so asking for any other kind is a
//! compile error rather than a runtime one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Runtime classification of a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// UTF-8 text
    Text,
    /// Signed 64-bit integer
    Integer,
    /// Floating-point number
    Double,
    /// Boolean flag
    Boolean,
    /// JSON object
    Structured,
}

impl PropertyType {
    /// All supported types
    pub const ALL: [PropertyType; 5] = [
        PropertyType::Text,
        PropertyType::Integer,
        PropertyType::Double,
        PropertyType::Boolean,
        PropertyType::Structured,
    ];

    /// Check whether `value` belongs to this type
    ///
    /// Numbers are not coerced: `45` is an integer and `45.0` is a double.
    /// `null` and arrays match no type.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (PropertyType::Text, Value::String(_)) => true,
            (PropertyType::Integer, Value::Number(n)) => n.is_i64(),
            (PropertyType::Double, Value::Number(n)) => n.is_f64(),
            (PropertyType::Boolean, Value::Bool(_)) => true,
            (PropertyType::Structured, Value::Object(_)) => true,
            _ => false,
        }
    }

    /// Lowercase name, as used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            PropertyType::Text => "text",
            PropertyType::Integer => "integer",
            PropertyType::Double => "double",
            PropertyType::Boolean => "boolean",
            PropertyType::Structured => "structured",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A Rust type that a property handle can hold
pub trait PropertyKind: Clone + Send + Sync + 'static {
    /// Tag established for names requested with this kind
    const TYPE: PropertyType;

    /// Extract a value of this kind, or `None` if `value` does not match [`Self::TYPE`]
    fn from_value(value: &Value) -> Option<Self>;

    /// Convert into a JSON value, or `None` if it has no JSON representation
    fn into_value(self) -> Option<Value>;
}

impl PropertyKind for String {
    const TYPE: PropertyType = PropertyType::Text;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }

    fn into_value(self) -> Option<Value> {
        Some(Value::String(self))
    }
}

impl PropertyKind for i64 {
    const TYPE: PropertyType = PropertyType::Integer;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }

    fn into_value(self) -> Option<Value> {
        Some(Value::Number(self.into()))
    }
}

impl PropertyKind for f64 {
    const TYPE: PropertyType = PropertyType::Double;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) if n.is_f64() => n.as_f64(),
            _ => None,
        }
    }

    fn into_value(self) -> Option<Value> {
        // NaN and infinities have no JSON form
        Number::from_f64(self).map(Value::Number)
    }
}

impl PropertyKind for bool {
    const TYPE: PropertyType = PropertyType::Boolean;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn into_value(self) -> Option<Value> {
        Some(Value::Bool(self))
    }
}

impl PropertyKind for Map<String, Value> {
    const TYPE: PropertyType = PropertyType::Structured;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }

    fn into_value(self) -> Option<Value> {
        Some(Value::Object(self))
    }
}
