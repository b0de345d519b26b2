//! Wire representation
//!
//! Values crossing the driver boundary take one of two shapes: a raw scalar
//! the driver already understands, or a backend-typed wrapper (a type name plus
//! its textual value, an interval, an array). The shape differs between a live
//! parameter binding and a value materialized from a result row, so codecs
//! match on [`WireValue`] exhaustively instead of inspecting types at runtime.

use crate::types::PostgresValue;

/// Textual value tagged with the backend type it must be cast to
#[derive(Debug, Clone, PartialEq)]
pub struct TypedObject {
    pub type_name: String,
    pub value: Option<String>,
}

impl TypedObject {
    pub fn new(type_name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            type_name: type_name.into(),
            value,
        }
    }
}

/// Interval split the way the backend stores it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntervalValue {
    pub months: i32,
    pub days: i32,
    pub microseconds: i64,
}

/// Driver-level array: element base type plus elements (which may be null)
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    pub element_type: String,
    pub elements: Vec<WireValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    /// Native driver scalar, passed through as-is
    Scalar(PostgresValue),
    /// Backend-typed wrapper carrying a textual value
    Object(TypedObject),
    /// Backend interval wrapper
    Interval(IntervalValue),
    /// Backend array
    Array(ArrayValue),
}

impl WireValue {
    pub fn null() -> Self {
        WireValue::Scalar(PostgresValue::Null)
    }

    /// True for SQL NULL in either shape
    pub fn is_null(&self) -> bool {
        match self {
            WireValue::Scalar(value) => value.is_null(),
            WireValue::Object(object) => object.value.is_none(),
            WireValue::Interval(_) | WireValue::Array(_) => false,
        }
    }

    /// Description used in mismatch diagnostics
    pub fn describe(&self) -> String {
        match self {
            WireValue::Scalar(value) => format!("scalar {}", value.kind()),
            WireValue::Object(object) => format!("object of type {}", object.type_name),
            WireValue::Interval(_) => "interval".to_string(),
            WireValue::Array(array) => format!("array of {}", array.element_type),
        }
    }
}

impl From<PostgresValue> for WireValue {
    fn from(value: PostgresValue) -> Self {
        WireValue::Scalar(value)
    }
}
