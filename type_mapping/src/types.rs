//! Type mapping definitions
//!
//! This module provides the raw scalar values a PostgreSQL driver produces
//! natively, and the conversions between them and Rust types.

use chrono::{DateTime, Utc};
use std::net::IpAddr;
use uuid::Uuid;

/// A scalar value as the driver hands it over, already in native form
#[derive(Debug, Clone, PartialEq)]
pub enum PostgresValue {
    Text(String),
    Integer(i32),
    BigInt(i64),
    SmallInt(i16),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
    Inet(IpAddr),
    Interval(chrono::Duration),
    Null,
}

impl PostgresValue {
    /// Short name of the variant, used in mismatch diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            PostgresValue::Text(_) => "text",
            PostgresValue::Integer(_) => "integer",
            PostgresValue::BigInt(_) => "bigint",
            PostgresValue::SmallInt(_) => "smallint",
            PostgresValue::Float(_) => "float",
            PostgresValue::Boolean(_) => "boolean",
            PostgresValue::Uuid(_) => "uuid",
            PostgresValue::Timestamp(_) => "timestamp",
            PostgresValue::Json(_) => "json",
            PostgresValue::Inet(_) => "inet",
            PostgresValue::Interval(_) => "interval",
            PostgresValue::Null => "null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PostgresValue::Null)
    }
}

/// Rust types with a direct driver representation.
///
/// `SQL_TYPE` is the column type used in DDL; `from_postgres_value` accepts
/// lossless widenings (an `i64` can be read from an `integer` column).
pub trait NativeScalar: Sized + Send + Sync {
    const SQL_TYPE: &'static str;

    fn into_postgres_value(self) -> PostgresValue;

    fn from_postgres_value(value: &PostgresValue) -> Option<Self>;
}

impl NativeScalar for String {
    const SQL_TYPE: &'static str = "TEXT";

    fn into_postgres_value(self) -> PostgresValue {
        PostgresValue::Text(self)
    }

    fn from_postgres_value(value: &PostgresValue) -> Option<Self> {
        match value {
            PostgresValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl NativeScalar for i16 {
    const SQL_TYPE: &'static str = "SMALLINT";

    fn into_postgres_value(self) -> PostgresValue {
        PostgresValue::SmallInt(self)
    }

    fn from_postgres_value(value: &PostgresValue) -> Option<Self> {
        match value {
            PostgresValue::SmallInt(n) => Some(*n),
            PostgresValue::Integer(n) => i16::try_from(*n).ok(),
            PostgresValue::BigInt(n) => i16::try_from(*n).ok(),
            _ => None,
        }
    }
}

impl NativeScalar for i32 {
    const SQL_TYPE: &'static str = "INTEGER";

    fn into_postgres_value(self) -> PostgresValue {
        PostgresValue::Integer(self)
    }

    fn from_postgres_value(value: &PostgresValue) -> Option<Self> {
        match value {
            PostgresValue::Integer(n) => Some(*n),
            PostgresValue::SmallInt(n) => Some(i32::from(*n)),
            PostgresValue::BigInt(n) => i32::try_from(*n).ok(),
            _ => None,
        }
    }
}

impl NativeScalar for i64 {
    const SQL_TYPE: &'static str = "BIGINT";

    fn into_postgres_value(self) -> PostgresValue {
        PostgresValue::BigInt(self)
    }

    fn from_postgres_value(value: &PostgresValue) -> Option<Self> {
        match value {
            PostgresValue::BigInt(n) => Some(*n),
            PostgresValue::Integer(n) => Some(i64::from(*n)),
            PostgresValue::SmallInt(n) => Some(i64::from(*n)),
            _ => None,
        }
    }
}

impl NativeScalar for f64 {
    const SQL_TYPE: &'static str = "DOUBLE PRECISION";

    fn into_postgres_value(self) -> PostgresValue {
        PostgresValue::Float(self)
    }

    fn from_postgres_value(value: &PostgresValue) -> Option<Self> {
        match value {
            PostgresValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl NativeScalar for bool {
    const SQL_TYPE: &'static str = "BOOLEAN";

    fn into_postgres_value(self) -> PostgresValue {
        PostgresValue::Boolean(self)
    }

    fn from_postgres_value(value: &PostgresValue) -> Option<Self> {
        match value {
            PostgresValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl NativeScalar for Uuid {
    const SQL_TYPE: &'static str = "UUID";

    fn into_postgres_value(self) -> PostgresValue {
        PostgresValue::Uuid(self)
    }

    fn from_postgres_value(value: &PostgresValue) -> Option<Self> {
        match value {
            PostgresValue::Uuid(u) => Some(*u),
            PostgresValue::Text(s) => Uuid::parse_str(s).ok(),
            _ => None,
        }
    }
}

impl NativeScalar for DateTime<Utc> {
    const SQL_TYPE: &'static str = "TIMESTAMP WITH TIME ZONE";

    fn into_postgres_value(self) -> PostgresValue {
        PostgresValue::Timestamp(self)
    }

    fn from_postgres_value(value: &PostgresValue) -> Option<Self> {
        match value {
            PostgresValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl From<String> for PostgresValue {
    fn from(val: String) -> Self {
        PostgresValue::Text(val)
    }
}

impl From<&str> for PostgresValue {
    fn from(val: &str) -> Self {
        PostgresValue::Text(val.to_string())
    }
}

impl From<i32> for PostgresValue {
    fn from(val: i32) -> Self {
        PostgresValue::Integer(val)
    }
}

impl From<i64> for PostgresValue {
    fn from(val: i64) -> Self {
        PostgresValue::BigInt(val)
    }
}

impl From<i16> for PostgresValue {
    fn from(val: i16) -> Self {
        PostgresValue::SmallInt(val)
    }
}

impl From<bool> for PostgresValue {
    fn from(val: bool) -> Self {
        PostgresValue::Boolean(val)
    }
}

impl From<Uuid> for PostgresValue {
    fn from(val: Uuid) -> Self {
        PostgresValue::Uuid(val)
    }
}

impl From<DateTime<Utc>> for PostgresValue {
    fn from(val: DateTime<Utc>) -> Self {
        PostgresValue::Timestamp(val)
    }
}

impl From<serde_json::Value> for PostgresValue {
    fn from(val: serde_json::Value) -> Self {
        PostgresValue::Json(val)
    }
}

impl From<IpAddr> for PostgresValue {
    fn from(val: IpAddr) -> Self {
        PostgresValue::Inet(val)
    }
}

impl<T> From<Option<T>> for PostgresValue
where
    T: Into<PostgresValue>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => PostgresValue::Null,
        }
    }
}
