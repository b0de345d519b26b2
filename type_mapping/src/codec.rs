//! Column codecs
//!
//! A codec bridges a native Rust type and its wire representation, and names
//! the SQL type used for the column in DDL.

use crate::errors::CodecError;
use crate::types::{NativeScalar, PostgresValue};
use crate::wire::WireValue;
use std::fmt;
use std::marker::PhantomData;

/// Bidirectional marshalling for one column type.
///
/// Codecs hold no mutable state; a single instance is shared by every
/// statement built against the column.
pub trait ColumnCodec: Clone + Send + Sync {
    type Native;

    /// SQL type clause for the column
    fn sql_type(&self) -> String;

    fn encode(&self, value: &Self::Native) -> Result<WireValue, CodecError>;

    fn decode(&self, value: &WireValue) -> Result<Self::Native, CodecError>;
}

/// Codec for types the driver handles natively
pub struct ScalarCodec<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> ScalarCodec<T> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for ScalarCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ScalarCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ScalarCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarCodec")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> ColumnCodec for ScalarCodec<T>
where
    T: NativeScalar + Clone,
{
    type Native = T;

    fn sql_type(&self) -> String {
        T::SQL_TYPE.to_string()
    }

    fn encode(&self, value: &T) -> Result<WireValue, CodecError> {
        Ok(WireValue::Scalar(value.clone().into_postgres_value()))
    }

    fn decode(&self, value: &WireValue) -> Result<T, CodecError> {
        match value {
            WireValue::Scalar(scalar) => T::from_postgres_value(scalar)
                .ok_or_else(|| CodecError::type_mismatch(T::SQL_TYPE, value.describe())),
            _ => Err(CodecError::type_mismatch(T::SQL_TYPE, value.describe())),
        }
    }
}

pub type TextCodec = ScalarCodec<String>;
pub type IntegerCodec = ScalarCodec<i32>;
pub type BigIntCodec = ScalarCodec<i64>;
pub type BooleanCodec = ScalarCodec<bool>;
pub type UuidCodec = ScalarCodec<uuid::Uuid>;
pub type TimestampCodec = ScalarCodec<chrono::DateTime<chrono::Utc>>;

/// Wraps a codec so that `None` travels as SQL NULL
#[derive(Debug, Clone)]
pub struct NullableCodec<C> {
    inner: C,
}

impl<C: ColumnCodec> NullableCodec<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: ColumnCodec> ColumnCodec for NullableCodec<C> {
    type Native = Option<C::Native>;

    fn sql_type(&self) -> String {
        self.inner.sql_type()
    }

    fn encode(&self, value: &Option<C::Native>) -> Result<WireValue, CodecError> {
        match value {
            Some(v) => self.inner.encode(v),
            None => Ok(WireValue::Scalar(PostgresValue::Null)),
        }
    }

    fn decode(&self, value: &WireValue) -> Result<Option<C::Native>, CodecError> {
        if value.is_null() {
            return Ok(None);
        }
        self.inner.decode(value).map(Some)
    }
}
