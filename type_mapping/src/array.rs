//! Array columns

use crate::codec::ColumnCodec;
use crate::errors::CodecError;
use crate::sql::base_type_name;
use crate::wire::{ArrayValue, WireValue};

/// Codec for `T[]` columns, parameterized by the element codec.
///
/// Null elements coming back from the backend are dropped on decode.
#[derive(Debug, Clone)]
pub struct ArrayCodec<C> {
    inner: C,
}

impl<C: ColumnCodec> ArrayCodec<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Element type name used to tag driver arrays
    pub fn element_type(&self) -> String {
        base_type_name(&self.inner.sql_type()).to_string()
    }
}

impl<C: ColumnCodec> ColumnCodec for ArrayCodec<C> {
    type Native = Vec<C::Native>;

    fn sql_type(&self) -> String {
        format!("{} ARRAY", self.inner.sql_type())
    }

    fn encode(&self, value: &Vec<C::Native>) -> Result<WireValue, CodecError> {
        let elements = value
            .iter()
            .map(|element| self.inner.encode(element))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WireValue::Array(ArrayValue {
            element_type: self.element_type(),
            elements,
        }))
    }

    fn decode(&self, value: &WireValue) -> Result<Vec<C::Native>, CodecError> {
        match value {
            WireValue::Array(array) => array
                .elements
                .iter()
                .filter(|element| !element.is_null())
                .map(|element| self.inner.decode(element))
                .collect(),
            other => Err(CodecError::type_mismatch("array", other.describe())),
        }
    }
}
