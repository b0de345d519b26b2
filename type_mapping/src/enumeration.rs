//! User-defined enumeration columns

use crate::codec::ColumnCodec;
use crate::errors::CodecError;
use crate::types::PostgresValue;
use crate::wire::{TypedObject, WireValue};
use std::marker::PhantomData;

/// A Rust enum backed by a PostgreSQL `CREATE TYPE ... AS ENUM`.
///
/// Labels are matched exactly, so the Rust and SQL sides must spell them the
/// same way.
pub trait PgEnum: Sized + Copy + Send + Sync + 'static {
    fn variants() -> &'static [Self];

    fn label(&self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::variants()
            .iter()
            .copied()
            .find(|variant| variant.label() == label)
    }
}

#[derive(Debug)]
pub struct EnumCodec<E> {
    type_name: String,
    _phantom: PhantomData<fn() -> E>,
}

impl<E: PgEnum> EnumCodec<E> {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            _phantom: PhantomData,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Labels in declaration order, for creating the backing type
    pub fn labels(&self) -> Vec<&'static str> {
        E::variants().iter().map(PgEnum::label).collect()
    }

    fn resolve(&self, label: &str) -> Result<E, CodecError> {
        E::from_label(label).ok_or_else(|| {
            CodecError::type_mismatch(
                format!("label of enum {}", self.type_name),
                format!("'{}'", label),
            )
        })
    }
}

impl<E> Clone for EnumCodec<E> {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<E: PgEnum> ColumnCodec for EnumCodec<E> {
    type Native = E;

    fn sql_type(&self) -> String {
        self.type_name.clone()
    }

    fn encode(&self, value: &E) -> Result<WireValue, CodecError> {
        Ok(WireValue::Object(TypedObject::new(
            self.type_name.clone(),
            Some(value.label().to_string()),
        )))
    }

    fn decode(&self, value: &WireValue) -> Result<E, CodecError> {
        match value {
            WireValue::Object(TypedObject {
                value: Some(label), ..
            }) => self.resolve(label),
            WireValue::Scalar(PostgresValue::Text(label)) => self.resolve(label),
            other => Err(CodecError::type_mismatch(
                self.type_name.clone(),
                other.describe(),
            )),
        }
    }
}
