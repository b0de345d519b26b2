//! Column codecs between Rust types and PostgreSQL
//!
//! This crate provides the wire representation shared across the pgtable
//! workspace and the codecs that marshal values the driver has no native
//! support for: arrays, network addresses, intervals, enumerations and JSONB.

pub mod array;
pub mod codec;
pub mod enumeration;
pub mod errors;
pub mod inet;
pub mod interval;
pub mod json;
pub mod sql;
pub mod types;
pub mod wire;

pub use array::ArrayCodec;
pub use codec::{
    BigIntCodec, BooleanCodec, ColumnCodec, IntegerCodec, NullableCodec, ScalarCodec, TextCodec,
    TimestampCodec, UuidCodec,
};
pub use enumeration::{EnumCodec, PgEnum};
pub use errors::CodecError;
pub use inet::InetCodec;
pub use interval::IntervalCodec;
pub use json::JsonbCodec;
pub use sql::{base_type_name, quote_literal, sql_literal, wire_text};
pub use types::{NativeScalar, PostgresValue};
pub use wire::{ArrayValue, IntervalValue, TypedObject, WireValue};
