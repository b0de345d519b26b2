//! Result rows in wire form
//!
//! Each column of a fetched row is read into a [`WireValue`] by its backend
//! type, then decoded by whichever column codec the caller asks with. Columns
//! of a type the reader does not know are kept as unreadable cells and only
//! fail when a codec asks for them.

use crate::errors::TableError;
use crate::schema::Column;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::postgres::types::PgInterval;
use sqlx::postgres::{PgRow, PgTypeKind};
use sqlx::types::ipnetwork::IpNetwork;
use sqlx::{Column as _, Row, TypeInfo};
use type_mapping::{
    ArrayValue, CodecError, ColumnCodec, IntervalValue, PostgresValue, TypedObject, WireValue,
};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Value(WireValue),
    /// Backend type name of a column with no wire reading
    Unsupported(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRow {
    values: Vec<(String, Cell)>,
}

impl ResultRow {
    /// Build a row from already materialized values
    pub fn from_values<N: Into<String>>(values: impl IntoIterator<Item = (N, WireValue)>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(name, value)| (name.into(), Cell::Value(value)))
                .collect(),
        }
    }

    pub fn from_pg_row(row: &PgRow) -> Result<Self, TableError> {
        let mut values = Vec::with_capacity(row.len());
        for (index, column) in row.columns().iter().enumerate() {
            values.push((column.name().to_string(), read_wire(row, index)?));
        }
        Ok(Self { values })
    }

    fn cell(&self, name: &str) -> Option<&Cell> {
        self.values
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, cell)| cell)
    }

    /// Wire value of a column, `None` when it is missing or unreadable
    pub fn value(&self, name: &str) -> Option<&WireValue> {
        match self.cell(name)? {
            Cell::Value(value) => Some(value),
            Cell::Unsupported(_) => None,
        }
    }

    /// Decode a column with its codec
    pub fn get<C: ColumnCodec>(&self, column: &Column<C>) -> Result<C::Native, TableError> {
        match self.cell(column.name()) {
            Some(Cell::Value(value)) => Ok(column.codec().decode(value)?),
            Some(Cell::Unsupported(type_name)) => {
                Err(CodecError::type_mismatch(column.codec().sql_type(), type_name.as_str()).into())
            }
            None => Err(TableError::column_not_found("result row", column.name())),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn scalar<T>(value: Option<T>, wrap: impl FnOnce(T) -> PostgresValue) -> WireValue {
    match value {
        Some(v) => WireValue::Scalar(wrap(v)),
        None => WireValue::null(),
    }
}

fn array<T>(
    values: Option<Vec<Option<T>>>,
    element_type: &str,
    wrap: impl Fn(T) -> PostgresValue,
) -> WireValue {
    match values {
        Some(elements) => WireValue::Array(ArrayValue {
            element_type: element_type.to_string(),
            elements: elements
                .into_iter()
                .map(|element| scalar(element, &wrap))
                .collect(),
        }),
        None => WireValue::null(),
    }
}

/// Array whose elements are not plain scalars
fn typed_array<T>(
    values: Option<Vec<Option<T>>>,
    element_type: &str,
    wrap: impl Fn(T) -> WireValue,
) -> WireValue {
    match values {
        Some(elements) => WireValue::Array(ArrayValue {
            element_type: element_type.to_string(),
            elements: elements
                .into_iter()
                .map(|element| element.map(&wrap).unwrap_or_else(WireValue::null))
                .collect(),
        }),
        None => WireValue::null(),
    }
}

fn interval(value: PgInterval) -> WireValue {
    WireValue::Interval(IntervalValue {
        months: value.months,
        days: value.days,
        microseconds: value.microseconds,
    })
}

fn read_wire(row: &PgRow, index: usize) -> Result<Cell, TableError> {
    let type_info = row.column(index).type_info();

    match type_info.kind() {
        PgTypeKind::Enum(_) => {
            let label: Option<String> = row.try_get_unchecked(index)?;
            return Ok(Cell::Value(match label {
                Some(label) => WireValue::Object(TypedObject::new(type_info.name(), Some(label))),
                None => WireValue::null(),
            }));
        }
        PgTypeKind::Array(element) if matches!(element.kind(), PgTypeKind::Enum(_)) => {
            let labels: Option<Vec<Option<String>>> = row.try_get_unchecked(index)?;
            return Ok(Cell::Value(match labels {
                Some(labels) => WireValue::Array(ArrayValue {
                    element_type: element.name().to_string(),
                    elements: labels
                        .into_iter()
                        .map(|label| {
                            WireValue::Object(TypedObject::new(element.name(), label))
                        })
                        .collect(),
                }),
                None => WireValue::null(),
            }));
        }
        _ => {}
    }

    let value = match type_info.name() {
        "BOOL" => scalar(row.try_get::<Option<bool>, _>(index)?, PostgresValue::Boolean),
        "INT2" => scalar(row.try_get::<Option<i16>, _>(index)?, PostgresValue::SmallInt),
        "INT4" => scalar(row.try_get::<Option<i32>, _>(index)?, PostgresValue::Integer),
        "INT8" => scalar(row.try_get::<Option<i64>, _>(index)?, PostgresValue::BigInt),
        "FLOAT4" => scalar(row.try_get::<Option<f32>, _>(index)?, |v| {
            PostgresValue::Float(f64::from(v))
        }),
        "FLOAT8" => scalar(row.try_get::<Option<f64>, _>(index)?, PostgresValue::Float),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
            scalar(row.try_get::<Option<String>, _>(index)?, PostgresValue::Text)
        }
        "UUID" => scalar(row.try_get::<Option<Uuid>, _>(index)?, PostgresValue::Uuid),
        "TIMESTAMPTZ" => scalar(
            row.try_get::<Option<DateTime<Utc>>, _>(index)?,
            PostgresValue::Timestamp,
        ),
        "TIMESTAMP" => scalar(row.try_get::<Option<NaiveDateTime>, _>(index)?, |v| {
            PostgresValue::Timestamp(v.and_utc())
        }),
        "JSON" | "JSONB" => scalar(
            row.try_get::<Option<serde_json::Value>, _>(index)?,
            PostgresValue::Json,
        ),
        "INET" | "CIDR" => scalar(row.try_get::<Option<IpNetwork>, _>(index)?, |v| {
            PostgresValue::Inet(v.ip())
        }),
        "INTERVAL" => row
            .try_get::<Option<PgInterval>, _>(index)?
            .map(interval)
            .unwrap_or_else(WireValue::null),
        "BOOL[]" => array(
            row.try_get::<Option<Vec<Option<bool>>>, _>(index)?,
            "BOOLEAN",
            PostgresValue::Boolean,
        ),
        "INT2[]" => array(
            row.try_get::<Option<Vec<Option<i16>>>, _>(index)?,
            "SMALLINT",
            PostgresValue::SmallInt,
        ),
        "INT4[]" => array(
            row.try_get::<Option<Vec<Option<i32>>>, _>(index)?,
            "INTEGER",
            PostgresValue::Integer,
        ),
        "INT8[]" => array(
            row.try_get::<Option<Vec<Option<i64>>>, _>(index)?,
            "BIGINT",
            PostgresValue::BigInt,
        ),
        "FLOAT4[]" => array(
            row.try_get::<Option<Vec<Option<f32>>>, _>(index)?,
            "REAL",
            |v| PostgresValue::Float(f64::from(v)),
        ),
        "FLOAT8[]" => array(
            row.try_get::<Option<Vec<Option<f64>>>, _>(index)?,
            "DOUBLE PRECISION",
            PostgresValue::Float,
        ),
        "TEXT[]" | "VARCHAR[]" | "BPCHAR[]" | "NAME[]" => array(
            row.try_get_unchecked::<Option<Vec<Option<String>>>, _>(index)?,
            "TEXT",
            PostgresValue::Text,
        ),
        "UUID[]" => array(
            row.try_get::<Option<Vec<Option<Uuid>>>, _>(index)?,
            "UUID",
            PostgresValue::Uuid,
        ),
        "TIMESTAMPTZ[]" => array(
            row.try_get::<Option<Vec<Option<DateTime<Utc>>>>, _>(index)?,
            "TIMESTAMPTZ",
            PostgresValue::Timestamp,
        ),
        "TIMESTAMP[]" => array(
            row.try_get::<Option<Vec<Option<NaiveDateTime>>>, _>(index)?,
            "TIMESTAMP",
            |v| PostgresValue::Timestamp(v.and_utc()),
        ),
        "JSON[]" | "JSONB[]" => array(
            row.try_get_unchecked::<Option<Vec<Option<serde_json::Value>>>, _>(index)?,
            "JSONB",
            PostgresValue::Json,
        ),
        "INET[]" | "CIDR[]" => array(
            row.try_get::<Option<Vec<Option<IpNetwork>>>, _>(index)?,
            "INET",
            |v| PostgresValue::Inet(v.ip()),
        ),
        "INTERVAL[]" => typed_array(
            row.try_get::<Option<Vec<Option<PgInterval>>>, _>(index)?,
            "INTERVAL",
            interval,
        ),
        other => return Ok(Cell::Unsupported(other.to_string())),
    };

    Ok(Cell::Value(value))
}
