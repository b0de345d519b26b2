//! SQL text utilities
//!
//! This module renders wire values as SQL text: literals for inlined
//! fragments, and the textual form used when a value is bound as text and
//! cast to its backend type.

use crate::interval::{format_duration, format_interval_value};
use crate::types::PostgresValue;
use crate::wire::WireValue;

/// The portion of a SQL type before any parenthesized qualifier
/// (`VARCHAR(255)` becomes `VARCHAR`)
pub fn base_type_name(sql_type: &str) -> &str {
    sql_type.split('(').next().unwrap_or(sql_type).trim()
}

/// Quote a string as a SQL literal, doubling embedded quotes
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Textual form of a value, `None` for NULL
pub fn wire_text(value: &WireValue) -> Option<String> {
    match value {
        WireValue::Scalar(scalar) => scalar_text(scalar),
        WireValue::Object(object) => object.value.clone(),
        WireValue::Interval(interval) => Some(format_interval_value(interval)),
        WireValue::Array(array) => Some(array_literal(&array.elements)),
    }
}

fn scalar_text(value: &PostgresValue) -> Option<String> {
    match value {
        PostgresValue::Text(s) => Some(s.clone()),
        PostgresValue::Integer(n) => Some(n.to_string()),
        PostgresValue::BigInt(n) => Some(n.to_string()),
        PostgresValue::SmallInt(n) => Some(n.to_string()),
        PostgresValue::Float(f) => Some(f.to_string()),
        PostgresValue::Boolean(b) => Some(b.to_string()),
        PostgresValue::Uuid(u) => Some(u.to_string()),
        PostgresValue::Timestamp(ts) => Some(ts.to_rfc3339()),
        PostgresValue::Json(v) => Some(v.to_string()),
        PostgresValue::Inet(ip) => Some(ip.to_string()),
        PostgresValue::Interval(d) => Some(format_duration(d)),
        PostgresValue::Null => None,
    }
}

/// PostgreSQL array literal (`{1,2,NULL}`) with every element double-quoted
fn array_literal(elements: &[WireValue]) -> String {
    let rendered: Vec<String> = elements
        .iter()
        .map(|element| match wire_text(element) {
            Some(text) => format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\"")),
            None => "NULL".to_string(),
        })
        .collect();
    format!("{{{}}}", rendered.join(","))
}

/// Render a value as an inline SQL literal
pub fn sql_literal(value: &WireValue) -> String {
    match value {
        WireValue::Scalar(scalar) => match scalar {
            PostgresValue::Null => "NULL".to_string(),
            PostgresValue::Integer(n) => n.to_string(),
            PostgresValue::BigInt(n) => n.to_string(),
            PostgresValue::SmallInt(n) => n.to_string(),
            PostgresValue::Float(f) => f.to_string(),
            PostgresValue::Boolean(true) => "TRUE".to_string(),
            PostgresValue::Boolean(false) => "FALSE".to_string(),
            PostgresValue::Text(s) => quote_literal(s),
            PostgresValue::Uuid(u) => format!("{}::UUID", quote_literal(&u.to_string())),
            PostgresValue::Timestamp(ts) => {
                format!("{}::TIMESTAMPTZ", quote_literal(&ts.to_rfc3339()))
            }
            PostgresValue::Json(v) => format!("{}::JSONB", quote_literal(&v.to_string())),
            PostgresValue::Inet(ip) => format!("{}::INET", quote_literal(&ip.to_string())),
            PostgresValue::Interval(d) => {
                format!("{}::INTERVAL", quote_literal(&format_duration(d)))
            }
        },
        WireValue::Object(object) => match &object.value {
            Some(text) => format!("{}::{}", quote_literal(text), object.type_name),
            None => format!("NULL::{}", object.type_name),
        },
        WireValue::Interval(interval) => format!(
            "{}::INTERVAL",
            quote_literal(&format_interval_value(interval))
        ),
        WireValue::Array(array) => format!(
            "{}::{}[]",
            quote_literal(&array_literal(&array.elements)),
            array.element_type
        ),
    }
}
