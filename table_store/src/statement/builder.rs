//! Parameterized SQL under construction
//!
//! Values are appended as numbered placeholders and bound in order when the
//! statement runs. Values the driver cannot bind natively travel as text with
//! an explicit cast to their backend type.

use super::row::ResultRow;
use crate::errors::TableError;
use sqlx::postgres::types::PgInterval;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::{PgConnection, Postgres};
use type_mapping::{wire_text, PostgresValue, WireValue};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlStatement {
    sql: String,
    params: Vec<WireValue>,
}

impl SqlStatement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[WireValue] {
        &self.params
    }

    pub fn push_sql(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append a placeholder for `value`; SQL NULL is written inline
    pub fn push_param(&mut self, value: WireValue) {
        if let WireValue::Scalar(PostgresValue::Null) = value {
            self.sql.push_str("NULL");
            return;
        }

        self.params.push(value);
        let index = self.params.len();
        self.sql.push('$');
        self.sql.push_str(&index.to_string());
        if let Some(cast) = self.params.last().and_then(placeholder_cast) {
            self.sql.push_str("::");
            self.sql.push_str(&cast);
        }
    }

    fn query(&self) -> Query<'_, Postgres, PgArguments> {
        self.params
            .iter()
            .fold(sqlx::query(&self.sql), |query, value| bind_wire(query, value))
    }

    /// Execute and return the number of affected rows
    pub async fn execute(&self, conn: &mut PgConnection) -> Result<u64, TableError> {
        tracing::debug!(sql = %self.sql, "Executing statement");
        tracing::trace!(params = self.params.len(), "Statement parameters");
        let result = self.query().execute(conn).await?;
        Ok(result.rows_affected())
    }

    pub async fn fetch_all(&self, conn: &mut PgConnection) -> Result<Vec<ResultRow>, TableError> {
        tracing::debug!(sql = %self.sql, "Fetching rows");
        tracing::trace!(params = self.params.len(), "Statement parameters");
        let rows = self.query().fetch_all(conn).await?;
        rows.iter().map(ResultRow::from_pg_row).collect()
    }

    pub async fn fetch_optional(
        &self,
        conn: &mut PgConnection,
    ) -> Result<Option<ResultRow>, TableError> {
        tracing::debug!(sql = %self.sql, "Fetching row");
        tracing::trace!(params = self.params.len(), "Statement parameters");
        let row = self.query().fetch_optional(conn).await?;
        row.as_ref().map(ResultRow::from_pg_row).transpose()
    }

    pub async fn fetch_one(&self, conn: &mut PgConnection) -> Result<ResultRow, TableError> {
        self.fetch_optional(conn)
            .await?
            .ok_or(TableError::Database(sqlx::Error::RowNotFound))
    }
}

/// Backend type a placeholder is cast to, for values bound as text
fn placeholder_cast(value: &WireValue) -> Option<String> {
    match value {
        WireValue::Object(object) => Some(object.type_name.clone()),
        WireValue::Array(array) => Some(format!("{}[]", array.element_type)),
        WireValue::Scalar(PostgresValue::Inet(_)) => Some("INET".to_string()),
        WireValue::Scalar(PostgresValue::Interval(_)) => Some("INTERVAL".to_string()),
        WireValue::Scalar(_) | WireValue::Interval(_) => None,
    }
}

fn bind_wire<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &WireValue,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        WireValue::Scalar(scalar) => match scalar {
            PostgresValue::Text(v) => query.bind(v.clone()),
            PostgresValue::Integer(v) => query.bind(*v),
            PostgresValue::BigInt(v) => query.bind(*v),
            PostgresValue::SmallInt(v) => query.bind(*v),
            PostgresValue::Float(v) => query.bind(*v),
            PostgresValue::Boolean(v) => query.bind(*v),
            PostgresValue::Uuid(v) => query.bind(*v),
            PostgresValue::Timestamp(v) => query.bind(*v),
            PostgresValue::Json(v) => query.bind(Json(v.clone())),
            PostgresValue::Inet(_) | PostgresValue::Interval(_) | PostgresValue::Null => {
                query.bind(wire_text(value))
            }
        },
        WireValue::Object(object) => query.bind(object.value.clone()),
        WireValue::Interval(interval) => query.bind(PgInterval {
            months: interval.months,
            days: interval.days,
            microseconds: interval.microseconds,
        }),
        WireValue::Array(array) => query.bind(
            array
                .elements
                .iter()
                .map(wire_text)
                .collect::<Vec<Option<String>>>(),
        ),
    }
}
