//! SQL clause generation
//!
//! WHERE conditions are written straight into a [`SqlStatement`] so that
//! placeholders are numbered consistently with the rest of the statement.

use crate::errors::TableError;
use crate::query_builder::filter::{Expression, Op};
use crate::query_builder::ordering::SortOrder;
use crate::schema::TableDescriptor;
use crate::statement::SqlStatement;

pub struct SqlGenerator;

impl SqlGenerator {
    /// Append ` WHERE <condition>`
    pub fn write_where(
        statement: &mut SqlStatement,
        table: &TableDescriptor,
        condition: &Op,
    ) -> Result<(), TableError> {
        statement.push_sql(" WHERE ");
        Self::write_condition(statement, table, condition)
    }

    pub fn write_condition(
        statement: &mut SqlStatement,
        table: &TableDescriptor,
        condition: &Op,
    ) -> Result<(), TableError> {
        match condition {
            Op::Comparison {
                left,
                operator,
                right,
            } => {
                Self::write_expression(statement, table, left)?;
                statement.push_sql(" ");
                statement.push_sql(operator.to_sql());
                statement.push_sql(" ");
                Self::write_expression(statement, table, right)
            }
            Op::IsNull(expression) => {
                Self::write_expression(statement, table, expression)?;
                statement.push_sql(" IS NULL");
                Ok(())
            }
            Op::IsNotNull(expression) => {
                Self::write_expression(statement, table, expression)?;
                statement.push_sql(" IS NOT NULL");
                Ok(())
            }
            Op::Any { value, array } => {
                Self::write_expression(statement, table, value)?;
                statement.push_sql(" = ANY (");
                Self::write_expression(statement, table, array)?;
                statement.push_sql(")");
                Ok(())
            }
            Op::And(filters) => Self::write_group(statement, table, filters, " AND ", "TRUE"),
            Op::Or(filters) => Self::write_group(statement, table, filters, " OR ", "FALSE"),
        }
    }

    fn write_group(
        statement: &mut SqlStatement,
        table: &TableDescriptor,
        filters: &[Op],
        separator: &str,
        empty: &str,
    ) -> Result<(), TableError> {
        if filters.is_empty() {
            statement.push_sql(empty);
            return Ok(());
        }

        statement.push_sql("(");
        for (index, filter) in filters.iter().enumerate() {
            if index > 0 {
                statement.push_sql(separator);
            }
            Self::write_condition(statement, table, filter)?;
        }
        statement.push_sql(")");
        Ok(())
    }

    fn write_expression(
        statement: &mut SqlStatement,
        table: &TableDescriptor,
        expression: &Expression,
    ) -> Result<(), TableError> {
        match expression {
            Expression::Column(name) => {
                table.require_column(name.as_str())?;
                statement.push_sql(&table.qualified(name));
            }
            Expression::Value(value) => statement.push_param(value.clone()),
            Expression::Raw(sql) => statement.push_sql(sql),
        }
        Ok(())
    }

    /// Build ORDER BY clause; entries naming unknown columns are skipped
    pub fn build_order_clause(table: &TableDescriptor, order_by: &[(String, SortOrder)]) -> String {
        let order_items: Vec<String> = order_by
            .iter()
            .filter_map(|(field, order)| {
                table
                    .column(field)
                    .map(|column| format!("{} {}", table.qualified(column.field_name()), order.to_sql()))
            })
            .collect();

        if order_items.is_empty() {
            return "".to_string();
        }

        format!("ORDER BY {}", order_items.join(", "))
    }

    /// Build LIMIT/OFFSET clause; negative values are clamped to zero
    pub fn build_limit_clause(limit: Option<i64>, offset: Option<i64>) -> String {
        let mut clauses = Vec::new();

        if let Some(limit) = limit {
            clauses.push(format!("LIMIT {}", limit.max(0)));
        }

        if let Some(offset) = offset {
            clauses.push(format!("OFFSET {}", offset.max(0)));
        }

        clauses.join(" ")
    }
}
