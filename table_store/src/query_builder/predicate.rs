//! Partial-index predicates for `ON CONFLICT (...) WHERE ...`
//!
//! The backend only accepts simple predicates in a conflict target, and the
//! columns there must be bare names, never `"table"."column"`. Values are
//! inlined as literals because the fragment is written once at construction.

use super::filter::{Expression, Op};
use crate::errors::TableError;
use type_mapping::sql_literal;

/// Render a conflict predicate: a single comparison, IS NULL or IS NOT NULL
pub fn index_predicate(op: &Op) -> Result<String, TableError> {
    match op {
        Op::Comparison {
            left,
            operator,
            right,
        } => Ok(format!(
            "{} {} {}",
            operand(left),
            operator.to_sql(),
            operand(right)
        )),
        Op::IsNull(expression) => Ok(format!("{} IS NULL", operand(expression))),
        Op::IsNotNull(expression) => Ok(format!("{} IS NOT NULL", operand(expression))),
        other => Err(TableError::UnsupportedExpression(format!(
            "{} node in conflict predicate; only comparison, is-null and is-not-null are supported",
            other.kind()
        ))),
    }
}

fn operand(expression: &Expression) -> String {
    match expression {
        Expression::Column(name) => name.quoted(),
        Expression::Value(value) => sql_literal(value),
        Expression::Raw(sql) => sql.clone(),
    }
}
