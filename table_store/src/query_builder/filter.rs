//! Boolean expression trees
//!
//! Filters are built from typed columns, so comparison values are already
//! encoded by the column's codec when the tree is assembled.

use crate::errors::TableError;
use crate::schema::Column;
use crate::validation::ValidatedFieldName;
use type_mapping::{ArrayCodec, ColumnCodec, WireValue};

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq,       // =
    Ne,       // <>
    Lt,       // <
    Lte,      // <=
    Gt,       // >
    Gte,      // >=
    Like,     // LIKE
    ILike,    // ILIKE (case insensitive)
    Contains, // @> (PostgreSQL array containment)
}

impl ComparisonOperator {
    pub fn to_sql(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Ne => "<>",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Lte => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::Like => "LIKE",
            ComparisonOperator::ILike => "ILIKE",
            ComparisonOperator::Contains => "@>",
        }
    }
}

/// Operand of a condition
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Column of the table being queried
    Column(ValidatedFieldName),
    /// Encoded value, bound as a parameter or inlined as a literal
    Value(WireValue),
    /// SQL fragment passed through verbatim. Never build one from user input.
    Raw(String),
}

impl Expression {
    pub fn column<C: ColumnCodec>(column: &Column<C>) -> Self {
        Expression::Column(column.field_name().clone())
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Expression::Raw(sql.into())
    }
}

/// Query filter that can be nested
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Comparison {
        left: Expression,
        operator: ComparisonOperator,
        right: Expression,
    },
    IsNull(Expression),
    IsNotNull(Expression),
    /// `value = ANY (array)`
    Any {
        value: Expression,
        array: Expression,
    },
    And(Vec<Op>),
    Or(Vec<Op>),
}

impl Op {
    pub fn comparison(left: Expression, operator: ComparisonOperator, right: Expression) -> Self {
        Op::Comparison {
            left,
            operator,
            right,
        }
    }

    /// Create AND group
    pub fn and(self, other: Op) -> Self {
        match self {
            Op::And(mut filters) => {
                filters.push(other);
                Op::And(filters)
            }
            first => Op::And(vec![first, other]),
        }
    }

    /// Create OR group
    pub fn or(self, other: Op) -> Self {
        match self {
            Op::Or(mut filters) => {
                filters.push(other);
                Op::Or(filters)
            }
            first => Op::Or(vec![first, other]),
        }
    }

    /// Node name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Op::Comparison { .. } => "comparison",
            Op::IsNull(_) => "is-null",
            Op::IsNotNull(_) => "is-not-null",
            Op::Any { .. } => "any",
            Op::And(_) => "and",
            Op::Or(_) => "or",
        }
    }
}

impl<C: ColumnCodec> Column<C> {
    fn compare(&self, operator: ComparisonOperator, value: &C::Native) -> Result<Op, TableError> {
        Ok(Op::comparison(
            Expression::column(self),
            operator,
            Expression::Value(self.codec().encode(value)?),
        ))
    }

    /// Equal condition; a value encoding to NULL becomes `IS NULL`
    pub fn eq(&self, value: &C::Native) -> Result<Op, TableError> {
        let encoded = self.codec().encode(value)?;
        if encoded.is_null() {
            return Ok(self.is_null());
        }
        Ok(Op::comparison(
            Expression::column(self),
            ComparisonOperator::Eq,
            Expression::Value(encoded),
        ))
    }

    /// Not equal condition; a value encoding to NULL becomes `IS NOT NULL`
    pub fn ne(&self, value: &C::Native) -> Result<Op, TableError> {
        let encoded = self.codec().encode(value)?;
        if encoded.is_null() {
            return Ok(self.is_not_null());
        }
        Ok(Op::comparison(
            Expression::column(self),
            ComparisonOperator::Ne,
            Expression::Value(encoded),
        ))
    }

    pub fn lt(&self, value: &C::Native) -> Result<Op, TableError> {
        self.compare(ComparisonOperator::Lt, value)
    }

    pub fn lte(&self, value: &C::Native) -> Result<Op, TableError> {
        self.compare(ComparisonOperator::Lte, value)
    }

    pub fn gt(&self, value: &C::Native) -> Result<Op, TableError> {
        self.compare(ComparisonOperator::Gt, value)
    }

    pub fn gte(&self, value: &C::Native) -> Result<Op, TableError> {
        self.compare(ComparisonOperator::Gte, value)
    }

    /// LIKE condition
    pub fn like(&self, pattern: &str) -> Op {
        Op::comparison(
            Expression::column(self),
            ComparisonOperator::Like,
            Expression::Value(WireValue::from(type_mapping::PostgresValue::Text(
                pattern.to_string(),
            ))),
        )
    }

    /// ILIKE condition (case insensitive)
    pub fn ilike(&self, pattern: &str) -> Op {
        Op::comparison(
            Expression::column(self),
            ComparisonOperator::ILike,
            Expression::Value(WireValue::from(type_mapping::PostgresValue::Text(
                pattern.to_string(),
            ))),
        )
    }

    /// Comparison against another column of the same table
    pub fn eq_column<D: ColumnCodec>(&self, other: &Column<D>) -> Op {
        Op::comparison(
            Expression::column(self),
            ComparisonOperator::Eq,
            Expression::column(other),
        )
    }

    /// IS NULL condition
    pub fn is_null(&self) -> Op {
        Op::IsNull(Expression::column(self))
    }

    /// IS NOT NULL condition
    pub fn is_not_null(&self) -> Op {
        Op::IsNotNull(Expression::column(self))
    }
}

impl<C: ColumnCodec> Column<ArrayCodec<C>> {
    /// `value = ANY (column)`; a value encoding to NULL becomes `column IS NULL`
    pub fn any(&self, value: &C::Native) -> Result<Op, TableError> {
        let encoded = self.codec().inner().encode(value)?;
        if encoded.is_null() {
            return Ok(self.is_null());
        }
        Ok(Op::Any {
            value: Expression::Value(encoded),
            array: Expression::column(self),
        })
    }

    /// `column @> ARRAY[...]`
    #[allow(clippy::ptr_arg)]
    pub fn contains(&self, values: &Vec<C::Native>) -> Result<Op, TableError> {
        self.compare(ComparisonOperator::Contains, values)
    }
}
