//! INSERT statements

use super::builder::SqlStatement;
use super::values::ColumnValues;
use crate::errors::TableError;
use crate::schema::{Column, TableDescriptor};
use crate::validation::ValidatedFieldName;
use type_mapping::{ColumnCodec, WireValue};

/// A single-row insert populated column by column
#[derive(Debug, Clone)]
pub struct InsertStatement<'a> {
    table: &'a TableDescriptor,
    values: ColumnValues,
}

impl<'a> InsertStatement<'a> {
    pub fn new(table: &'a TableDescriptor) -> Self {
        Self {
            table,
            values: ColumnValues::default(),
        }
    }

    pub fn table(&self) -> &'a TableDescriptor {
        self.table
    }

    /// Encode `value` with the column's codec; the column must belong to the table
    pub fn set<C: ColumnCodec>(
        &mut self,
        column: &Column<C>,
        value: &C::Native,
    ) -> Result<(), TableError> {
        self.values.set(self.table, column, value)
    }

    pub(crate) fn set_wire(&mut self, name: ValidatedFieldName, value: WireValue) {
        self.values.set_wire(name, value);
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains(name)
    }

    /// `INSERT INTO "t" ("a", "b") VALUES ($1, $2)`
    pub fn to_statement(&self) -> SqlStatement {
        let mut statement = SqlStatement::new();
        statement.push_sql("INSERT INTO ");
        statement.push_sql(&self.table.table_name().quoted());

        if self.values.is_empty() {
            statement.push_sql(" DEFAULT VALUES");
            return statement;
        }

        let columns: Vec<String> = self
            .values
            .ordered(self.table)
            .map(|(name, _)| name.quoted())
            .collect();
        statement.push_sql(" (");
        statement.push_sql(&columns.join(", "));
        statement.push_sql(") VALUES (");
        for (index, (_, value)) in self.values.ordered(self.table).enumerate() {
            if index > 0 {
                statement.push_sql(", ");
            }
            statement.push_param(value.clone());
        }
        statement.push_sql(")");
        statement
    }
}
