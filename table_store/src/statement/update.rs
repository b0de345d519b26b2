//! UPDATE statements

use super::builder::SqlStatement;
use super::values::ColumnValues;
use crate::errors::TableError;
use crate::query_builder::{Op, SqlGenerator};
use crate::schema::{Column, TableDescriptor};
use type_mapping::ColumnCodec;

#[derive(Debug, Clone)]
pub struct UpdateStatement<'a> {
    table: &'a TableDescriptor,
    values: ColumnValues,
}

impl<'a> UpdateStatement<'a> {
    pub fn new(table: &'a TableDescriptor) -> Self {
        Self {
            table,
            values: ColumnValues::default(),
        }
    }

    pub fn table(&self) -> &'a TableDescriptor {
        self.table
    }

    pub fn set<C: ColumnCodec>(
        &mut self,
        column: &Column<C>,
        value: &C::Native,
    ) -> Result<(), TableError> {
        self.values.set(self.table, column, value)
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    /// `UPDATE "t" SET "a" = $1, ... WHERE <condition>`
    pub fn to_statement(&self, condition: &Op) -> Result<SqlStatement, TableError> {
        if self.values.is_empty() {
            return Err(TableError::EmptyStatement(self.table.name().to_string()));
        }

        let mut statement = SqlStatement::new();
        statement.push_sql("UPDATE ");
        statement.push_sql(&self.table.table_name().quoted());
        statement.push_sql(" SET ");
        for (index, (name, value)) in self.values.ordered(self.table).enumerate() {
            if index > 0 {
                statement.push_sql(", ");
            }
            statement.push_sql(&name.quoted());
            statement.push_sql(" = ");
            statement.push_param(value.clone());
        }
        SqlGenerator::write_where(&mut statement, self.table, condition)?;
        Ok(statement)
    }
}
