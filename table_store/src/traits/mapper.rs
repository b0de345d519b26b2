//! Record mapping
//!
//! A mapper binds a record type to a table: it reads records out of result
//! rows and writes them into insert, update and upsert statements. Insert and
//! update are separate because they may populate different columns.

use crate::errors::TableError;
use crate::id_type::TableId;
use crate::schema::TableDescriptor;
use crate::statement::{InsertStatement, ResultRow, UpdateStatement, UpsertStatement};

pub trait TableMapper: Send + Sync {
    /// The record type stored in the table
    type Record: Send + Sync;

    /// The identifier type of the table's id column
    type Id: TableId;

    fn descriptor(&self) -> &TableDescriptor;

    /// Transforms a database row to a record; called for every selected row
    fn row_to_record(&self, row: &ResultRow) -> Result<Self::Record, TableError>;

    /// Writes the values of an INSERT
    fn insert_row_with_record(
        &self,
        statement: &mut InsertStatement<'_>,
        record: &Self::Record,
    ) -> Result<(), TableError>;

    /// Writes the SET clause of an UPDATE
    fn update_row_with_record(
        &self,
        statement: &mut UpdateStatement<'_>,
        record: &Self::Record,
    ) -> Result<(), TableError>;

    /// Writes the values of an upsert; defaults to the insert mapping
    fn upsert_row_with_record(
        &self,
        statement: &mut UpsertStatement<'_>,
        record: &Self::Record,
    ) -> Result<(), TableError> {
        self.insert_row_with_record(statement.insert_mut(), record)
    }
}
