//! Trait definitions
//!
//! This module defines the CRUD contract every table exposes.

use crate::errors::TableError;
use crate::id_type::TableId;
use async_trait::async_trait;
use sqlx::PgConnection;

/// CRUD operations on a table, executed on the caller's connection.
///
/// Pass `&mut *tx` to run inside a transaction; backend failures such as lock
/// timeouts propagate unchanged and leave the transaction for the caller to
/// roll back.
#[async_trait]
pub trait TableOperations: Send + Sync {
    type Record: Send + Sync;

    type Id: TableId;

    /// Inserts a record and returns its identifier
    async fn insert(
        &self,
        conn: &mut PgConnection,
        record: &Self::Record,
    ) -> Result<Self::Id, TableError>;

    /// Selects a record by id; with `for_update` the row stays locked until
    /// the transaction ends
    async fn find_one_by_id(
        &self,
        conn: &mut PgConnection,
        id: &Self::Id,
        for_update: bool,
    ) -> Result<Option<Self::Record>, TableError>;

    /// Selects all records, in no particular order
    async fn find_all(
        &self,
        conn: &mut PgConnection,
        for_update: bool,
    ) -> Result<Vec<Self::Record>, TableError>;

    /// Updates a record by id and returns the number of rows updated
    async fn update(
        &self,
        conn: &mut PgConnection,
        id: &Self::Id,
        record: &Self::Record,
    ) -> Result<u64, TableError>;

    /// Deletes a row by id and returns the number of rows deleted
    async fn delete_by_id(&self, conn: &mut PgConnection, id: &Self::Id)
        -> Result<u64, TableError>;
}
