//! Pool-backed repository
//!
//! [`CrudRepository`] runs each table operation in its own transaction on a
//! connection from the pool. Use the table directly with `&mut *tx` when
//! several operations must commit together.

use crate::errors::TableError;
use crate::traits::TableOperations;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

pub struct CrudRepository<T> {
    pool: PgPool,
    table: Arc<T>,
}

impl<T> Clone for CrudRepository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            table: Arc::clone(&self.table),
        }
    }
}

impl<T: TableOperations> CrudRepository<T> {
    pub fn new(pool: PgPool, table: T) -> Self {
        Self {
            pool,
            table: Arc::new(table),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    /// Begin a transaction on the repository's pool
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, TableError> {
        Ok(self.pool.begin().await?)
    }

    pub async fn insert(&self, record: &T::Record) -> Result<T::Id, TableError> {
        let mut tx = self.begin().await?;
        let id = self.table.insert(&mut *tx, record).await?;
        tx.commit().await?;
        Ok(id)
    }

    pub async fn find_one_by_id(
        &self,
        id: &T::Id,
        for_update: bool,
    ) -> Result<Option<T::Record>, TableError> {
        let mut tx = self.begin().await?;
        let record = self.table.find_one_by_id(&mut *tx, id, for_update).await?;
        tx.commit().await?;
        Ok(record)
    }

    pub async fn find_all(&self, for_update: bool) -> Result<Vec<T::Record>, TableError> {
        let mut tx = self.begin().await?;
        let records = self.table.find_all(&mut *tx, for_update).await?;
        tx.commit().await?;
        Ok(records)
    }

    pub async fn update(&self, id: &T::Id, record: &T::Record) -> Result<u64, TableError> {
        let mut tx = self.begin().await?;
        let affected = self.table.update(&mut *tx, id, record).await?;
        tx.commit().await?;
        Ok(affected)
    }

    pub async fn delete_by_id(&self, id: &T::Id) -> Result<u64, TableError> {
        let mut tx = self.begin().await?;
        let affected = self.table.delete_by_id(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(affected)
    }
}
