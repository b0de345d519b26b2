//! Schema setup helpers
//!
//! Creates the tables, enum types and unique indexes described by table
//! descriptors. These are conveniences for tests and small deployments, not a
//! versioned migration system.

use crate::core::Database;
use crate::errors::DatabaseError;
use table_store::query_builder::Op;
use table_store::schema::{
    create_enum_type_sql, create_unique_index_sql, drop_enum_type_sql, TableDescriptor,
};
use type_mapping::{EnumCodec, PgEnum};

impl Database {
    /// Create the table for a descriptor.
    /// If recreate is true, drops existing table first
    pub async fn migrate(
        &self,
        table: &TableDescriptor,
        recreate: bool,
    ) -> Result<(), DatabaseError> {
        if recreate {
            let drop_sql = table.drop_table_sql();
            debug_log!("Dropping table with SQL: {}", drop_sql);
            sqlx::query(&drop_sql).execute(self.pool()).await?;
        }

        let create_table_sql = table.create_table_sql();
        debug_log!("Creating table with SQL: {}", create_table_sql);
        sqlx::query(&create_table_sql).execute(self.pool()).await?;
        Ok(())
    }

    /// Create the enumeration type behind an enum codec.
    /// If recreate is true, drops the type first; otherwise an existing type is kept
    pub async fn create_enum_type<E: PgEnum>(
        &self,
        codec: &EnumCodec<E>,
        recreate: bool,
    ) -> Result<(), DatabaseError> {
        if recreate {
            let drop_sql = drop_enum_type_sql(codec)?;
            debug_log!("Dropping type with SQL: {}", drop_sql);
            sqlx::query(&drop_sql).execute(self.pool()).await?;
        }

        let create_sql = create_enum_type_sql(codec)?;
        // CREATE TYPE has no IF NOT EXISTS form
        let guarded = format!(
            "DO $$ BEGIN {}; EXCEPTION WHEN duplicate_object THEN NULL; END $$",
            create_sql
        );
        debug_log!("Creating type with SQL: {}", create_sql);
        sqlx::query(&guarded).execute(self.pool()).await?;
        Ok(())
    }

    /// Create a unique index, partial when a predicate is given
    pub async fn create_unique_index(
        &self,
        table: &TableDescriptor,
        name: &str,
        columns: &[&str],
        predicate: Option<&Op>,
    ) -> Result<(), DatabaseError> {
        let index_sql = create_unique_index_sql(table, name, columns, predicate)?;
        debug_log!("Creating index with SQL: {}", index_sql);
        sqlx::query(&index_sql).execute(self.pool()).await?;
        Ok(())
    }
}
