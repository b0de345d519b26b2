//! # pgtable
//!
//! Typed PostgreSQL tables for Rust: records mapped to rows through column
//! codecs, CRUD on the caller's transaction, conflict-aware upserts and
//! audit stamping.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pgtable::prelude::*;
//! use pgtable::type_mapping::{BigIntCodec, TextCodec};
//!
//! #[derive(Debug, Clone)]
//! pub struct User {
//!     pub id: Option<i64>,
//!     pub name: String,
//! }
//!
//! pub struct UserTable {
//!     descriptor: TableDescriptor,
//!     id: Column<BigIntCodec>,
//!     name: Column<TextCodec>,
//! }
//!
//! impl UserTable {
//!     pub fn new() -> Result<Self, TableError> {
//!         let id = Column::new("id", BigIntCodec::new())?;
//!         let name = Column::new("name", TextCodec::new())?;
//!         let descriptor = TableDescriptor::builder("users")?
//!             .generated_id_column(&id)
//!             .column(&name)
//!             .unique_constraint("users_name_key", &["name"])
//!             .build()?;
//!         Ok(Self { descriptor, id, name })
//!     }
//! }
//!
//! impl TableMapper for UserTable {
//!     type Record = User;
//!     type Id = i64;
//!
//!     fn descriptor(&self) -> &TableDescriptor {
//!         &self.descriptor
//!     }
//!
//!     fn row_to_record(&self, row: &ResultRow) -> Result<User, TableError> {
//!         Ok(User { id: Some(row.get(&self.id)?), name: row.get(&self.name)? })
//!     }
//!
//!     fn insert_row_with_record(
//!         &self,
//!         statement: &mut InsertStatement<'_>,
//!         user: &User,
//!     ) -> Result<(), TableError> {
//!         statement.set(&self.name, &user.name)
//!     }
//!
//!     fn update_row_with_record(
//!         &self,
//!         statement: &mut UpdateStatement<'_>,
//!         user: &User,
//!     ) -> Result<(), TableError> {
//!         statement.set(&self.name, &user.name)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let database = Database::new(config.database.clone()).await?;
//!
//!     let users = AuditableTable::from_config(UserTable::new()?, &config.audit)?;
//!     database.migrate(users.descriptor(), false).await?;
//!     let users = CrudTable::new(users)?;
//!
//!     let mut tx = database.begin().await?;
//!     let id = users
//!         .insert(&mut *tx, &User { id: None, name: "John Doe".to_string() })
//!         .await?;
//!     let user = users.find_one_by_id(&mut *tx, &id, true).await?;
//!     tx.commit().await?;
//!
//!     println!("Created user: {:?}", user);
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod migration;
pub mod prelude;

// Re-export the main public types for convenience
pub use self::core::Database;
pub use errors::DatabaseError;

// Re-export centralized config
pub use config::{AppConfig, AuditConfig, DatabaseConfig};

// Re-export internal crates used by the public API
pub use table_store;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use sqlx;
pub use async_trait;
