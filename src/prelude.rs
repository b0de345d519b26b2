//! Convenience re-exports for common pgtable usage
//!
//! This prelude module re-exports the most commonly used items from the pgtable
//! workspace, making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use pgtable::prelude::*;
//!
//! // Now you have access to the common pgtable types and traits
//! ```

// Core pgtable components
pub use crate::core::Database;
pub use crate::errors::DatabaseError;

// Re-export centralized config
pub use config::{AppConfig, AuditConfig, DatabaseConfig};

// Re-export commonly used table-store types for convenience
pub use table_store::prelude::*;

// Codec traits needed to declare columns
pub use type_mapping::{ColumnCodec, PgEnum};

// Common external dependencies
pub use sqlx;
pub use tokio;

// Commonly used sqlx types
pub use sqlx::{Postgres, Transaction};
