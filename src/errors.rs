//! Error types for the pgtable crate
//!
//! This module contains all error types that can be returned by `Database` operations.

use config::ConfigError;
use table_store::TableError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
