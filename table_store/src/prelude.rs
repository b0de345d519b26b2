//! Convenience re-exports for common table-store usage

// Core traits
pub use crate::traits::{TableMapper, TableOperations};

// Error types
pub use crate::errors::TableError;

// Tables and repositories
pub use crate::repository::CrudRepository;
pub use crate::table::{
    AuditColumns, AuditMetadata, AuditableTable, CrudTable, DefaultPrincipal, PrincipalResolver,
    ResolveWith,
};

// Schema
pub use crate::schema::{Column, TableDescriptor};

// Statements handed to mappers
pub use crate::statement::{
    InsertStatement, ResultRow, UpdateStatement, UpsertOptions, UpsertStatement,
};

// ID types
pub use crate::id_type::{HasUniversalId, TableId, UniversalId};

// Query building
pub use crate::query_builder::{Op, Pageable, SortOrder};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use sqlx::{PgConnection, PgPool};
