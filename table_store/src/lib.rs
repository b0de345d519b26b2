//! Table Store - typed PostgreSQL tables for pgtable
//!
//! This crate provides table descriptors, the statements built against them,
//! record mappers, and the CRUD and auditing layers on top.

pub mod errors;
pub mod id_type;
pub mod prelude;
pub mod query_builder;
pub mod repository;
pub mod schema;
pub mod statement;
pub mod table;
pub mod traits;
pub mod validation;

pub use errors::TableError;
pub use id_type::{HasUniversalId, TableId, UniversalId};
pub use query_builder::{ComparisonOperator, Expression, Op, Pageable, SortOrder};
pub use repository::CrudRepository;
pub use schema::{Column, ColumnDef, TableDescriptor, UniqueConstraint};
pub use statement::{
    ConflictTarget, InsertStatement, ResultRow, SelectStatement, SqlStatement, UpdateStatement,
    UpsertOptions, UpsertStatement,
};
pub use table::{AuditMetadata, AuditableTable, CrudTable, DefaultPrincipal, ResolveWith};
pub use traits::{TableMapper, TableOperations};
pub use validation::{ValidatedFieldName, ValidatedTableName, ValidationError};
