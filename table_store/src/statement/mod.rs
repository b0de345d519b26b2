//! Statements executed against a table
//!
//! Every statement renders to a [`SqlStatement`] and runs on the caller's
//! connection, so it takes part in whatever transaction the caller holds.

pub mod builder;
pub mod insert;
pub mod row;
pub mod select;
pub mod update;
pub mod upsert;
pub mod values;

pub use builder::SqlStatement;
pub use insert::InsertStatement;
pub use row::ResultRow;
pub use select::{delete_statement, SelectStatement};
pub use update::UpdateStatement;
pub use upsert::{ConflictTarget, UpsertOptions, UpsertStatement};
pub use values::ColumnValues;
