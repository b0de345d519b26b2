use crate::validation::ValidationError;
use thiserror::Error;
use type_mapping::CodecError;

#[derive(Error, Debug)]
pub enum TableError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Invalid conflict target: {0}")]
    InvalidConflictTarget(String),

    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),

    #[error("Invalid table definition: {0}")]
    InvalidTable(String),

    #[error("Column '{column}' not found in {table}")]
    ColumnNotFound { table: String, column: String },

    #[error("Statement on {0} has no values to write")]
    EmptyStatement(String),

    #[error("Invalid identifier: {0}")]
    Validation(#[from] ValidationError),

    /// Backend failures, passed through with the driver's diagnostics intact
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl TableError {
    pub fn column_not_found(table: impl Into<String>, column: impl Into<String>) -> Self {
        TableError::ColumnNotFound {
            table: table.into(),
            column: column.into(),
        }
    }

    /// True when a codec could not marshal a value
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, TableError::Codec(CodecError::TypeMismatch { .. }))
    }
}
