//! Typed column declarations

use crate::errors::TableError;
use crate::validation::ValidatedFieldName;
use type_mapping::{ColumnCodec, NullableCodec};

/// A named column bound to the codec that marshals its values
#[derive(Debug, Clone)]
pub struct Column<C> {
    name: ValidatedFieldName,
    codec: C,
    nullable: bool,
}

impl<C: ColumnCodec> Column<C> {
    pub fn new(name: &str, codec: C) -> Result<Self, TableError> {
        Ok(Self {
            name: ValidatedFieldName::new(name)?,
            codec,
            nullable: false,
        })
    }

    /// The same column accepting SQL NULL, read back as `Option`
    pub fn nullable(self) -> Column<NullableCodec<C>> {
        Column {
            name: self.name,
            codec: NullableCodec::new(self.codec),
            nullable: true,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn field_name(&self) -> &ValidatedFieldName {
        &self.name
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Untyped definition registered on a table descriptor
    pub fn def(&self) -> ColumnDef {
        ColumnDef {
            name: self.name.clone(),
            sql_type: self.codec.sql_type(),
            nullable: self.nullable,
        }
    }
}

/// Column as the table descriptor sees it: a name, its SQL type and nullability
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    name: ValidatedFieldName,
    sql_type: String,
    nullable: bool,
}

impl ColumnDef {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn field_name(&self) -> &ValidatedFieldName {
        &self.name
    }

    pub fn sql_type(&self) -> &str {
        &self.sql_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}
