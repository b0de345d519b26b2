//! Table descriptors
//!
//! A descriptor is the immutable schema of one table: its name, its columns in
//! declaration order, the single identifier column and any named unique
//! constraints. It is built once at startup and shared by every statement that
//! targets the table.

use super::column::{Column, ColumnDef};
use crate::errors::TableError;
use crate::query_builder::{index_predicate, Op};
use crate::validation::{ValidatedFieldName, ValidatedTableName};
use type_mapping::{quote_literal, ColumnCodec, EnumCodec, PgEnum};

/// Named `UNIQUE` constraint over one or more columns
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueConstraint {
    name: ValidatedFieldName,
    columns: Vec<ValidatedFieldName>,
}

impl UniqueConstraint {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn field_name(&self) -> &ValidatedFieldName {
        &self.name
    }

    pub fn columns(&self) -> &[ValidatedFieldName] {
        &self.columns
    }
}

#[derive(Debug, Clone)]
pub struct TableDescriptor {
    name: ValidatedTableName,
    columns: Vec<ColumnDef>,
    id_index: usize,
    id_generated: bool,
    unique_constraints: Vec<UniqueConstraint>,
}

impl TableDescriptor {
    pub fn builder(name: &str) -> Result<TableDescriptorBuilder, TableError> {
        Ok(TableDescriptorBuilder {
            name: ValidatedTableName::new(name)?,
            columns: Vec::new(),
            id: None,
            unique_constraints: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn table_name(&self) -> &ValidatedTableName {
        &self.name
    }

    /// Columns in declaration order
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn id_column(&self) -> &ColumnDef {
        &self.columns[self.id_index]
    }

    /// True when the backend assigns identifiers
    pub fn is_id_generated(&self) -> bool {
        self.id_generated
    }

    pub fn unique_constraints(&self) -> &[UniqueConstraint] {
        &self.unique_constraints
    }

    pub fn unique_constraint(&self, name: &str) -> Option<&UniqueConstraint> {
        self.unique_constraints
            .iter()
            .find(|constraint| constraint.name() == name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.name() == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Position of a column in declaration order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name() == name)
    }

    /// `"table"."column"`, the form used in WHERE and ORDER BY clauses
    pub fn qualified(&self, column: &ValidatedFieldName) -> String {
        format!("{}.{}", self.name.quoted(), column.quoted())
    }

    /// Selected column list, table-qualified
    pub fn select_list(&self) -> String {
        self.columns
            .iter()
            .map(|column| self.qualified(column.field_name()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub(crate) fn require_column(&self, name: &str) -> Result<&ColumnDef, TableError> {
        self.column(name)
            .ok_or_else(|| TableError::column_not_found(self.name(), name))
    }

    /// Copy of this descriptor with additional columns appended
    pub fn extend_with(&self, extra: Vec<ColumnDef>) -> Result<TableDescriptor, TableError> {
        let mut columns = self.columns.clone();
        for column in extra {
            if columns.iter().any(|existing| existing.name() == column.name()) {
                return Err(TableError::InvalidTable(format!(
                    "column '{}' is declared more than once on {}",
                    column.name(),
                    self.name
                )));
            }
            columns.push(column);
        }

        Ok(TableDescriptor {
            name: self.name.clone(),
            columns,
            id_index: self.id_index,
            id_generated: self.id_generated,
            unique_constraints: self.unique_constraints.clone(),
        })
    }

    /// Generate CREATE TABLE SQL
    pub fn create_table_sql(&self) -> String {
        let mut definitions: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let mut definition = format!("{} {}", column.field_name().quoted(), column.sql_type());
                if index == self.id_index {
                    if self.id_generated {
                        definition.push_str(" GENERATED BY DEFAULT AS IDENTITY");
                    }
                    definition.push_str(" PRIMARY KEY");
                } else if !column.is_nullable() {
                    definition.push_str(" NOT NULL");
                }
                definition
            })
            .collect();

        for constraint in &self.unique_constraints {
            let columns: Vec<String> = constraint
                .columns
                .iter()
                .map(ValidatedFieldName::quoted)
                .collect();
            definitions.push(format!(
                "CONSTRAINT {} UNIQUE ({})",
                constraint.name.quoted(),
                columns.join(", ")
            ));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name.quoted(),
            definitions.join(", ")
        )
    }

    /// Generate DROP TABLE SQL
    pub fn drop_table_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name.quoted())
    }
}

pub struct TableDescriptorBuilder {
    name: ValidatedTableName,
    columns: Vec<ColumnDef>,
    id: Option<(String, bool)>,
    unique_constraints: Vec<(String, Vec<String>)>,
}

impl TableDescriptorBuilder {
    /// Identifier column whose values the caller supplies
    pub fn id_column<C: ColumnCodec>(self, column: &Column<C>) -> Self {
        self.declare_id(column, false)
    }

    /// Identifier column filled by the backend (`GENERATED BY DEFAULT AS IDENTITY`)
    pub fn generated_id_column<C: ColumnCodec>(self, column: &Column<C>) -> Self {
        self.declare_id(column, true)
    }

    fn declare_id<C: ColumnCodec>(mut self, column: &Column<C>, generated: bool) -> Self {
        self.id = Some((column.name().to_string(), generated));
        self.columns.push(column.def());
        self
    }

    pub fn column<C: ColumnCodec>(mut self, column: &Column<C>) -> Self {
        self.columns.push(column.def());
        self
    }

    pub fn unique_constraint(mut self, name: &str, columns: &[&str]) -> Self {
        self.unique_constraints.push((
            name.to_string(),
            columns.iter().map(|column| column.to_string()).collect(),
        ));
        self
    }

    pub fn build(self) -> Result<TableDescriptor, TableError> {
        for (index, column) in self.columns.iter().enumerate() {
            if self.columns[..index]
                .iter()
                .any(|earlier| earlier.name() == column.name())
            {
                return Err(TableError::InvalidTable(format!(
                    "column '{}' is declared more than once on {}",
                    column.name(),
                    self.name
                )));
            }
        }

        let (id_name, id_generated) = self.id.ok_or_else(|| {
            TableError::InvalidTable(format!("{} has no identifier column", self.name))
        })?;
        let id_index = self
            .columns
            .iter()
            .position(|column| column.name() == id_name)
            .ok_or_else(|| {
                TableError::InvalidTable(format!("{} has no identifier column", self.name))
            })?;

        let mut unique_constraints = Vec::with_capacity(self.unique_constraints.len());
        for (name, columns) in self.unique_constraints {
            if columns.is_empty() {
                return Err(TableError::InvalidTable(format!(
                    "unique constraint '{}' on {} has no columns",
                    name, self.name
                )));
            }
            let mut resolved = Vec::with_capacity(columns.len());
            for column in &columns {
                let def = self
                    .columns
                    .iter()
                    .find(|def| def.name() == column)
                    .ok_or_else(|| TableError::column_not_found(self.name.as_str(), column.as_str()))?;
                resolved.push(def.field_name().clone());
            }
            unique_constraints.push(UniqueConstraint {
                name: ValidatedFieldName::new(&name)?,
                columns: resolved,
            });
        }

        Ok(TableDescriptor {
            name: self.name,
            columns: self.columns,
            id_index,
            id_generated,
            unique_constraints,
        })
    }
}

/// `CREATE TYPE ... AS ENUM` for the type behind an enum codec
pub fn create_enum_type_sql<E: PgEnum>(codec: &EnumCodec<E>) -> Result<String, TableError> {
    let name = ValidatedFieldName::new(codec.type_name())?;
    let labels: Vec<String> = codec.labels().into_iter().map(quote_literal).collect();
    Ok(format!(
        "CREATE TYPE {} AS ENUM ({})",
        name,
        labels.join(", ")
    ))
}

pub fn drop_enum_type_sql<E: PgEnum>(codec: &EnumCodec<E>) -> Result<String, TableError> {
    let name = ValidatedFieldName::new(codec.type_name())?;
    Ok(format!("DROP TYPE IF EXISTS {}", name))
}

/// `CREATE UNIQUE INDEX` over `columns`, partial when a predicate is given.
/// Upserts targeting a partial index must repeat the same predicate.
pub fn create_unique_index_sql(
    table: &TableDescriptor,
    name: &str,
    columns: &[&str],
    predicate: Option<&Op>,
) -> Result<String, TableError> {
    let name = ValidatedFieldName::new(name)?;
    if columns.is_empty() {
        return Err(TableError::InvalidTable(format!(
            "index {} on {} has no columns",
            name, table.name
        )));
    }
    let columns = columns
        .iter()
        .map(|column| Ok(table.require_column(column)?.field_name().quoted()))
        .collect::<Result<Vec<_>, TableError>>()?;

    let mut sql = format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ({})",
        name.quoted(),
        table.name.quoted(),
        columns.join(", ")
    );
    if let Some(predicate) = predicate {
        sql.push_str(" WHERE ");
        sql.push_str(&index_predicate(predicate)?);
    }
    Ok(sql)
}
