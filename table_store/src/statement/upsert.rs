//! PostgreSQL upsert (`INSERT ... ON CONFLICT`)
//!
//! Requires PostgreSQL 9.5 or newer. Only simple partial-index predicates are
//! accepted, see [`index_predicate`].

use super::builder::SqlStatement;
use super::insert::InsertStatement;
use super::values::ColumnValues;
use crate::errors::TableError;
use crate::id_type::TableId;
use crate::query_builder::{index_predicate, Op};
use crate::schema::{Column, TableDescriptor};
use crate::validation::ValidatedFieldName;
use sqlx::PgConnection;
use type_mapping::{ColumnCodec, ScalarCodec};

/// Conflict handling requested by the caller
///
/// A non-empty column list takes precedence over a named constraint. A
/// predicate is only accepted with a column list.
#[derive(Debug, Clone, Default)]
pub struct UpsertOptions {
    pub conflict_columns: Vec<String>,
    pub conflict_constraint: Option<String>,
    pub predicate: Option<Op>,
    /// Columns refreshed on conflict; empty means every column of the table
    pub update_columns: Vec<String>,
    pub update_on_conflict: bool,
}

impl UpsertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conflict_column<C: ColumnCodec>(mut self, column: &Column<C>) -> Self {
        self.conflict_columns.push(column.name().to_string());
        self
    }

    pub fn conflict_constraint(mut self, name: &str) -> Self {
        self.conflict_constraint = Some(name.to_string());
        self
    }

    pub fn predicate(mut self, predicate: Op) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn update_column<C: ColumnCodec>(mut self, column: &Column<C>) -> Self {
        self.update_columns.push(column.name().to_string());
        self
    }

    pub fn update_on_conflict(mut self, update: bool) -> Self {
        self.update_on_conflict = update;
        self
    }
}

/// Resolved conflict target
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictTarget {
    Columns {
        columns: Vec<ValidatedFieldName>,
        /// Rendered partial-index predicate
        predicate: Option<String>,
    },
    Constraint {
        name: ValidatedFieldName,
        /// Constraint columns, when the table declares the constraint
        columns: Vec<ValidatedFieldName>,
    },
}

impl ConflictTarget {
    pub fn resolve(table: &TableDescriptor, options: &UpsertOptions) -> Result<Self, TableError> {
        if !options.conflict_columns.is_empty() {
            let columns = options
                .conflict_columns
                .iter()
                .map(|name| {
                    table
                        .column(name)
                        .map(|column| column.field_name().clone())
                        .ok_or_else(|| {
                            TableError::InvalidConflictTarget(format!(
                                "column '{}' does not belong to {}",
                                name,
                                table.name()
                            ))
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let predicate = options.predicate.as_ref().map(index_predicate).transpose()?;
            return Ok(ConflictTarget::Columns { columns, predicate });
        }

        match &options.conflict_constraint {
            Some(name) => {
                if options.predicate.is_some() {
                    return Err(TableError::InvalidConflictTarget(
                        "a conflict predicate cannot be combined with a named constraint"
                            .to_string(),
                    ));
                }
                let name = ValidatedFieldName::new(name)?;
                let columns = table
                    .unique_constraint(name.as_str())
                    .map(|constraint| constraint.columns().to_vec())
                    .unwrap_or_default();
                Ok(ConflictTarget::Constraint { name, columns })
            }
            None => Err(TableError::InvalidConflictTarget(
                "either conflict columns or a conflict constraint is required".to_string(),
            )),
        }
    }

    pub fn columns(&self) -> &[ValidatedFieldName] {
        match self {
            ConflictTarget::Columns { columns, .. } | ConflictTarget::Constraint { columns, .. } => {
                columns
            }
        }
    }

    fn write(&self, statement: &mut SqlStatement) {
        match self {
            ConflictTarget::Constraint { name, .. } => {
                statement.push_sql(" ON CONFLICT ON CONSTRAINT ");
                statement.push_sql(&name.quoted());
            }
            ConflictTarget::Columns { columns, predicate } => {
                let names: Vec<String> = columns.iter().map(ValidatedFieldName::quoted).collect();
                statement.push_sql(" ON CONFLICT (");
                statement.push_sql(&names.join(", "));
                statement.push_sql(")");
                if let Some(predicate) = predicate {
                    statement.push_sql(" WHERE ");
                    statement.push_sql(predicate);
                }
            }
        }
    }
}

/// Insert that updates or skips the row on a uniqueness conflict
#[derive(Debug, Clone)]
pub struct UpsertStatement<'a> {
    insert: InsertStatement<'a>,
    target: ConflictTarget,
    update_on_conflict: bool,
    /// Refresh candidates in declared order, conflict columns removed
    update_columns: Vec<ValidatedFieldName>,
    excluded: Vec<ValidatedFieldName>,
    on_conflict: ColumnValues,
}

impl<'a> UpsertStatement<'a> {
    pub fn new(table: &'a TableDescriptor, options: &UpsertOptions) -> Result<Self, TableError> {
        let target = ConflictTarget::resolve(table, options)?;

        let update_columns = if !options.update_on_conflict {
            Vec::new()
        } else {
            for name in &options.update_columns {
                table.require_column(name)?;
            }
            table
                .columns()
                .iter()
                .map(|column| column.field_name())
                .filter(|name| {
                    options.update_columns.is_empty()
                        || options.update_columns.iter().any(|c| c == name.as_str())
                })
                .filter(|name| !target.columns().contains(name))
                .cloned()
                .collect()
        };

        Ok(Self {
            insert: InsertStatement::new(table),
            target,
            update_on_conflict: options.update_on_conflict,
            update_columns,
            excluded: Vec::new(),
            on_conflict: ColumnValues::default(),
        })
    }

    pub fn table(&self) -> &'a TableDescriptor {
        self.insert.table()
    }

    pub fn target(&self) -> &ConflictTarget {
        &self.target
    }

    /// Set an inserted value
    pub fn set<C: ColumnCodec>(
        &mut self,
        column: &Column<C>,
        value: &C::Native,
    ) -> Result<(), TableError> {
        self.insert.set(column, value)
    }

    /// The insert half, for reusing insert mappings
    pub fn insert_mut(&mut self) -> &mut InsertStatement<'a> {
        &mut self.insert
    }

    /// Never refresh this column from `EXCLUDED` on conflict
    pub fn exclude_from_update<C: ColumnCodec>(&mut self, column: &Column<C>) {
        if !self.excluded.contains(column.field_name()) {
            self.excluded.push(column.field_name().clone());
        }
    }

    /// Assign an explicit value in the conflict branch
    pub fn set_on_conflict<C: ColumnCodec>(
        &mut self,
        column: &Column<C>,
        value: &C::Native,
    ) -> Result<(), TableError> {
        self.on_conflict.set(self.insert.table(), column, value)
    }

    /// Columns written as `"c"=EXCLUDED."c"`, in declared order
    pub fn refreshed_columns(&self) -> Vec<&ValidatedFieldName> {
        self.update_columns
            .iter()
            .filter(|name| self.insert.contains(name.as_str()))
            .filter(|name| !self.excluded.contains(name))
            .filter(|name| !self.on_conflict.contains(name.as_str()))
            .collect()
    }

    pub fn to_statement(&self) -> SqlStatement {
        let mut statement = self.insert.to_statement();
        self.target.write(&mut statement);

        if !self.update_on_conflict {
            statement.push_sql(" DO NOTHING");
            return statement;
        }

        let mut assignments: Vec<String> = self
            .refreshed_columns()
            .into_iter()
            .map(|name| {
                let column = name.quoted();
                format!("{}=EXCLUDED.{}", column, column)
            })
            .collect();

        // Nothing to refresh: touch the row anyway so it still counts as affected
        if assignments.is_empty() && self.on_conflict.is_empty() {
            match self.target.columns().first() {
                Some(name) => {
                    let column = name.quoted();
                    assignments.push(format!("{}=EXCLUDED.{}", column, column));
                }
                None => {
                    statement.push_sql(" DO NOTHING");
                    return statement;
                }
            }
        }

        statement.push_sql(" DO UPDATE SET ");
        statement.push_sql(&assignments.join(", "));
        for (index, (name, value)) in self.on_conflict.ordered(self.table()).enumerate() {
            if index > 0 || !assignments.is_empty() {
                statement.push_sql(", ");
            }
            statement.push_sql(&name.quoted());
            statement.push_sql("=");
            statement.push_param(value.clone());
        }
        statement
    }

    /// Execute and return the number of inserted or updated rows
    pub async fn execute(&self, conn: &mut PgConnection) -> Result<u64, TableError> {
        self.to_statement().execute(conn).await
    }

    /// Execute and return the identifier of the inserted or updated row, or
    /// `None` when the conflict was skipped
    pub async fn execute_and_get_id<Id: TableId>(
        &self,
        conn: &mut PgConnection,
    ) -> Result<Option<Id>, TableError> {
        let table = self.table();
        let mut statement = self.to_statement();
        statement.push_sql(" RETURNING ");
        statement.push_sql(&table.id_column().field_name().quoted());

        let row = statement.fetch_optional(conn).await?;
        row.map(|row| -> Result<Id, TableError> {
            let value = row
                .value(table.id_column().name())
                .ok_or_else(|| TableError::column_not_found(table.name(), table.id_column().name()))?;
            Ok(ScalarCodec::<Id>::new().decode(value)?)
        })
        .transpose()
    }
}
