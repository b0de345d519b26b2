//! Auditable tables
//!
//! [`AuditableTable`] decorates a mapper with four audit columns. Inserts
//! stamp the creation pair, updates stamp the modification pair, and upserts
//! stamp the creation pair on insert and the modification pair on conflict.

use crate::errors::TableError;
use crate::schema::{Column, ColumnDef, TableDescriptor};
use crate::statement::{InsertStatement, ResultRow, UpdateStatement, UpsertStatement};
use crate::traits::TableMapper;
use chrono::{DateTime, Utc};
use config::AuditConfig;
use type_mapping::{ColumnCodec, NullableCodec, TextCodec, TimestampCodec};

/// The audit columns appended to a table
#[derive(Debug, Clone)]
pub struct AuditColumns<C> {
    pub created_date: Column<TimestampCodec>,
    pub created_by: Column<C>,
    pub updated_date: Column<NullableCodec<TimestampCodec>>,
    pub updated_by: Column<NullableCodec<C>>,
}

impl<C: ColumnCodec> AuditColumns<C> {
    /// Columns named by `config`, with the principal stored through `principal_codec`
    pub fn new(config: &AuditConfig, principal_codec: C) -> Result<Self, TableError> {
        Ok(Self {
            created_date: Column::new(&config.created_date_column, TimestampCodec::new())?,
            created_by: Column::new(&config.created_by_column, principal_codec.clone())?,
            updated_date: Column::new(&config.updated_date_column, TimestampCodec::new())?
                .nullable(),
            updated_by: Column::new(&config.updated_by_column, principal_codec)?.nullable(),
        })
    }

    fn defs(&self) -> Vec<ColumnDef> {
        vec![
            self.created_date.def(),
            self.created_by.def(),
            self.updated_date.def(),
            self.updated_by.def(),
        ]
    }
}

/// Audit values read back from a row
#[derive(Debug, Clone, PartialEq)]
pub struct AuditMetadata<P> {
    pub created_date: DateTime<Utc>,
    pub created_by: P,
    pub updated_date: Option<DateTime<Utc>>,
    pub updated_by: Option<P>,
}

/// Supplies the principal recorded for a write
pub trait PrincipalResolver<R, P>: Send + Sync {
    fn resolve(&self, record: &R) -> P;
}

/// Records the same principal for every write
#[derive(Debug, Clone)]
pub struct DefaultPrincipal<P>(pub P);

impl<R, P: Clone + Send + Sync> PrincipalResolver<R, P> for DefaultPrincipal<P> {
    fn resolve(&self, _record: &R) -> P {
        self.0.clone()
    }
}

/// Derives the principal from the record being written
#[derive(Debug, Clone)]
pub struct ResolveWith<F>(pub F);

impl<R, P, F> PrincipalResolver<R, P> for ResolveWith<F>
where
    F: Fn(&R) -> P + Send + Sync,
{
    fn resolve(&self, record: &R) -> P {
        (self.0)(record)
    }
}

pub struct AuditableTable<M, C, Res> {
    inner: M,
    columns: AuditColumns<C>,
    resolver: Res,
    descriptor: TableDescriptor,
}

impl<M, C, Res> AuditableTable<M, C, Res>
where
    M: TableMapper,
    C: ColumnCodec,
    Res: PrincipalResolver<M::Record, C::Native>,
{
    /// Wrap `inner`, appending the audit columns to its descriptor
    pub fn new(
        inner: M,
        config: &AuditConfig,
        principal_codec: C,
        resolver: Res,
    ) -> Result<Self, TableError> {
        let columns = AuditColumns::new(config, principal_codec)?;
        let descriptor = inner.descriptor().extend_with(columns.defs())?;
        Ok(Self {
            inner,
            columns,
            resolver,
            descriptor,
        })
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn columns(&self) -> &AuditColumns<C> {
        &self.columns
    }

    /// Reads the audit columns of a selected row
    pub fn audit_metadata(&self, row: &ResultRow) -> Result<AuditMetadata<C::Native>, TableError> {
        Ok(AuditMetadata {
            created_date: row.get(&self.columns.created_date)?,
            created_by: row.get(&self.columns.created_by)?,
            updated_date: row.get(&self.columns.updated_date)?,
            updated_by: row.get(&self.columns.updated_by)?,
        })
    }
}

impl<M: TableMapper> AuditableTable<M, TextCodec, DefaultPrincipal<String>> {
    /// Text principals, defaulting to the configured one
    pub fn from_config(inner: M, config: &AuditConfig) -> Result<Self, TableError> {
        let principal = DefaultPrincipal(config.default_principal.clone());
        Self::new(inner, config, TextCodec::new(), principal)
    }
}

impl<M, C, Res> TableMapper for AuditableTable<M, C, Res>
where
    M: TableMapper,
    C: ColumnCodec,
    Res: PrincipalResolver<M::Record, C::Native>,
{
    type Record = M::Record;
    type Id = M::Id;

    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    fn row_to_record(&self, row: &ResultRow) -> Result<M::Record, TableError> {
        self.inner.row_to_record(row)
    }

    fn insert_row_with_record(
        &self,
        statement: &mut InsertStatement<'_>,
        record: &M::Record,
    ) -> Result<(), TableError> {
        self.inner.insert_row_with_record(statement, record)?;
        statement.set(&self.columns.created_by, &self.resolver.resolve(record))?;
        statement.set(&self.columns.created_date, &Utc::now())
    }

    fn update_row_with_record(
        &self,
        statement: &mut UpdateStatement<'_>,
        record: &M::Record,
    ) -> Result<(), TableError> {
        self.inner.update_row_with_record(statement, record)?;
        statement.set(&self.columns.updated_by, &Some(self.resolver.resolve(record)))?;
        statement.set(&self.columns.updated_date, &Some(Utc::now()))
    }

    fn upsert_row_with_record(
        &self,
        statement: &mut UpsertStatement<'_>,
        record: &M::Record,
    ) -> Result<(), TableError> {
        self.inner.upsert_row_with_record(statement, record)?;
        let now = Utc::now();

        statement.set(&self.columns.created_by, &self.resolver.resolve(record))?;
        statement.set(&self.columns.created_date, &now)?;
        statement.exclude_from_update(&self.columns.created_by);
        statement.exclude_from_update(&self.columns.created_date);

        statement.set_on_conflict(&self.columns.updated_by, &Some(self.resolver.resolve(record)))?;
        statement.set_on_conflict(&self.columns.updated_date, &Some(now))
    }
}
