//! CRUD tables
//!
//! [`CrudTable`] turns a [`TableMapper`] into a stateless service: every call
//! builds its statements from the immutable descriptor and runs them on the
//! connection it is handed.

use crate::errors::TableError;
use crate::id_type::HasUniversalId;
use crate::query_builder::{ComparisonOperator, Expression, Op, Pageable};
use crate::schema::TableDescriptor;
use crate::statement::{
    delete_statement, InsertStatement, ResultRow, SelectStatement, UpdateStatement,
    UpsertOptions, UpsertStatement,
};
use crate::traits::{TableMapper, TableOperations};
use async_trait::async_trait;
use sqlx::PgConnection;
use type_mapping::{base_type_name, ColumnCodec, NativeScalar, ScalarCodec, WireValue};

#[derive(Debug, Clone)]
pub struct CrudTable<M> {
    mapper: M,
}

impl<M: TableMapper> CrudTable<M> {
    /// Wrap a mapper, checking that its id column can hold `M::Id`
    pub fn new(mapper: M) -> Result<Self, TableError> {
        let id_column = mapper.descriptor().id_column();
        let expected = <M::Id as NativeScalar>::SQL_TYPE;
        if !base_type_name(id_column.sql_type()).eq_ignore_ascii_case(base_type_name(expected)) {
            return Err(TableError::InvalidTable(format!(
                "id column '{}' of {} is {}, expected {}",
                id_column.name(),
                mapper.descriptor().name(),
                id_column.sql_type(),
                expected
            )));
        }
        Ok(Self { mapper })
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    pub fn descriptor(&self) -> &TableDescriptor {
        self.mapper.descriptor()
    }

    /// Equality on the identifier column
    pub fn id_condition(&self, id: &M::Id) -> Op {
        Op::comparison(
            Expression::Column(self.descriptor().id_column().field_name().clone()),
            ComparisonOperator::Eq,
            Expression::Value(WireValue::Scalar(id.clone().into_postgres_value())),
        )
    }

    fn decode_id(&self, row: &ResultRow) -> Result<M::Id, TableError> {
        let id_column = self.descriptor().id_column();
        let value = row
            .value(id_column.name())
            .ok_or_else(|| TableError::column_not_found(self.descriptor().name(), id_column.name()))?;
        Ok(ScalarCodec::<M::Id>::new().decode(value)?)
    }

    fn to_records(&self, rows: &[ResultRow]) -> Result<Vec<M::Record>, TableError> {
        rows.iter()
            .map(|row| self.mapper.row_to_record(row))
            .collect()
    }

    /// Selects the raw row of a record, including columns the record omits
    pub async fn find_one_row_by_id(
        &self,
        conn: &mut PgConnection,
        id: &M::Id,
    ) -> Result<Option<ResultRow>, TableError> {
        SelectStatement::new(self.descriptor())
            .filter(self.id_condition(id))
            .limit(1)
            .to_statement()?
            .fetch_optional(conn)
            .await
    }

    /// Selects records matching `condition`
    pub async fn find_where(
        &self,
        conn: &mut PgConnection,
        condition: Op,
        for_update: bool,
    ) -> Result<Vec<M::Record>, TableError> {
        let rows = SelectStatement::new(self.descriptor())
            .filter(condition)
            .for_update(for_update)
            .to_statement()?
            .fetch_all(conn)
            .await?;
        self.to_records(&rows)
    }

    /// Selects one page of records, optionally filtered
    pub async fn find_page(
        &self,
        conn: &mut PgConnection,
        condition: Option<Op>,
        page: &Pageable,
    ) -> Result<Vec<M::Record>, TableError> {
        let mut select = SelectStatement::new(self.descriptor()).page(page.clone());
        if let Some(condition) = condition {
            select = select.filter(condition);
        }
        let rows = select.to_statement()?.fetch_all(conn).await?;
        self.to_records(&rows)
    }

    /// Inserts a record, updating or skipping it on a uniqueness conflict.
    /// Returns the number of rows inserted or updated.
    pub async fn upsert(
        &self,
        conn: &mut PgConnection,
        record: &M::Record,
        options: &UpsertOptions,
    ) -> Result<u64, TableError> {
        let mut upsert = UpsertStatement::new(self.descriptor(), options)?;
        self.mapper.upsert_row_with_record(&mut upsert, record)?;
        let affected = upsert.execute(conn).await?;
        tracing::debug!(table = self.descriptor().name(), affected, "Upserted row");
        Ok(affected)
    }

    /// Like [`upsert`](Self::upsert), returning the id of the affected row or
    /// `None` when the conflict was skipped
    pub async fn upsert_and_get_id(
        &self,
        conn: &mut PgConnection,
        record: &M::Record,
        options: &UpsertOptions,
    ) -> Result<Option<M::Id>, TableError> {
        let mut upsert = UpsertStatement::new(self.descriptor(), options)?;
        self.mapper.upsert_row_with_record(&mut upsert, record)?;
        upsert.execute_and_get_id::<M::Id>(conn).await
    }
}

#[async_trait]
impl<M: TableMapper> TableOperations for CrudTable<M> {
    type Record = M::Record;
    type Id = M::Id;

    async fn insert(
        &self,
        conn: &mut PgConnection,
        record: &M::Record,
    ) -> Result<M::Id, TableError> {
        let descriptor = self.descriptor();
        let mut insert = InsertStatement::new(descriptor);
        self.mapper.insert_row_with_record(&mut insert, record)?;

        let mut statement = insert.to_statement();
        statement.push_sql(" RETURNING ");
        statement.push_sql(&descriptor.id_column().field_name().quoted());

        let row = statement.fetch_one(conn).await?;
        let id = self.decode_id(&row)?;
        tracing::debug!(table = descriptor.name(), id = %id.universal_id(), "Inserted row");
        Ok(id)
    }

    async fn find_one_by_id(
        &self,
        conn: &mut PgConnection,
        id: &M::Id,
        for_update: bool,
    ) -> Result<Option<M::Record>, TableError> {
        let row = SelectStatement::new(self.descriptor())
            .filter(self.id_condition(id))
            .limit(1)
            .for_update(for_update)
            .to_statement()?
            .fetch_optional(conn)
            .await?;
        row.map(|row| self.mapper.row_to_record(&row)).transpose()
    }

    async fn find_all(
        &self,
        conn: &mut PgConnection,
        for_update: bool,
    ) -> Result<Vec<M::Record>, TableError> {
        let rows = SelectStatement::new(self.descriptor())
            .for_update(for_update)
            .to_statement()?
            .fetch_all(conn)
            .await?;
        self.to_records(&rows)
    }

    async fn update(
        &self,
        conn: &mut PgConnection,
        id: &M::Id,
        record: &M::Record,
    ) -> Result<u64, TableError> {
        let mut update = UpdateStatement::new(self.descriptor());
        self.mapper.update_row_with_record(&mut update, record)?;
        let affected = update
            .to_statement(&self.id_condition(id))?
            .execute(conn)
            .await?;
        tracing::debug!(
            table = self.descriptor().name(),
            id = %id.universal_id(),
            affected,
            "Updated row"
        );
        Ok(affected)
    }

    async fn delete_by_id(&self, conn: &mut PgConnection, id: &M::Id) -> Result<u64, TableError> {
        let affected = delete_statement(self.descriptor(), &self.id_condition(id))?
            .execute(conn)
            .await?;
        tracing::debug!(
            table = self.descriptor().name(),
            id = %id.universal_id(),
            affected,
            "Deleted row"
        );
        Ok(affected)
    }
}
