//! Integration tests for CRUD, typed arrays, upsert, auditing and row locking
//!
//! These run against a live PostgreSQL server named by `DATABASE_URL` and are
//! skipped when it is unset. Every test works on its own tables so they can
//! run in parallel.

use pgtable::prelude::*;
use pgtable::table_store::query_builder::Op;
use pgtable::table_store::{SqlStatement, TableError};
use pgtable::type_mapping::{
    ArrayCodec, BigIntCodec, EnumCodec, InetCodec, IntegerCodec, IntervalCodec, JsonbCodec,
    NullableCodec, PostgresValue, TextCodec, WireValue,
};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

async fn setup_database() -> Option<Database> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    Some(
        Database::connect(&database_url)
            .await
            .expect("Failed to connect to database"),
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TestType {
    A,
    B,
}

impl PgEnum for TestType {
    fn variants() -> &'static [Self] {
        &[TestType::A, TestType::B]
    }

    fn label(&self) -> &'static str {
        match self {
            TestType::A => "A",
            TestType::B => "B",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Payload {
    tags: Vec<String>,
    weight: i32,
}

#[derive(Debug, Clone, PartialEq)]
struct TestRecord {
    id: Option<i64>,
    kind: TestType,
    integers: Vec<i32>,
    payload: Payload,
    address: IpAddr,
    period: chrono::Duration,
    note: Option<String>,
}

struct TestTable {
    descriptor: TableDescriptor,
    kind_codec: EnumCodec<TestType>,
    id: Column<BigIntCodec>,
    kind: Column<EnumCodec<TestType>>,
    integers: Column<ArrayCodec<IntegerCodec>>,
    payload: Column<JsonbCodec<Payload>>,
    address: Column<InetCodec>,
    period: Column<IntervalCodec>,
    note: Column<NullableCodec<TextCodec>>,
}

impl TestTable {
    fn new(table_name: &str) -> Self {
        let kind_codec = EnumCodec::new(format!("{}_type", table_name));
        let id = Column::new("id", BigIntCodec::new()).unwrap();
        let kind = Column::new("type", kind_codec.clone()).unwrap();
        let integers = Column::new("integers", ArrayCodec::new(IntegerCodec::new())).unwrap();
        let payload = Column::new("payload", JsonbCodec::new()).unwrap();
        let address = Column::new("address", InetCodec::new()).unwrap();
        let period = Column::new("period", IntervalCodec::new()).unwrap();
        let note = Column::new("note", TextCodec::new()).unwrap().nullable();
        let descriptor = TableDescriptor::builder(table_name)
            .unwrap()
            .generated_id_column(&id)
            .column(&kind)
            .column(&integers)
            .column(&payload)
            .column(&address)
            .column(&period)
            .column(&note)
            .build()
            .unwrap();
        Self {
            descriptor,
            kind_codec,
            id,
            kind,
            integers,
            payload,
            address,
            period,
            note,
        }
    }
}

impl TableMapper for TestTable {
    type Record = TestRecord;
    type Id = i64;

    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    fn row_to_record(&self, row: &ResultRow) -> Result<TestRecord, TableError> {
        Ok(TestRecord {
            id: Some(row.get(&self.id)?),
            kind: row.get(&self.kind)?,
            integers: row.get(&self.integers)?,
            payload: row.get(&self.payload)?,
            address: row.get(&self.address)?,
            period: row.get(&self.period)?,
            note: row.get(&self.note)?,
        })
    }

    fn insert_row_with_record(
        &self,
        statement: &mut InsertStatement<'_>,
        record: &TestRecord,
    ) -> Result<(), TableError> {
        statement.set(&self.kind, &record.kind)?;
        statement.set(&self.integers, &record.integers)?;
        statement.set(&self.payload, &record.payload)?;
        statement.set(&self.address, &record.address)?;
        statement.set(&self.period, &record.period)?;
        statement.set(&self.note, &record.note)
    }

    fn update_row_with_record(
        &self,
        statement: &mut UpdateStatement<'_>,
        record: &TestRecord,
    ) -> Result<(), TableError> {
        statement.set(&self.kind, &record.kind)?;
        statement.set(&self.integers, &record.integers)?;
        statement.set(&self.payload, &record.payload)?;
        statement.set(&self.address, &record.address)?;
        statement.set(&self.period, &record.period)?;
        statement.set(&self.note, &record.note)
    }
}

async fn setup_test_table(database: &Database, table_name: &str) -> CrudTable<TestTable> {
    let mapper = TestTable::new(table_name);
    sqlx::query(&mapper.descriptor().drop_table_sql())
        .execute(database.pool())
        .await
        .expect("Failed to drop table");
    database
        .create_enum_type(&mapper.kind_codec, true)
        .await
        .expect("Failed to create enum type");
    database
        .migrate(mapper.descriptor(), false)
        .await
        .expect("Failed to create table");
    CrudTable::new(mapper).expect("Invalid table")
}

fn record(kind: TestType, integers: Vec<i32>) -> TestRecord {
    TestRecord {
        id: None,
        kind,
        integers,
        payload: Payload {
            tags: vec!["x".to_string(), "y".to_string()],
            weight: 3,
        },
        address: "127.0.0.1".parse().unwrap(),
        period: chrono::Duration::seconds(90_061),
        note: None,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct UniqueRecord {
    id: Option<i64>,
    name: String,
    value: i32,
    note: Option<String>,
}

impl UniqueRecord {
    fn new(name: &str, value: i32, note: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            value,
            note: Some(note.to_string()),
        }
    }
}

struct UniqueTable {
    descriptor: TableDescriptor,
    id: Column<BigIntCodec>,
    name: Column<TextCodec>,
    value: Column<IntegerCodec>,
    note: Column<NullableCodec<TextCodec>>,
}

impl UniqueTable {
    fn new(table_name: &str) -> Self {
        let id = Column::new("id", BigIntCodec::new()).unwrap();
        let name = Column::new("name", TextCodec::new()).unwrap();
        let value = Column::new("value", IntegerCodec::new()).unwrap();
        let note = Column::new("note", TextCodec::new()).unwrap().nullable();
        let descriptor = TableDescriptor::builder(table_name)
            .unwrap()
            .generated_id_column(&id)
            .column(&name)
            .column(&value)
            .column(&note)
            .unique_constraint(&format!("{}_name_key", table_name), &["name"])
            .build()
            .unwrap();
        Self {
            descriptor,
            id,
            name,
            value,
            note,
        }
    }
}

impl TableMapper for UniqueTable {
    type Record = UniqueRecord;
    type Id = i64;

    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    fn row_to_record(&self, row: &ResultRow) -> Result<UniqueRecord, TableError> {
        Ok(UniqueRecord {
            id: Some(row.get(&self.id)?),
            name: row.get(&self.name)?,
            value: row.get(&self.value)?,
            note: row.get(&self.note)?,
        })
    }

    fn insert_row_with_record(
        &self,
        statement: &mut InsertStatement<'_>,
        record: &UniqueRecord,
    ) -> Result<(), TableError> {
        statement.set(&self.name, &record.name)?;
        statement.set(&self.value, &record.value)?;
        statement.set(&self.note, &record.note)
    }

    fn update_row_with_record(
        &self,
        statement: &mut UpdateStatement<'_>,
        record: &UniqueRecord,
    ) -> Result<(), TableError> {
        statement.set(&self.value, &record.value)?;
        statement.set(&self.note, &record.note)
    }
}

async fn setup_unique_table<M: TableMapper>(database: &Database, mapper: M) -> CrudTable<M> {
    database
        .migrate(mapper.descriptor(), true)
        .await
        .expect("Failed to create table");
    CrudTable::new(mapper).expect("Invalid table")
}

#[tokio::test]
async fn test_crud_scenario() {
    let Some(database) = setup_database().await else {
        return;
    };
    let table = setup_test_table(&database, "crud_scenario").await;

    let mut tx = database.begin().await.unwrap();
    let id = table
        .insert(&mut *tx, &record(TestType::A, vec![1, 2, 3]))
        .await
        .expect("Failed to insert");

    let inserted = table.find_one_by_id(&mut *tx, &id, false).await.unwrap();
    let expected = TestRecord {
        id: Some(id),
        ..record(TestType::A, vec![1, 2, 3])
    };
    assert_eq!(inserted, Some(expected));

    let mut changed = record(TestType::B, vec![4, 5]);
    changed.address = "::1".parse().unwrap();
    changed.note = Some("changed".to_string());
    let updated = table.update(&mut *tx, &id, &changed).await.unwrap();
    assert_eq!(updated, 1);
    tx.commit().await.unwrap();

    let mut tx = database.begin().await.unwrap();
    let found = table
        .find_one_by_id(&mut *tx, &id, true)
        .await
        .unwrap()
        .expect("Record should exist");
    assert_eq!(found.kind, TestType::B);
    assert_eq!(found.integers, vec![4, 5]);
    assert_eq!(found.address, "::1".parse::<IpAddr>().unwrap());
    assert_eq!(found.period, chrono::Duration::seconds(90_061));
    assert_eq!(found.note.as_deref(), Some("changed"));

    assert_eq!(table.delete_by_id(&mut *tx, &id).await.unwrap(), 1);
    assert_eq!(table.delete_by_id(&mut *tx, &id).await.unwrap(), 0);
    assert!(table.find_all(&mut *tx, false).await.unwrap().is_empty());
    assert!(table.find_one_by_id(&mut *tx, &id, false).await.unwrap().is_none());
    tx.commit().await.unwrap();
}

#[tokio::test]
async fn test_filters_and_paging() {
    let Some(database) = setup_database().await else {
        return;
    };
    let table = setup_test_table(&database, "crud_filters").await;
    let mapper = table.mapper();

    let mut tx = database.begin().await.unwrap();
    for (kind, integers) in [
        (TestType::A, vec![1, 2]),
        (TestType::B, vec![2, 3]),
        (TestType::A, vec![5]),
    ] {
        table.insert(&mut *tx, &record(kind, integers)).await.unwrap();
    }

    let only_a = table
        .find_where(&mut *tx, mapper.kind.eq(&TestType::A).unwrap(), false)
        .await
        .unwrap();
    assert_eq!(only_a.len(), 2);

    let containing_two = table
        .find_where(&mut *tx, mapper.integers.any(&2).unwrap(), false)
        .await
        .unwrap();
    assert_eq!(containing_two.len(), 2);

    let superset = table
        .find_where(&mut *tx, mapper.integers.contains(&vec![2, 3]).unwrap(), false)
        .await
        .unwrap();
    assert_eq!(superset.len(), 1);
    assert_eq!(superset[0].kind, TestType::B);

    let either = mapper
        .kind
        .eq(&TestType::B)
        .unwrap()
        .or(mapper.integers.any(&5).unwrap());
    assert_eq!(table.find_where(&mut *tx, either, false).await.unwrap().len(), 2);

    let page = Pageable::of(0, 2)
        .sort_by("id", SortOrder::Desc)
        .sort_by("no_such_column", SortOrder::Asc);
    let first_page = table.find_page(&mut *tx, None, &page).await.unwrap();
    assert_eq!(first_page.len(), 2);
    assert_eq!(first_page[0].integers, vec![5]);

    let second_page = table
        .find_page(&mut *tx, None, &Pageable::of(1, 2).sort_by("id", SortOrder::Desc))
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].integers, vec![1, 2]);
    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn test_upsert_skip_mode() {
    let Some(database) = setup_database().await else {
        return;
    };
    let table = setup_unique_table(&database, UniqueTable::new("upsert_skip")).await;
    let options = UpsertOptions::new().conflict_column(&table.mapper().name);

    let mut tx = database.begin().await.unwrap();
    let first = UniqueRecord::new("something", 1, "original");
    assert_eq!(table.upsert(&mut *tx, &first, &options).await.unwrap(), 1);

    let second = UniqueRecord::new("something", 2, "replacement");
    assert_eq!(table.upsert(&mut *tx, &second, &options).await.unwrap(), 0);
    assert_eq!(
        table.upsert_and_get_id(&mut *tx, &second, &options).await.unwrap(),
        None
    );

    let rows = table.find_all(&mut *tx, false).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value, 1);
    assert_eq!(rows[0].note.as_deref(), Some("original"));
    tx.commit().await.unwrap();
}

#[tokio::test]
async fn test_upsert_update_mode() {
    let Some(database) = setup_database().await else {
        return;
    };
    let table = setup_unique_table(&database, UniqueTable::new("upsert_update")).await;
    let mapper = table.mapper();
    let options = UpsertOptions::new()
        .conflict_column(&mapper.name)
        .update_column(&mapper.value)
        .update_on_conflict(true);

    let mut tx = database.begin().await.unwrap();
    let id = table
        .upsert_and_get_id(&mut *tx, &UniqueRecord::new("something", 1, "original"), &options)
        .await
        .unwrap()
        .expect("Inserted row should return its id");

    let second = UniqueRecord::new("something", 2, "replacement");
    assert_eq!(table.upsert(&mut *tx, &second, &options).await.unwrap(), 1);
    assert_eq!(
        table.upsert_and_get_id(&mut *tx, &second, &options).await.unwrap(),
        Some(id)
    );

    let row = table.find_one_by_id(&mut *tx, &id, false).await.unwrap().unwrap();
    assert_eq!(row.value, 2);
    assert_eq!(row.note.as_deref(), Some("original"));
    tx.commit().await.unwrap();
}

#[tokio::test]
async fn test_upsert_on_constraint() {
    let Some(database) = setup_database().await else {
        return;
    };
    let table = setup_unique_table(&database, UniqueTable::new("upsert_constraint")).await;
    let options = UpsertOptions::new()
        .conflict_constraint("upsert_constraint_name_key")
        .update_on_conflict(true);

    let mut tx = database.begin().await.unwrap();
    table
        .upsert(&mut *tx, &UniqueRecord::new("something", 1, "original"), &options)
        .await
        .unwrap();
    table
        .upsert(&mut *tx, &UniqueRecord::new("something", 7, "replacement"), &options)
        .await
        .unwrap();

    let rows = table.find_all(&mut *tx, false).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value, 7);
    assert_eq!(rows[0].note.as_deref(), Some("replacement"));

    let invalid = UpsertOptions::new()
        .conflict_constraint("upsert_constraint_name_key")
        .predicate(table.mapper().value.gt(&0).unwrap());
    let result = table
        .upsert(&mut *tx, &UniqueRecord::new("other", 1, "x"), &invalid)
        .await;
    assert!(matches!(result, Err(TableError::InvalidConflictTarget(_))));
    tx.commit().await.unwrap();
}

#[tokio::test]
async fn test_upsert_on_partial_index() {
    let Some(database) = setup_database().await else {
        return;
    };
    let id = Column::new("id", BigIntCodec::new()).unwrap();
    let name = Column::new("name", TextCodec::new()).unwrap();
    let value = Column::new("value", IntegerCodec::new()).unwrap();
    let note = Column::new("note", TextCodec::new()).unwrap().nullable();
    let descriptor = TableDescriptor::builder("upsert_partial")
        .unwrap()
        .generated_id_column(&id)
        .column(&name)
        .column(&value)
        .column(&note)
        .build()
        .unwrap();
    let mapper = UniqueTable {
        descriptor,
        id,
        name,
        value,
        note,
    };
    let positive: Op = mapper.value.gt(&0).unwrap();

    database.migrate(mapper.descriptor(), true).await.unwrap();
    database
        .create_unique_index(
            mapper.descriptor(),
            "idx_upsert_partial_positive",
            &["name"],
            Some(&positive),
        )
        .await
        .unwrap();
    let table = CrudTable::new(mapper).unwrap();

    let options = UpsertOptions::new()
        .conflict_column(&table.mapper().name)
        .predicate(positive.clone())
        .update_on_conflict(true);

    let mut tx = database.begin().await.unwrap();
    assert_eq!(
        table
            .upsert(&mut *tx, &UniqueRecord::new("something", 1, "first"), &options)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        table
            .upsert(&mut *tx, &UniqueRecord::new("something", 5, "second"), &options)
            .await
            .unwrap(),
        1
    );
    let rows = table.find_all(&mut *tx, false).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value, 5);
    tx.commit().await.unwrap();
}

#[tokio::test]
async fn test_audit_stamping() {
    let Some(database) = setup_database().await else {
        return;
    };
    let audit = AuditConfig::new("anonymous".to_string());
    let mapper = AuditableTable::from_config(UniqueTable::new("audited"), &audit).unwrap();
    let table = setup_unique_table(&database, mapper).await;

    let mut tx = database.begin().await.unwrap();
    let id = table
        .insert(&mut *tx, &UniqueRecord::new("something", 1, "original"))
        .await
        .unwrap();
    let row = table.find_one_row_by_id(&mut *tx, &id).await.unwrap().unwrap();
    let created = table.mapper().audit_metadata(&row).unwrap();
    assert_eq!(created.created_by, "anonymous");
    assert!(created.updated_date.is_none());
    assert!(created.updated_by.is_none());
    tx.commit().await.unwrap();

    let mut tx = database.begin().await.unwrap();
    let record = table.find_one_by_id(&mut *tx, &id, true).await.unwrap().unwrap();
    let changed = UniqueRecord { value: 2, ..record };
    assert_eq!(table.update(&mut *tx, &id, &changed).await.unwrap(), 1);
    let row = table.find_one_row_by_id(&mut *tx, &id).await.unwrap().unwrap();
    let updated = table.mapper().audit_metadata(&row).unwrap();
    assert_eq!(updated.created_by, created.created_by);
    assert_eq!(updated.created_date, created.created_date);
    assert_eq!(updated.updated_by.as_deref(), Some("anonymous"));
    assert!(updated.updated_date.unwrap() >= created.created_date);

    let options = UpsertOptions::new()
        .conflict_column(&table.mapper().inner().name)
        .update_on_conflict(true);
    table
        .upsert(&mut *tx, &UniqueRecord::new("something", 3, "upserted"), &options)
        .await
        .unwrap();
    let row = table.find_one_row_by_id(&mut *tx, &id).await.unwrap().unwrap();
    let upserted = table.mapper().audit_metadata(&row).unwrap();
    assert_eq!(upserted.created_date, created.created_date);
    assert!(upserted.updated_date.unwrap() >= updated.updated_date.unwrap());
    tx.commit().await.unwrap();
}

#[tokio::test]
async fn test_find_for_update_blocks_second_locker() {
    let Some(database) = setup_database().await else {
        return;
    };
    let table = Arc::new(setup_unique_table(&database, UniqueTable::new("row_locks")).await);
    let id = {
        let mut tx = database.begin().await.unwrap();
        let id = table
            .insert(&mut *tx, &UniqueRecord::new("locked", 1, "x"))
            .await
            .unwrap();
        tx.commit().await.unwrap();
        id
    };

    let mut first = database.begin().await.unwrap();
    assert!(table.find_one_by_id(&mut *first, &id, true).await.unwrap().is_some());

    let second_database = database.clone();
    let second_table = Arc::clone(&table);
    let mut second = tokio::spawn(async move {
        let mut tx = second_database.begin().await.unwrap();
        let record = second_table.find_one_by_id(&mut *tx, &id, true).await;
        tx.commit().await.unwrap();
        record
    });

    let waited = tokio::time::timeout(Duration::from_millis(300), &mut second).await;
    assert!(waited.is_err(), "second locker should wait for the first");

    first.commit().await.unwrap();
    let record = tokio::time::timeout(Duration::from_secs(5), second)
        .await
        .expect("second locker should proceed once the lock is released")
        .unwrap()
        .unwrap();
    assert_eq!(record.map(|r| r.name), Some("locked".to_string()));
}

#[tokio::test]
async fn test_repository_delegates_in_own_transactions() {
    let Some(database) = setup_database().await else {
        return;
    };
    let table = setup_unique_table(&database, UniqueTable::new("repository_calls")).await;
    let repository = CrudRepository::new(database.pool().clone(), table);

    let id = repository
        .insert(&UniqueRecord::new("something", 1, "original"))
        .await
        .unwrap();
    let found = repository.find_one_by_id(&id, false).await.unwrap().unwrap();
    assert_eq!(found.value, 1);

    let changed = UniqueRecord { value: 9, ..found };
    assert_eq!(repository.update(&id, &changed).await.unwrap(), 1);
    assert_eq!(repository.find_all(false).await.unwrap()[0].value, 9);

    let duplicate = repository
        .insert(&UniqueRecord::new("something", 2, "duplicate"))
        .await;
    assert!(matches!(duplicate, Err(TableError::Database(_))));

    assert_eq!(repository.delete_by_id(&id).await.unwrap(), 1);
    assert!(repository.find_all(false).await.unwrap().is_empty());
}

#[derive(Debug, Clone, PartialEq)]
struct NetworkRecord {
    id: Option<i64>,
    addresses: Vec<IpAddr>,
    periods: Vec<chrono::Duration>,
    documents: Vec<Payload>,
}

struct NetworkTable {
    descriptor: TableDescriptor,
    id: Column<BigIntCodec>,
    addresses: Column<ArrayCodec<InetCodec>>,
    periods: Column<ArrayCodec<IntervalCodec>>,
    documents: Column<ArrayCodec<JsonbCodec<Payload>>>,
}

impl NetworkTable {
    fn new(table_name: &str) -> Self {
        let id = Column::new("id", BigIntCodec::new()).unwrap();
        let addresses = Column::new("addresses", ArrayCodec::new(InetCodec::new())).unwrap();
        let periods = Column::new("periods", ArrayCodec::new(IntervalCodec::new())).unwrap();
        let documents = Column::new("documents", ArrayCodec::new(JsonbCodec::new())).unwrap();
        let descriptor = TableDescriptor::builder(table_name)
            .unwrap()
            .generated_id_column(&id)
            .column(&addresses)
            .column(&periods)
            .column(&documents)
            .build()
            .unwrap();
        Self {
            descriptor,
            id,
            addresses,
            periods,
            documents,
        }
    }
}

impl TableMapper for NetworkTable {
    type Record = NetworkRecord;
    type Id = i64;

    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    fn row_to_record(&self, row: &ResultRow) -> Result<NetworkRecord, TableError> {
        Ok(NetworkRecord {
            id: Some(row.get(&self.id)?),
            addresses: row.get(&self.addresses)?,
            periods: row.get(&self.periods)?,
            documents: row.get(&self.documents)?,
        })
    }

    fn insert_row_with_record(
        &self,
        statement: &mut InsertStatement<'_>,
        record: &NetworkRecord,
    ) -> Result<(), TableError> {
        statement.set(&self.addresses, &record.addresses)?;
        statement.set(&self.periods, &record.periods)?;
        statement.set(&self.documents, &record.documents)
    }

    fn update_row_with_record(
        &self,
        statement: &mut UpdateStatement<'_>,
        record: &NetworkRecord,
    ) -> Result<(), TableError> {
        statement.set(&self.addresses, &record.addresses)?;
        statement.set(&self.periods, &record.periods)?;
        statement.set(&self.documents, &record.documents)
    }
}

#[tokio::test]
async fn test_arrays_of_typed_values_round_trip() {
    let Some(database) = setup_database().await else {
        return;
    };
    let table = setup_unique_table(&database, NetworkTable::new("typed_arrays")).await;

    let samples = [
        NetworkRecord {
            id: None,
            addresses: vec![],
            periods: vec![],
            documents: vec![],
        },
        NetworkRecord {
            id: None,
            addresses: vec!["2001:db8::ff00:42:8329".parse().unwrap()],
            periods: vec![chrono::Duration::seconds(90_061)],
            documents: vec![Payload {
                tags: vec!["one".to_string()],
                weight: 1,
            }],
        },
        NetworkRecord {
            id: None,
            addresses: vec![
                "127.0.0.1".parse().unwrap(),
                "::1".parse().unwrap(),
                "192.168.10.24".parse().unwrap(),
            ],
            periods: vec![
                chrono::Duration::zero(),
                chrono::Duration::days(40) + chrono::Duration::milliseconds(1500),
                -chrono::Duration::hours(3),
            ],
            documents: vec![
                Payload {
                    tags: vec![],
                    weight: 0,
                },
                Payload {
                    tags: vec!["x".to_string(), "y".to_string()],
                    weight: -7,
                },
            ],
        },
    ];

    let mut tx = database.begin().await.unwrap();
    for sample in samples {
        let id = table.insert(&mut *tx, &sample).await.unwrap();
        let found = table.find_one_by_id(&mut *tx, &id, false).await.unwrap();
        assert_eq!(
            found,
            Some(NetworkRecord {
                id: Some(id),
                ..sample
            })
        );
    }
    assert_eq!(table.find_all(&mut *tx, false).await.unwrap().len(), 3);
    tx.commit().await.unwrap();
}

#[tokio::test]
async fn test_backend_written_values_decode() {
    let Some(database) = setup_database().await else {
        return;
    };
    let table = setup_unique_table(&database, NetworkTable::new("backend_arrays")).await;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO backend_arrays (addresses, periods, documents) VALUES (\
         ARRAY['10.0.0.1'::inet, NULL, '2001:db8::1'::inet], \
         ARRAY['1 mon 2 days'::interval, NULL, '3 hours'::interval], \
         ARRAY[NULL, '{\"tags\":[],\"weight\":5}'::jsonb]) RETURNING id",
    )
    .fetch_one(database.pool())
    .await
    .unwrap();

    let mut tx = database.begin().await.unwrap();
    let found = table
        .find_one_by_id(&mut *tx, &id, false)
        .await
        .unwrap()
        .expect("Record should exist");
    assert_eq!(
        found.addresses,
        vec![
            "10.0.0.1".parse::<IpAddr>().unwrap(),
            "2001:db8::1".parse::<IpAddr>().unwrap(),
        ]
    );
    // One month counts as January 1970
    assert_eq!(
        found.periods,
        vec![chrono::Duration::days(33), chrono::Duration::hours(3)]
    );
    assert_eq!(
        found.documents,
        vec![Payload {
            tags: vec![],
            weight: 5,
        }]
    );

    let id_column = table.mapper().id.clone();
    let empty = sqlx::query_scalar::<_, i64>(
        "INSERT INTO backend_arrays (addresses, periods, documents) \
         VALUES ('{}', ARRAY[NULL::interval], '{}') RETURNING id",
    )
    .fetch_one(&mut *tx)
    .await
    .unwrap();
    let found = table
        .find_one_by_id(&mut *tx, &empty, false)
        .await
        .unwrap()
        .expect("Record should exist");
    assert_eq!(found.id, Some(empty));
    assert!(found.addresses.is_empty());
    assert!(found.periods.is_empty());
    assert!(found.documents.is_empty());

    // A column with no wire reading does not block the others
    sqlx::query("ALTER TABLE backend_arrays ADD COLUMN location POINT DEFAULT '(1,2)'")
        .execute(&mut *tx)
        .await
        .unwrap();
    let mut statement = SqlStatement::new();
    statement.push_sql("SELECT * FROM backend_arrays WHERE id = ");
    statement.push_param(WireValue::Scalar(PostgresValue::BigInt(id)));
    let row = statement.fetch_one(&mut *tx).await.unwrap();
    assert_eq!(row.get(&id_column).unwrap(), id);
    assert_eq!(table.mapper().row_to_record(&row).unwrap().addresses.len(), 2);
    let location = Column::new("location", TextCodec::new()).unwrap();
    assert!(row.get(&location).unwrap_err().is_type_mismatch());
    tx.rollback().await.unwrap();
}
