//! SELECT and DELETE statements over a single table

use super::builder::SqlStatement;
use crate::errors::TableError;
use crate::query_builder::{Op, Pageable, SqlGenerator};
use crate::schema::TableDescriptor;

/// `SELECT` of every declared column, optionally filtered, paged and locked
#[derive(Debug, Clone)]
pub struct SelectStatement<'a> {
    table: &'a TableDescriptor,
    condition: Option<Op>,
    page: Pageable,
    for_update: bool,
}

impl<'a> SelectStatement<'a> {
    pub fn new(table: &'a TableDescriptor) -> Self {
        Self {
            table,
            condition: None,
            page: Pageable::default(),
            for_update: false,
        }
    }

    pub fn filter(mut self, condition: Op) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn page(mut self, page: Pageable) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.page.limit = Some(limit);
        self
    }

    /// Lock selected rows until the enclosing transaction ends
    pub fn for_update(mut self, for_update: bool) -> Self {
        self.for_update = for_update;
        self
    }

    pub fn to_statement(&self) -> Result<SqlStatement, TableError> {
        let mut statement = SqlStatement::new();
        statement.push_sql("SELECT ");
        statement.push_sql(&self.table.select_list());
        statement.push_sql(" FROM ");
        statement.push_sql(&self.table.table_name().quoted());

        if let Some(condition) = &self.condition {
            SqlGenerator::write_where(&mut statement, self.table, condition)?;
        }

        for clause in [
            SqlGenerator::build_order_clause(self.table, &self.page.sort),
            SqlGenerator::build_limit_clause(self.page.limit, self.page.offset),
        ] {
            if !clause.is_empty() {
                statement.push_sql(" ");
                statement.push_sql(&clause);
            }
        }

        if self.for_update {
            statement.push_sql(" FOR UPDATE");
        }
        Ok(statement)
    }
}

/// `DELETE FROM "t" WHERE <condition>`
pub fn delete_statement(table: &TableDescriptor, condition: &Op) -> Result<SqlStatement, TableError> {
    let mut statement = SqlStatement::new();
    statement.push_sql("DELETE FROM ");
    statement.push_sql(&table.table_name().quoted());
    SqlGenerator::write_where(&mut statement, table, condition)?;
    Ok(statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::SortOrder;
    use crate::schema::Column;
    use type_mapping::{ArrayCodec, BigIntCodec, IntegerCodec, TextCodec};

    struct Fixture {
        table: TableDescriptor,
        id: Column<BigIntCodec>,
        kind: Column<TextCodec>,
        integers: Column<ArrayCodec<IntegerCodec>>,
    }

    fn fixture() -> Fixture {
        let id = Column::new("id", BigIntCodec::new()).unwrap();
        let kind = Column::new("type", TextCodec::new()).unwrap();
        let integers = Column::new("integers", ArrayCodec::new(IntegerCodec::new())).unwrap();
        let table = TableDescriptor::builder("test_table")
            .unwrap()
            .generated_id_column(&id)
            .column(&kind)
            .column(&integers)
            .build()
            .unwrap();
        Fixture {
            table,
            id,
            kind,
            integers,
        }
    }

    #[test]
    fn select_by_id_with_lock() {
        let f = fixture();
        let statement = SelectStatement::new(&f.table)
            .filter(f.id.eq(&1).unwrap())
            .limit(1)
            .for_update(true)
            .to_statement()
            .unwrap();
        assert_eq!(
            statement.sql(),
            "SELECT \"test_table\".\"id\", \"test_table\".\"type\", \"test_table\".\"integers\" \
             FROM \"test_table\" WHERE \"test_table\".\"id\" = $1 LIMIT 1 FOR UPDATE"
        );
    }

    #[test]
    fn select_all_without_lock() {
        let f = fixture();
        let statement = SelectStatement::new(&f.table).to_statement().unwrap();
        assert!(statement.sql().ends_with("FROM \"test_table\""));
        assert!(statement.params().is_empty());
    }

    #[test]
    fn groups_and_array_operators() {
        let f = fixture();
        let condition = f
            .kind
            .eq(&"A".to_string())
            .unwrap()
            .or(f.integers.any(&4).unwrap())
            .and(f.integers.contains(&vec![1, 2]).unwrap());
        let statement = SelectStatement::new(&f.table)
            .filter(condition)
            .to_statement()
            .unwrap();
        assert!(statement.sql().ends_with(
            "WHERE ((\"test_table\".\"type\" = $1 OR $2 = ANY (\"test_table\".\"integers\")) \
             AND \"test_table\".\"integers\" @> $3::INTEGER[])"
        ));
        assert_eq!(statement.params().len(), 3);
    }

    #[test]
    fn paging_ignores_unknown_sort_columns() {
        let f = fixture();
        let page = Pageable::of(2, 10)
            .sort_by("missing", SortOrder::Asc)
            .sort_by("type", SortOrder::Desc);
        let statement = SelectStatement::new(&f.table).page(page).to_statement().unwrap();
        assert!(statement
            .sql()
            .ends_with("ORDER BY \"test_table\".\"type\" DESC LIMIT 10 OFFSET 20"));
    }

    #[test]
    fn negative_limit_and_offset_are_clamped() {
        let f = fixture();
        let page = Pageable::new().with_limit(-5).with_offset(-20);
        let statement = SelectStatement::new(&f.table).page(page).to_statement().unwrap();
        assert!(statement.sql().ends_with("LIMIT 0 OFFSET 0"));

        let page = Pageable::of(-1, 10);
        let statement = SelectStatement::new(&f.table).page(page).to_statement().unwrap();
        assert!(statement.sql().ends_with("LIMIT 10 OFFSET 0"));
    }

    #[test]
    fn where_rejects_foreign_columns() {
        let f = fixture();
        let other = Column::new("other", TextCodec::new()).unwrap();
        let result = SelectStatement::new(&f.table)
            .filter(other.is_null())
            .to_statement();
        assert!(matches!(result, Err(TableError::ColumnNotFound { .. })));
    }

    #[test]
    fn delete_by_id() {
        let f = fixture();
        let statement = delete_statement(&f.table, &f.id.eq(&3).unwrap()).unwrap();
        assert_eq!(
            statement.sql(),
            "DELETE FROM \"test_table\" WHERE \"test_table\".\"id\" = $1"
        );
    }
}
