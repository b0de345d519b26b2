//! Column assignments shared by INSERT and UPDATE

use crate::errors::TableError;
use crate::schema::{Column, TableDescriptor};
use crate::validation::ValidatedFieldName;
use type_mapping::{ColumnCodec, WireValue};

/// Encoded values keyed by column; setting a column twice keeps the last value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValues {
    values: Vec<(ValidatedFieldName, WireValue)>,
}

impl ColumnValues {
    pub fn set<C: ColumnCodec>(
        &mut self,
        table: &TableDescriptor,
        column: &Column<C>,
        value: &C::Native,
    ) -> Result<(), TableError> {
        table.require_column(column.name())?;
        let encoded = column.codec().encode(value)?;
        self.set_wire(column.field_name().clone(), encoded);
        Ok(())
    }

    pub fn set_wire(&mut self, name: ValidatedFieldName, value: WireValue) {
        match self.values.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&WireValue> {
        self.values
            .iter()
            .find(|(column, _)| column.as_str() == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Assignments in the table's declared column order
    pub fn ordered<'v>(
        &'v self,
        table: &'v TableDescriptor,
    ) -> impl Iterator<Item = (&'v ValidatedFieldName, &'v WireValue)> + 'v {
        table.columns().iter().filter_map(move |column| {
            self.values
                .iter()
                .find(|(name, _)| name == column.field_name())
                .map(|(name, value)| (name, value))
        })
    }
}
