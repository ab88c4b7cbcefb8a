//! Column value assignments.

use crate::error::{OrmError, OrmResult};
use crate::table::{Column, ColumnDef};
use crate::value::{SqlValue, Value};
use indexmap::IndexMap;
use serde::Serialize;

/// Insertion-ordered `column -> value` map.
///
/// Setting a column that is already present replaces its value but keeps its
/// position, so placeholder order always follows the first `set` of each column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValues {
    entries: IndexMap<&'static str, (ColumnDef, Value)>,
}

impl ColumnValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value, overwriting in place.
    pub fn insert(&mut self, column: ColumnDef, value: Value) {
        self.entries.insert(column.name, (column, value));
    }

    /// `column = value`
    pub fn set<T: SqlValue>(&mut self, column: &Column<T>, value: impl Into<T>) -> &mut Self {
        self.insert(column.def(), value.into().into_value());
        self
    }

    /// Typed NULL for `column`.
    pub fn set_null<T: SqlValue>(&mut self, column: &Column<T>) -> &mut Self {
        self.insert(column.def(), Value::Null(column.sql_type()));
        self
    }

    /// Store `value` as JSON text.
    pub fn set_json<C, V>(&mut self, column: &Column<C>, value: &V) -> OrmResult<&mut Self>
    where
        C: SqlValue + From<String>,
        V: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value)?;
        Ok(self.set(column, C::from(json)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).map(|(_, v)| v)
    }

    /// Column names in placeholder order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    /// Values in placeholder order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnDef, &Value)> {
        self.entries.values().map(|(c, v)| (c, v))
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (ColumnDef, Value)> {
        self.entries.into_values()
    }
}

/// Fail when a set column belongs to a table other than `table`.
pub(crate) fn check_table<'c>(
    table: &str,
    columns: impl IntoIterator<Item = &'c ColumnDef>,
) -> OrmResult<()> {
    for column in columns {
        if column.table != table {
            return Err(OrmError::syntax(format!(
                "column '{}' does not belong to table '{}'",
                column.qualified_name(),
                table
            )));
        }
    }
    Ok(())
}

/// Fluent `set` methods for builders that collect column values.
///
/// Implementors only provide [`record`](ValueSetter::record).
pub trait ValueSetter: Sized {
    fn record(&mut self, column: ColumnDef, value: Value);

    /// Set a column value. Setting the same column again overwrites it in place.
    fn set<T: SqlValue>(mut self, column: &Column<T>, value: impl Into<T>) -> Self {
        self.record(column.def(), value.into().into_value());
        self
    }

    /// Set a typed NULL.
    fn set_null<T: SqlValue>(mut self, column: &Column<T>) -> Self {
        self.record(column.def(), Value::Null(column.sql_type()));
        self
    }

    /// Set a JSON-encoded value on a text column.
    fn set_json<C, V>(self, column: &Column<C>, value: &V) -> OrmResult<Self>
    where
        C: SqlValue + From<String>,
        V: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value)?;
        Ok(self.set(column, C::from(json)))
    }

    /// Set several values at once through a [`ColumnValues`] scope.
    fn values(mut self, f: impl FnOnce(&mut ColumnValues)) -> Self {
        let mut values = ColumnValues::new();
        f(&mut values);
        for (column, value) in values.into_entries() {
            self.record(column, value);
        }
        self
    }
}
