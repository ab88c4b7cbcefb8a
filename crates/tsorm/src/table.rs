//! Table and column metadata.

use crate::value::{SqlType, SqlValue};
use std::fmt;
use std::marker::PhantomData;

/// Typed handle to a table column.
///
/// The type parameter is the Rust type stored in the column; builders only
/// accept values of that type for this column. Nullable columns use `Option<T>`.
///
/// # Example
///
/// ```rust
/// use tsorm::{Column, Table};
///
/// const ID: Column<i64> = Column::new("users", "id").id().auto_increment();
/// const NAME: Column<String> = Column::new("users", "name").max_size(64).not_null();
/// const BIO: Column<Option<String>> = Column::new("users", "bio");
///
/// let users = Table::new("users").column(&ID).column(&NAME).column(&BIO);
/// assert_eq!(users.id_columns().count(), 1);
/// ```
pub struct Column<T> {
    table: &'static str,
    name: &'static str,
    is_id: bool,
    max_size: Option<u32>,
    not_null: bool,
    auto_increment: bool,
    _type: PhantomData<fn() -> T>,
}

impl<T: SqlValue> Column<T> {
    pub const fn new(table: &'static str, name: &'static str) -> Self {
        Self {
            table,
            name,
            is_id: false,
            max_size: None,
            not_null: false,
            auto_increment: false,
            _type: PhantomData,
        }
    }

    /// Mark as part of the primary key. Id columns are never NULL.
    pub const fn id(mut self) -> Self {
        self.is_id = true;
        self.not_null = true;
        self
    }

    pub const fn max_size(mut self, size: u32) -> Self {
        self.max_size = Some(size);
        self
    }

    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn table(&self) -> &'static str {
        self.table
    }

    pub const fn is_id(&self) -> bool {
        self.is_id
    }

    pub const fn sql_type(&self) -> SqlType {
        T::SQL_TYPE
    }

    /// `table.column`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }

    /// Untyped definition used by DDL rendering.
    pub const fn def(&self) -> ColumnDef {
        ColumnDef {
            table: self.table,
            name: self.name,
            sql_type: T::SQL_TYPE,
            is_id: self.is_id,
            max_size: self.max_size,
            not_null: self.not_null,
            auto_increment: self.auto_increment,
        }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Column<T> {}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("table", &self.table)
            .field("name", &self.name)
            .field("is_id", &self.is_id)
            .finish()
    }
}

/// Untyped column definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub table: &'static str,
    pub name: &'static str,
    pub sql_type: SqlType,
    pub is_id: bool,
    pub max_size: Option<u32>,
    pub not_null: bool,
    pub auto_increment: bool,
}

impl ColumnDef {
    /// `table.column`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }
}

/// `FOREIGN KEY (column) REFERENCES ref_table(ref_column)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: String,
    pub ref_table: String,
    pub ref_column: String,
}

/// Table metadata: name, columns in declaration order, constraints.
#[derive(Debug, Clone, Default)]
pub struct Table {
    name: String,
    columns: Vec<ColumnDef>,
    unique_groups: Vec<Vec<String>>,
    foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Append a column definition.
    pub fn column<T: SqlValue>(mut self, column: &Column<T>) -> Self {
        self.columns.push(column.def());
        self
    }

    /// Add a `UNIQUE (...)` constraint over the given columns, in order.
    pub fn unique(mut self, columns: &[&str]) -> Self {
        self.unique_groups
            .push(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Add a foreign key from `column` to `references`.
    pub fn foreign_key<T: SqlValue>(mut self, column: &Column<T>, references: &Column<T>) -> Self {
        self.foreign_keys.push(ForeignKey {
            column: column.name().to_string(),
            ref_table: references.table().to_string(),
            ref_column: references.name().to_string(),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn id_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.is_id)
    }

    pub fn unique_groups(&self) -> &[Vec<String>] {
        &self.unique_groups
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Look up a column definition by name.
    pub fn find_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}
