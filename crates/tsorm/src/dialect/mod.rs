//! SQL dialects.
//!
//! A [`Dialect`] turns structured statement metadata into SQL text. Provided
//! methods implement the common syntax (see [`simple`]); dialects override only
//! what differs. Statement builders receive the dialect from the
//! [`Database`](crate::Database), so switching databases is a configuration
//! change.

mod generic;
mod h2;
pub mod simple;
mod sqlite;

pub use generic::GenericDialect;
pub use h2::H2Dialect;
pub use sqlite::SqliteDialect;

use crate::error::OrmResult;
use crate::table::{ColumnDef, Table};
use crate::value::SqlType;
use crate::where_section::WhereSection;
use std::fmt;

/// Join flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
}

impl JoinType {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::LeftOuter => "LEFT OUTER JOIN",
            JoinType::RightOuter => "RIGHT OUTER JOIN",
            JoinType::FullOuter => "FULL OUTER JOIN",
        }
    }
}

/// `{join_type} {table} ON {column} = {on_column}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: String,
    pub column: String,
    pub on_column: String,
    pub join_type: JoinType,
}

/// Projected column, optionally aliased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectColumn {
    pub name: String,
    pub alias: Option<String>,
}

/// ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

/// Everything a dialect needs to render a SELECT.
#[derive(Debug, Clone, Default)]
pub struct QuerySpec {
    pub table: String,
    pub distinct: bool,
    /// Empty means `*`.
    pub columns: Vec<SelectColumn>,
    pub joins: Vec<Join>,
    pub where_sections: Vec<WhereSection>,
    pub group_by: Vec<String>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Database-specific SQL rendering.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Bind placeholder.
    fn placeholder(&self) -> &str {
        "?"
    }

    fn type_name(&self, sql_type: SqlType) -> &'static str {
        match sql_type {
            SqlType::Short => "SMALLINT",
            SqlType::Int => "INT",
            SqlType::Long => "BIGINT",
            SqlType::Float => "REAL",
            SqlType::Double => "DOUBLE",
            SqlType::String => "VARCHAR",
            SqlType::Blob => "BLOB",
        }
    }

    fn auto_increment_phrase(&self) -> &'static str {
        "AUTO_INCREMENT"
    }

    fn supports_join(&self, join_type: JoinType) -> bool {
        let _ = join_type;
        true
    }

    /// Whether the insert-or-replace SQL repeats every non-id placeholder a
    /// second time after the VALUES list (e.g. in an `ON CONFLICT ... DO UPDATE SET`).
    fn insert_or_replace_rebinds_non_id(&self) -> bool {
        false
    }

    fn build_insert(&self, table: &str, columns: &[&str]) -> OrmResult<String> {
        simple::build_insert(self, table, columns)
    }

    /// `id_columns` are rendered first, then `columns`.
    fn build_insert_or_replace(
        &self,
        table: &str,
        id_columns: &[&str],
        columns: &[&str],
    ) -> OrmResult<String>;

    fn build_update(
        &self,
        table: &str,
        columns: &[&str],
        where_sections: &[WhereSection],
    ) -> OrmResult<String> {
        simple::build_update(self, table, columns, where_sections)
    }

    fn build_delete(&self, table: &str, where_sections: &[WhereSection]) -> OrmResult<String> {
        simple::build_delete(self, table, where_sections)
    }

    fn build_query(&self, spec: &QuerySpec) -> OrmResult<String> {
        simple::build_query(self, spec)
    }

    /// Trailing `LIMIT` / `OFFSET`, including the leading space.
    fn build_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        simple::build_limit_offset(limit, offset)
    }

    fn column_definition(&self, column: &ColumnDef) -> String {
        simple::column_definition(self, column)
    }

    fn build_create_table(&self, table: &Table) -> OrmResult<String> {
        simple::build_create_table(self, table, true)
    }
}
