use super::{Dialect, JoinType, simple};
use crate::error::{OrmError, OrmResult};
use crate::table::Table;
use crate::value::SqlType;

/// SQLite.
///
/// Differences from the generic syntax: storage-class type names, no RIGHT or
/// FULL OUTER joins, `INSERT OR REPLACE`, and auto-increment columns declared
/// inline as `PRIMARY KEY AUTOINCREMENT`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn type_name(&self, sql_type: SqlType) -> &'static str {
        match sql_type {
            SqlType::Short | SqlType::Int | SqlType::Long => "INTEGER",
            SqlType::Float | SqlType::Double => "REAL",
            SqlType::String => "TEXT",
            SqlType::Blob => "BLOB",
        }
    }

    fn auto_increment_phrase(&self) -> &'static str {
        "PRIMARY KEY AUTOINCREMENT"
    }

    fn supports_join(&self, join_type: JoinType) -> bool {
        matches!(join_type, JoinType::Inner | JoinType::LeftOuter)
    }

    fn build_insert_or_replace(
        &self,
        table: &str,
        id_columns: &[&str],
        columns: &[&str],
    ) -> OrmResult<String> {
        let all = simple::insert_or_replace_columns(table, id_columns, columns)?;
        Ok(format!(
            "INSERT OR REPLACE INTO {} ({}) VALUES ({})",
            table,
            all.join(", "),
            simple::placeholders(self, all.len())
        ))
    }

    // SQLite needs a LIMIT before an OFFSET; -1 means unbounded.
    fn build_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit, offset) {
            (None, Some(offset)) => format!(" LIMIT -1 OFFSET {offset}"),
            _ => simple::build_limit_offset(limit, offset),
        }
    }

    fn build_create_table(&self, table: &Table) -> OrmResult<String> {
        let auto_increment: Vec<&str> = table
            .columns()
            .iter()
            .filter(|c| c.auto_increment)
            .map(|c| c.name)
            .collect();
        if auto_increment.is_empty() {
            return simple::build_create_table(self, table, true);
        }

        let ids: Vec<&str> = table.id_columns().map(|c| c.name).collect();
        if ids != auto_increment {
            return Err(OrmError::syntax(format!(
                "SQLite AUTOINCREMENT on {} requires it to be the only primary key column of {}",
                auto_increment.join(", "),
                table.name()
            )));
        }
        simple::build_create_table(self, table, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Join, QuerySpec};
    use crate::table::Column;

    fn joined(join_type: JoinType) -> QuerySpec {
        QuerySpec {
            table: "users".to_string(),
            joins: vec![Join {
                table: "roles".to_string(),
                column: "roles.id".to_string(),
                on_column: "users.role_id".to_string(),
                join_type,
            }],
            ..QuerySpec::default()
        }
    }

    #[test]
    fn test_insert_or_replace() {
        let sql = SqliteDialect
            .build_insert_or_replace("t", &["id"], &["a"])
            .unwrap();
        assert_eq!(sql, "INSERT OR REPLACE INTO t (id, a) VALUES (?, ?)");
    }

    #[test]
    fn test_joins() {
        assert_eq!(
            SqliteDialect.build_query(&joined(JoinType::Inner)).unwrap(),
            "SELECT * FROM users INNER JOIN roles ON roles.id = users.role_id"
        );
        assert!(SqliteDialect.build_query(&joined(JoinType::LeftOuter)).is_ok());

        let err = SqliteDialect
            .build_query(&joined(JoinType::RightOuter))
            .unwrap_err();
        assert!(err.is_syntax());
        assert!(err.to_string().contains("RIGHT OUTER JOIN"));
        assert!(SqliteDialect.build_query(&joined(JoinType::FullOuter)).is_err());
    }

    #[test]
    fn test_offset_without_limit() {
        let spec = QuerySpec {
            table: "t".to_string(),
            offset: Some(3),
            ..QuerySpec::default()
        };
        assert_eq!(
            SqliteDialect.build_query(&spec).unwrap(),
            "SELECT * FROM t LIMIT -1 OFFSET 3"
        );
    }

    #[test]
    fn test_create_table_autoincrement() {
        const ID: Column<i64> = Column::new("notes", "id").id().auto_increment();
        const TEXT: Column<String> = Column::new("notes", "text").not_null();
        const WEIGHT: Column<f32> = Column::new("notes", "weight");

        let notes = Table::new("notes").column(&ID).column(&TEXT).column(&WEIGHT);
        assert_eq!(
            SqliteDialect.build_create_table(&notes).unwrap(),
            "CREATE TABLE notes (id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT, \
             text TEXT NOT NULL, weight REAL)"
        );
    }

    #[test]
    fn test_create_table_composite_key() {
        const A: Column<i16> = Column::new("pairs", "a").id();
        const B: Column<i32> = Column::new("pairs", "b").id();

        let pairs = Table::new("pairs").column(&A).column(&B);
        assert_eq!(
            SqliteDialect.build_create_table(&pairs).unwrap(),
            "CREATE TABLE pairs (a INTEGER NOT NULL, b INTEGER NOT NULL, PRIMARY KEY (a, b))"
        );
    }

    #[test]
    fn test_autoincrement_with_composite_key_rejected() {
        const A: Column<i64> = Column::new("pairs", "a").id().auto_increment();
        const B: Column<i64> = Column::new("pairs", "b").id();

        let pairs = Table::new("pairs").column(&A).column(&B);
        assert!(SqliteDialect.build_create_table(&pairs).unwrap_err().is_syntax());
    }
}
