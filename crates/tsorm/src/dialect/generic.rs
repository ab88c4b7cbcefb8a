use super::{Dialect, simple};
use crate::error::OrmResult;

/// ANSI-ish SQL with an `ON CONFLICT ... DO UPDATE` upsert.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDialect;

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn insert_or_replace_rebinds_non_id(&self) -> bool {
        true
    }

    /// `INSERT INTO t (ids, cols) VALUES (...) ON CONFLICT (ids) DO UPDATE SET col = ?, ...`
    ///
    /// Without non-id columns the conflict action is `DO NOTHING`.
    fn build_insert_or_replace(
        &self,
        table: &str,
        id_columns: &[&str],
        columns: &[&str],
    ) -> OrmResult<String> {
        let all = simple::insert_or_replace_columns(table, id_columns, columns)?;
        let action = if columns.is_empty() {
            "DO NOTHING".to_string()
        } else {
            format!("DO UPDATE SET {}", simple::assignments(self, columns))
        };
        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) {}",
            table,
            all.join(", "),
            simple::placeholders(self, all.len()),
            id_columns.join(", "),
            action
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Join, JoinType, OrderBy, QuerySpec, SelectColumn};
    use crate::table::{Column, Table};
    use crate::where_section::{Connector, OneArgOp, WhereSection};

    #[test]
    fn test_insert() {
        let sql = GenericDialect.build_insert("t", &["a", "b"]).unwrap();
        assert_eq!(sql, "INSERT INTO t (a, b) VALUES (?, ?)");
    }

    #[test]
    fn test_insert_without_columns() {
        assert!(GenericDialect.build_insert("t", &[]).unwrap_err().is_syntax());
    }

    #[test]
    fn test_insert_or_replace() {
        let sql = GenericDialect
            .build_insert_or_replace("t", &["id"], &["a", "b"])
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO t (id, a, b) VALUES (?, ?, ?) ON CONFLICT (id) DO UPDATE SET a = ?, b = ?"
        );

        let sql = GenericDialect
            .build_insert_or_replace("t", &["k1", "k2"], &[])
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO t (k1, k2) VALUES (?, ?) ON CONFLICT (k1, k2) DO NOTHING"
        );
    }

    #[test]
    fn test_insert_or_replace_requires_id() {
        let err = GenericDialect
            .build_insert_or_replace("t", &[], &["a"])
            .unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn test_update() {
        let sections = vec![WhereSection::OneArg {
            op: OneArgOp::Eq,
            column: "id".to_string(),
        }];
        let sql = GenericDialect.build_update("t", &["a"], &sections).unwrap();
        assert_eq!(sql, "UPDATE t SET a = ? WHERE id = ?");

        let sql = GenericDialect.build_update("t", &["a", "b"], &[]).unwrap();
        assert_eq!(sql, "UPDATE t SET a = ?, b = ?");

        assert!(GenericDialect.build_update("t", &[], &[]).unwrap_err().is_syntax());
    }

    #[test]
    fn test_delete() {
        assert_eq!(GenericDialect.build_delete("users", &[]).unwrap(), "DELETE FROM users");
    }

    #[test]
    fn test_query_everything() {
        let spec = QuerySpec {
            table: "users".to_string(),
            distinct: true,
            columns: vec![
                SelectColumn {
                    name: "users.name".to_string(),
                    alias: Some("n".to_string()),
                },
                SelectColumn {
                    name: "roles.title".to_string(),
                    alias: None,
                },
            ],
            joins: vec![Join {
                table: "roles".to_string(),
                column: "roles.id".to_string(),
                on_column: "users.role_id".to_string(),
                join_type: JoinType::LeftOuter,
            }],
            where_sections: vec![
                WhereSection::OneArg {
                    op: OneArgOp::Gt,
                    column: "users.age".to_string(),
                },
                WhereSection::Simple(Connector::And),
                WhereSection::OneArg {
                    op: OneArgOp::Like,
                    column: "users.name".to_string(),
                },
            ],
            group_by: vec!["roles.title".to_string()],
            order_by: vec![
                OrderBy {
                    column: "users.name".to_string(),
                    ascending: true,
                },
                OrderBy {
                    column: "users.age".to_string(),
                    ascending: false,
                },
            ],
            limit: Some(10),
            offset: Some(20),
        };
        assert_eq!(
            GenericDialect.build_query(&spec).unwrap(),
            "SELECT DISTINCT users.name AS n, roles.title FROM users \
             LEFT OUTER JOIN roles ON roles.id = users.role_id \
             WHERE users.age > ? AND users.name LIKE ? \
             GROUP BY roles.title ORDER BY users.name ASC, users.age DESC LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn test_query_star() {
        let spec = QuerySpec {
            table: "users".to_string(),
            offset: Some(5),
            ..QuerySpec::default()
        };
        assert_eq!(
            GenericDialect.build_query(&spec).unwrap(),
            "SELECT * FROM users OFFSET 5"
        );
    }

    #[test]
    fn test_create_table() {
        const ID: Column<i64> = Column::new("users", "id").id().auto_increment();
        const NAME: Column<String> = Column::new("users", "name").max_size(64).not_null();
        const SCORE: Column<Option<f64>> = Column::new("users", "score");

        let users = Table::new("users")
            .column(&ID)
            .column(&NAME)
            .column(&SCORE)
            .unique(&["name"]);
        assert_eq!(
            GenericDialect.build_create_table(&users).unwrap(),
            "CREATE TABLE users (id BIGINT NOT NULL AUTO_INCREMENT, name VARCHAR(64) NOT NULL, \
             score DOUBLE, PRIMARY KEY (id), UNIQUE (name))"
        );
    }
}
