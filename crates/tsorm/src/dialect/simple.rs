//! Common SQL syntax shared by the bundled dialects.
//!
//! Every function takes the calling dialect so that overridable pieces
//! (placeholder, type names, LIMIT/OFFSET) still go through it.

use super::{Dialect, QuerySpec};
use crate::error::{OrmError, OrmResult};
use crate::table::{ColumnDef, Table};
use crate::where_section::{WhereSection, render_where_clause};

/// `?, ?, ?`
pub fn placeholders<D: Dialect + ?Sized>(dialect: &D, count: usize) -> String {
    vec![dialect.placeholder(); count].join(", ")
}

/// `a = ?, b = ?`
pub fn assignments<D: Dialect + ?Sized>(dialect: &D, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| format!("{} = {}", c, dialect.placeholder()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_where<D: Dialect + ?Sized>(
    dialect: &D,
    sql: &mut String,
    sections: &[WhereSection],
) -> OrmResult<()> {
    if let Some(clause) = render_where_clause(sections, dialect.placeholder())? {
        sql.push(' ');
        sql.push_str(&clause);
    }
    Ok(())
}

/// `INSERT INTO t (a, b) VALUES (?, ?)`
pub fn build_insert<D: Dialect + ?Sized>(
    dialect: &D,
    table: &str,
    columns: &[&str],
) -> OrmResult<String> {
    if columns.is_empty() {
        return Err(OrmError::syntax(format!(
            "INSERT INTO {table} requires at least one column value"
        )));
    }
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders(dialect, columns.len())
    ))
}

/// Id columns first, then the rest. Errors if there is no id column.
pub fn insert_or_replace_columns<'a>(
    table: &str,
    id_columns: &[&'a str],
    columns: &[&'a str],
) -> OrmResult<Vec<&'a str>> {
    if id_columns.is_empty() {
        return Err(OrmError::syntax(format!(
            "insert-or-replace into {table} requires at least one id column value"
        )));
    }
    Ok(id_columns.iter().chain(columns).copied().collect())
}

/// `UPDATE t SET a = ?, b = ? [WHERE ...]`
pub fn build_update<D: Dialect + ?Sized>(
    dialect: &D,
    table: &str,
    columns: &[&str],
    where_sections: &[WhereSection],
) -> OrmResult<String> {
    if columns.is_empty() {
        return Err(OrmError::syntax(format!(
            "UPDATE {table} requires at least one SET value"
        )));
    }
    let mut sql = format!("UPDATE {} SET {}", table, assignments(dialect, columns));
    push_where(dialect, &mut sql, where_sections)?;
    Ok(sql)
}

/// `DELETE FROM t [WHERE ...]`
pub fn build_delete<D: Dialect + ?Sized>(
    dialect: &D,
    table: &str,
    where_sections: &[WhereSection],
) -> OrmResult<String> {
    let mut sql = format!("DELETE FROM {table}");
    push_where(dialect, &mut sql, where_sections)?;
    Ok(sql)
}

pub fn build_query<D: Dialect + ?Sized>(dialect: &D, spec: &QuerySpec) -> OrmResult<String> {
    let mut sql = String::from("SELECT ");
    if spec.distinct {
        sql.push_str("DISTINCT ");
    }

    if spec.columns.is_empty() {
        sql.push('*');
    } else {
        let columns: Vec<String> = spec
            .columns
            .iter()
            .map(|c| match &c.alias {
                Some(alias) => format!("{} AS {}", c.name, alias),
                None => c.name.clone(),
            })
            .collect();
        sql.push_str(&columns.join(", "));
    }

    sql.push_str(" FROM ");
    sql.push_str(&spec.table);
    for join in &spec.joins {
        if !dialect.supports_join(join.join_type) {
            return Err(OrmError::syntax(format!(
                "{} does not support {}",
                dialect.name(),
                join.join_type.as_sql()
            )));
        }
        sql.push_str(&format!(
            " {} {} ON {} = {}",
            join.join_type.as_sql(),
            join.table,
            join.column,
            join.on_column
        ));
    }

    push_where(dialect, &mut sql, &spec.where_sections)?;

    if !spec.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&spec.group_by.join(", "));
    }

    if !spec.order_by.is_empty() {
        let terms: Vec<String> = spec
            .order_by
            .iter()
            .map(|o| format!("{} {}", o.column, if o.ascending { "ASC" } else { "DESC" }))
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&terms.join(", "));
    }

    sql.push_str(&dialect.build_limit_offset(spec.limit, spec.offset));
    Ok(sql)
}

pub fn build_limit_offset(limit: Option<u64>, offset: Option<u64>) -> String {
    let mut sql = String::new();
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    if let Some(offset) = offset {
        sql.push_str(&format!(" OFFSET {offset}"));
    }
    sql
}

/// `name TYPE[(size)][ NOT NULL][ auto-increment]`
pub fn column_definition<D: Dialect + ?Sized>(dialect: &D, column: &ColumnDef) -> String {
    let mut def = format!("{} {}", column.name, dialect.type_name(column.sql_type));
    if let Some(size) = column.max_size {
        def.push_str(&format!("({size})"));
    }
    if column.not_null {
        def.push_str(" NOT NULL");
    }
    if column.auto_increment {
        def.push(' ');
        def.push_str(dialect.auto_increment_phrase());
    }
    def
}

/// `CREATE TABLE t (defs[, PRIMARY KEY (...)][, UNIQUE (...)]...[, FOREIGN KEY ...]...)`
pub fn build_create_table<D: Dialect + ?Sized>(
    dialect: &D,
    table: &Table,
    primary_key_clause: bool,
) -> OrmResult<String> {
    if table.columns().is_empty() {
        return Err(OrmError::syntax(format!(
            "CREATE TABLE {} requires at least one column",
            table.name()
        )));
    }

    let mut parts: Vec<String> = table
        .columns()
        .iter()
        .map(|c| dialect.column_definition(c))
        .collect();

    let ids: Vec<&str> = table.id_columns().map(|c| c.name).collect();
    if primary_key_clause && !ids.is_empty() {
        parts.push(format!("PRIMARY KEY ({})", ids.join(", ")));
    }
    for group in table.unique_groups() {
        parts.push(format!("UNIQUE ({})", group.join(", ")));
    }
    for fk in table.foreign_keys() {
        parts.push(format!(
            "FOREIGN KEY ({}) REFERENCES {}({})",
            fk.column, fk.ref_table, fk.ref_column
        ));
    }

    Ok(format!("CREATE TABLE {} ({})", table.name(), parts.join(", ")))
}
