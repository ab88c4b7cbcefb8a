//! SELECT builder.
//!
//! Column references render as `table.column` so joined tables never clash.

use crate::database::Database;
use crate::dialect::{Join, JoinType, OrderBy, QuerySpec, SelectColumn};
use crate::engine::Engine;
use crate::error::OrmResult;
use crate::monitor::{QueryType, StatementOutcome};
use crate::qb::Statement;
use crate::table::{Column, ColumnDef, Table};
use crate::value::{SqlValue, Value};
use crate::where_builder::{Where, WhereBuilder};

/// Built SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    table: String,
    tables: Vec<String>,
    sql: String,
    args: Vec<Value>,
}

impl Query {
    /// Base table followed by every joined table.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }
}

impl Statement for Query {
    fn query_type(&self) -> QueryType {
        QueryType::Select
    }

    fn table(&self) -> &str {
        &self.table
    }

    fn sql(&self) -> &str {
        &self.sql
    }

    fn args(&self) -> &[Value] {
        &self.args
    }
}

/// SELECT builder.
pub struct SelectQb<'a, E> {
    db: &'a Database<E>,
    table: &'a Table,
    distinct: bool,
    columns: Vec<SelectColumn>,
    joins: Vec<Join>,
    filter: Where,
    group_by: Vec<String>,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl<'a, E: Engine> SelectQb<'a, E> {
    pub(crate) fn new(db: &'a Database<E>, table: &'a Table) -> Self {
        Self {
            db,
            table,
            distinct: false,
            columns: Vec::new(),
            joins: Vec::new(),
            filter: Where::default(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// `SELECT DISTINCT`. Idempotent.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Add a projected column. Selecting a column twice yields it twice.
    pub fn select<T: SqlValue>(mut self, column: &Column<T>) -> Self {
        self.columns.push(SelectColumn {
            name: column.qualified_name(),
            alias: None,
        });
        self
    }

    /// Add `column AS alias`.
    pub fn select_as<T: SqlValue>(mut self, column: &Column<T>, alias: &str) -> Self {
        self.columns.push(SelectColumn {
            name: column.qualified_name(),
            alias: Some(alias.to_string()),
        });
        self
    }

    /// Add a projection by name, rendered as given (`COUNT(*)`, `users.id`).
    pub fn select_raw(mut self, name: &str) -> Self {
        self.columns.push(SelectColumn {
            name: name.to_string(),
            alias: None,
        });
        self
    }

    /// Add `name AS alias` with `name` rendered as given.
    pub fn select_raw_as(mut self, name: &str, alias: &str) -> Self {
        self.columns.push(SelectColumn {
            name: name.to_string(),
            alias: Some(alias.to_string()),
        });
        self
    }

    /// Add several columns, e.g. `select_all(users.columns())`.
    pub fn select_all(mut self, columns: &[ColumnDef]) -> Self {
        self.columns.extend(columns.iter().map(|c| SelectColumn {
            name: c.qualified_name(),
            alias: None,
        }));
        self
    }

    // ==================== Joins ====================

    /// `{join_type} {column.table} ON column = on_column`.
    ///
    /// `column` belongs to the joined table, `on_column` to one already in the query.
    pub fn join<T: SqlValue>(
        mut self,
        column: &Column<T>,
        on_column: &Column<T>,
        join_type: JoinType,
    ) -> Self {
        self.joins.push(Join {
            table: column.table().to_string(),
            column: column.qualified_name(),
            on_column: on_column.qualified_name(),
            join_type,
        });
        self
    }

    pub fn inner_join<T: SqlValue>(self, column: &Column<T>, on_column: &Column<T>) -> Self {
        self.join(column, on_column, JoinType::Inner)
    }

    pub fn left_join<T: SqlValue>(self, column: &Column<T>, on_column: &Column<T>) -> Self {
        self.join(column, on_column, JoinType::LeftOuter)
    }

    pub fn right_join<T: SqlValue>(self, column: &Column<T>, on_column: &Column<T>) -> Self {
        self.join(column, on_column, JoinType::RightOuter)
    }

    pub fn full_join<T: SqlValue>(self, column: &Column<T>, on_column: &Column<T>) -> Self {
        self.join(column, on_column, JoinType::FullOuter)
    }

    // ==================== WHERE ====================

    /// Replace the WHERE clause with the predicates added in `f`.
    ///
    /// Calling this again discards the previous WHERE.
    pub fn filter(mut self, f: impl FnOnce(&mut WhereBuilder)) -> Self {
        let mut builder = WhereBuilder::qualified();
        f(&mut builder);
        self.filter = builder.build();
        self
    }

    /// Replace the WHERE clause with a prebuilt snapshot (use
    /// [`WhereBuilder::qualified`] so columns match the projection).
    pub fn with_where(mut self, filter: Where) -> Self {
        self.filter = filter;
        self
    }

    // ==================== Grouping & ordering ====================

    /// Append a GROUP BY column. Duplicates are kept.
    pub fn group_by<T: SqlValue>(mut self, column: &Column<T>) -> Self {
        self.group_by.push(column.qualified_name());
        self
    }

    /// Append an ORDER BY term. A column that is already ordered keeps its
    /// first direction.
    pub fn order_by<T: SqlValue>(mut self, column: &Column<T>, ascending: bool) -> Self {
        let name = column.qualified_name();
        if !self.order_by.iter().any(|o| o.column == name) {
            self.order_by.push(OrderBy {
                column: name,
                ascending,
            });
        }
        self
    }

    pub fn order_by_asc<T: SqlValue>(self, column: &Column<T>) -> Self {
        self.order_by(column, true)
    }

    pub fn order_by_desc<T: SqlValue>(self, column: &Column<T>) -> Self {
        self.order_by(column, false)
    }

    // ==================== Pagination ====================

    /// Set LIMIT, replacing any previous value.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set OFFSET, replacing any previous value.
    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Pagination helper.
    ///
    /// `page` is 1-based (clamped to >= 1).
    /// `per_page` is clamped to >= 1.
    pub fn paginate(mut self, page: u64, per_page: u64) -> Self {
        let p = page.max(1);
        let size = per_page.max(1);
        self.limit = Some(size);
        self.offset = Some((p - 1).saturating_mul(size));
        self
    }

    // ==================== Build ====================

    fn spec(&self) -> QuerySpec {
        QuerySpec {
            table: self.table.name().to_string(),
            distinct: self.distinct,
            columns: self.columns.clone(),
            joins: self.joins.clone(),
            where_sections: self.filter.sections().to_vec(),
            group_by: self.group_by.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }

    pub fn build(&self) -> OrmResult<Query> {
        let sql = self.db.dialect().build_query(&self.spec())?;
        let mut tables = vec![self.table.name().to_string()];
        for join in &self.joins {
            if !tables.contains(&join.table) {
                tables.push(join.table.clone());
            }
        }
        Ok(Query {
            table: self.table.name().to_string(),
            tables,
            sql,
            args: self.filter.args().to_vec(),
        })
    }

    pub fn to_sql(&self) -> OrmResult<String> {
        self.build().map(|s| s.sql)
    }

    /// Compile and bind. The caller owns (and must close) the statement.
    pub fn compile(&self) -> OrmResult<E::QueryStatement> {
        let built = self.build()?;
        self.prepare(&built)
    }

    /// Compile, execute and close the statement, returning the cursor.
    /// Closing the cursor is the caller's job.
    pub fn query(&self) -> OrmResult<E::Cursor> {
        let built = self.build()?;
        let statement = self.prepare(&built)?;
        self.db
            .run(&built.context(), statement, |_| StatementOutcome::Cursor)
    }

    fn prepare(&self, built: &Query) -> OrmResult<E::QueryStatement> {
        let tables: Vec<&str> = built.tables.iter().map(String::as_str).collect();
        self.db.prepare(&built.context(), built.args(), |engine| {
            engine.compile_query(&tables, built.sql())
        })
    }
}
