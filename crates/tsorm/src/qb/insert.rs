//! INSERT and insert-or-replace builders.

use crate::database::Database;
use crate::engine::Engine;
use crate::error::OrmResult;
use crate::monitor::{QueryType, StatementContext, StatementOutcome};
use crate::qb::Statement;
use crate::qb::remap::{IndexToIndicesMap, InsertOrReplaceValues, RemappedStatement};
use crate::qb::traits::simple_statement;
use crate::qb::values::{ColumnValues, ValueSetter, check_table};
use crate::table::{ColumnDef, Table};
use crate::value::Value;

simple_statement! {
    /// Built `INSERT INTO ...`.
    Insert => QueryType::Insert
}

/// INSERT builder.
pub struct InsertQb<'a, E> {
    db: &'a Database<E>,
    table: &'a Table,
    values: ColumnValues,
}

impl<'a, E: Engine> InsertQb<'a, E> {
    pub(crate) fn new(db: &'a Database<E>, table: &'a Table) -> Self {
        Self {
            db,
            table,
            values: ColumnValues::new(),
        }
    }

    pub fn column_values(&self) -> &ColumnValues {
        &self.values
    }

    /// Render SQL and collect arguments. Fails without any column value or
    /// when a column belongs to another table.
    pub fn build(&self) -> OrmResult<Insert> {
        check_table(self.table.name(), self.values.iter().map(|(c, _)| c))?;
        let columns = self.values.names();
        let sql = self.db.dialect().build_insert(self.table.name(), &columns)?;
        Ok(Insert {
            table: self.table.name().to_string(),
            sql,
            args: self.values.values().cloned().collect(),
        })
    }

    pub fn to_sql(&self) -> OrmResult<String> {
        self.build().map(|s| s.sql)
    }

    /// Compile and bind. The caller owns (and must close) the statement.
    pub fn compile(&self) -> OrmResult<E::Statement> {
        let built = self.build()?;
        self.db.prepare(&built.context(), built.args(), |engine| {
            engine.compile_insert(built.table(), built.sql())
        })
    }

    /// Compile, execute and close. Returns the affected row count.
    pub fn insert(&self) -> OrmResult<u64> {
        let built = self.build()?;
        let ctx = built.context();
        let statement = self.db.prepare(&ctx, built.args(), |engine| {
            engine.compile_insert(built.table(), built.sql())
        })?;
        self.db.run(&ctx, statement, |n| StatementOutcome::Affected(*n))
    }
}

impl<E> ValueSetter for InsertQb<'_, E> {
    fn record(&mut self, column: ColumnDef, value: Value) {
        self.values.insert(column, value);
    }
}

/// Built insert-or-replace.
///
/// `args` are in client order (the order columns were first set); `index_map`
/// sends each client index to its placeholder(s) in `sql`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOrReplace {
    table: String,
    sql: String,
    args: Vec<Value>,
    index_map: IndexToIndicesMap,
}

impl InsertOrReplace {
    pub fn index_map(&self) -> &IndexToIndicesMap {
        &self.index_map
    }
}

impl Statement for InsertOrReplace {
    fn query_type(&self) -> QueryType {
        QueryType::InsertOrReplace
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

    /// `arg_count` is the placeholder count, which exceeds `args().len()` when
    /// the dialect binds non-id values twice.
    fn context(&self) -> StatementContext {
        StatementContext::new(
            self.query_type(),
            &self.table,
            &self.sql,
            self.index_map.target_count(),
        )
    }
}

/// Insert-or-replace builder.
///
/// Id columns are rendered first whatever order they are set in; see
/// [`InsertOrReplaceValues`].
pub struct InsertOrReplaceQb<'a, E> {
    db: &'a Database<E>,
    table: &'a Table,
    values: InsertOrReplaceValues,
}

impl<'a, E: Engine> InsertOrReplaceQb<'a, E> {
    pub(crate) fn new(db: &'a Database<E>, table: &'a Table) -> Self {
        Self {
            db,
            table,
            values: InsertOrReplaceValues::new(),
        }
    }

    pub fn column_values(&self) -> &InsertOrReplaceValues {
        &self.values
    }

    /// Render SQL and the index map. Fails without an id column value or
    /// when a column belongs to another table.
    pub fn build(&self) -> OrmResult<InsertOrReplace> {
        check_table(self.table.name(), self.values.columns())?;
        let dialect = self.db.dialect();
        let sql = dialect.build_insert_or_replace(
            self.table.name(),
            &self.values.id_columns(),
            &self.values.other_columns(),
        )?;
        let index_map = self
            .values
            .index_map(dialect.insert_or_replace_rebinds_non_id())?;
        Ok(InsertOrReplace {
            table: self.table.name().to_string(),
            sql,
            args: self.values.client_args(),
            index_map,
        })
    }

    pub fn to_sql(&self) -> OrmResult<String> {
        self.build().map(|s| s.sql)
    }

    /// Compile and bind through the index map. The caller owns the statement.
    pub fn compile(&self) -> OrmResult<RemappedStatement<E::Statement>> {
        let built = self.build()?;
        self.prepare(&built)
    }

    /// Compile, execute and close. Returns the affected row count.
    pub fn insert_or_replace(&self) -> OrmResult<u64> {
        let built = self.build()?;
        let statement = self.prepare(&built)?;
        self.db
            .run(&built.context(), statement, |n| StatementOutcome::Affected(*n))
    }

    fn prepare(&self, built: &InsertOrReplace) -> OrmResult<RemappedStatement<E::Statement>> {
        let map = built.index_map.clone();
        self.db.prepare(&built.context(), built.args(), |engine| {
            let inner = engine.compile_insert_or_replace(built.table(), built.sql())?;
            Ok(RemappedStatement::new(inner, map))
        })
    }
}

impl<E> ValueSetter for InsertOrReplaceQb<'_, E> {
    fn record(&mut self, column: ColumnDef, value: Value) {
        self.values.insert(column, value);
    }
}
