//! UPDATE builder.

use crate::database::Database;
use crate::engine::Engine;
use crate::error::OrmResult;
use crate::monitor::{QueryType, StatementOutcome};
use crate::qb::Statement;
use crate::qb::traits::simple_statement;
use crate::qb::values::{ColumnValues, ValueSetter, check_table};
use crate::table::{ColumnDef, Table};
use crate::value::Value;
use crate::where_builder::{Where, WhereBuilder};

simple_statement! {
    /// Built `UPDATE ... SET ...`. SET arguments come before WHERE arguments.
    Update => QueryType::Update
}

/// UPDATE builder.
pub struct UpdateQb<'a, E> {
    db: &'a Database<E>,
    table: &'a Table,
    values: ColumnValues,
    filter: Where,
}

impl<'a, E: Engine> UpdateQb<'a, E> {
    pub(crate) fn new(db: &'a Database<E>, table: &'a Table) -> Self {
        Self {
            db,
            table,
            values: ColumnValues::new(),
            filter: Where::default(),
        }
    }

    /// Replace the WHERE clause with the predicates added in `f`.
    ///
    /// Calling this again discards the previous WHERE.
    pub fn filter(mut self, f: impl FnOnce(&mut WhereBuilder)) -> Self {
        let mut builder = WhereBuilder::new();
        f(&mut builder);
        self.filter = builder.build();
        self
    }

    /// Replace the WHERE clause with a prebuilt snapshot.
    pub fn with_where(mut self, filter: Where) -> Self {
        self.filter = filter;
        self
    }

    /// Render SQL and collect arguments. Fails without any SET value or when a
    /// SET column belongs to another table.
    pub fn build(&self) -> OrmResult<Update> {
        check_table(self.table.name(), self.values.iter().map(|(c, _)| c))?;
        let columns = self.values.names();
        let sql = self
            .db
            .dialect()
            .build_update(self.table.name(), &columns, self.filter.sections())?;
        let args = self
            .values
            .values()
            .chain(self.filter.args())
            .cloned()
            .collect();
        Ok(Update {
            table: self.table.name().to_string(),
            sql,
            args,
        })
    }

    pub fn to_sql(&self) -> OrmResult<String> {
        self.build().map(|s| s.sql)
    }

    /// Compile and bind. The caller owns (and must close) the statement.
    pub fn compile(&self) -> OrmResult<E::Statement> {
        let built = self.build()?;
        self.db.prepare(&built.context(), built.args(), |engine| {
            engine.compile_update(built.table(), built.sql())
        })
    }

    /// Compile, execute and close. Returns the affected row count.
    pub fn update(&self) -> OrmResult<u64> {
        let built = self.build()?;
        let ctx = built.context();
        let statement = self.db.prepare(&ctx, built.args(), |engine| {
            engine.compile_update(built.table(), built.sql())
        })?;
        self.db.run(&ctx, statement, |n| StatementOutcome::Affected(*n))
    }
}

impl<E> ValueSetter for UpdateQb<'_, E> {
    fn record(&mut self, column: ColumnDef, value: Value) {
        self.values.insert(column, value);
    }
}
