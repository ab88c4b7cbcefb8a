//! DELETE builder.

use crate::database::Database;
use crate::engine::Engine;
use crate::error::OrmResult;
use crate::monitor::{QueryType, StatementOutcome};
use crate::qb::Statement;
use crate::qb::traits::simple_statement;
use crate::table::Table;
use crate::where_builder::{Where, WhereBuilder};

simple_statement! {
    /// Built `DELETE FROM ...`.
    Delete => QueryType::Delete
}

/// DELETE builder. Without a filter every row of the table is deleted.
pub struct DeleteQb<'a, E> {
    db: &'a Database<E>,
    table: &'a Table,
    filter: Where,
}

impl<'a, E: Engine> DeleteQb<'a, E> {
    pub(crate) fn new(db: &'a Database<E>, table: &'a Table) -> Self {
        Self {
            db,
            table,
            filter: Where::default(),
        }
    }

    /// Replace the WHERE clause with the predicates added in `f`.
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

    pub fn build(&self) -> OrmResult<Delete> {
        let sql = self
            .db
            .dialect()
            .build_delete(self.table.name(), self.filter.sections())?;
        Ok(Delete {
            table: self.table.name().to_string(),
            sql,
            args: self.filter.args().to_vec(),
        })
    }

    pub fn to_sql(&self) -> OrmResult<String> {
        self.build().map(|s| s.sql)
    }

    /// Compile and bind. The caller owns (and must close) the statement.
    pub fn compile(&self) -> OrmResult<E::Statement> {
        let built = self.build()?;
        self.db.prepare(&built.context(), built.args(), |engine| {
            engine.compile_delete(built.table(), built.sql())
        })
    }

    /// Compile, execute and close. Returns the affected row count.
    pub fn delete(&self) -> OrmResult<u64> {
        let built = self.build()?;
        let ctx = built.context();
        let statement = self.db.prepare(&ctx, built.args(), |engine| {
            engine.compile_delete(built.table(), built.sql())
        })?;
        self.db.run(&ctx, statement, |n| StatementOutcome::Affected(*n))
    }
}
