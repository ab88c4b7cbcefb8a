//! CREATE TABLE builder.

use crate::database::Database;
use crate::engine::Engine;
use crate::error::OrmResult;
use crate::monitor::{QueryType, StatementOutcome};
use crate::qb::Statement;
use crate::qb::traits::simple_statement;
use crate::table::Table;

simple_statement! {
    /// Built `CREATE TABLE ...`. Never carries arguments.
    CreateTable => QueryType::CreateTable
}

/// Renders a [`Table`]'s DDL through the dialect.
pub struct CreateTableQb<'a, E> {
    db: &'a Database<E>,
    table: &'a Table,
}

impl<'a, E: Engine> CreateTableQb<'a, E> {
    pub fn new(db: &'a Database<E>, table: &'a Table) -> Self {
        Self { db, table }
    }

    pub fn build(&self) -> OrmResult<CreateTable> {
        Ok(CreateTable {
            table: self.table.name().to_string(),
            sql: self.db.dialect().build_create_table(self.table)?,
            args: Vec::new(),
        })
    }

    pub fn to_sql(&self) -> OrmResult<String> {
        self.build().map(|s| s.sql)
    }

    pub fn compile(&self) -> OrmResult<E::Statement> {
        let built = self.build()?;
        self.db.prepare(&built.context(), built.args(), |engine| {
            engine.compile_create_table(built.table(), built.sql())
        })
    }

    pub fn execute(&self) -> OrmResult<u64> {
        let built = self.build()?;
        let ctx = built.context();
        let statement = self.db.prepare(&ctx, built.args(), |engine| {
            engine.compile_create_table(built.table(), built.sql())
        })?;
        self.db.run(&ctx, statement, |n| StatementOutcome::Affected(*n))
    }
}
