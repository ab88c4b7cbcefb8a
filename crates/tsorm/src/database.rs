//! Entry point tying an engine, a dialect, configuration and hooks together.

use crate::dialect::Dialect;
use crate::engine::{CompiledStatement, Engine, bind_all, execute_and_close};
use crate::error::{OrmError, OrmResult};
use crate::monitor::{
    CompositeHook, HookAction, StatementContext, StatementHook, StatementOutcome,
};
use crate::qb::{CreateTableQb, DeleteQb, InsertOrReplaceQb, InsertQb, SelectQb, UpdateQb};
use crate::table::Table;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runtime options for a [`Database`].
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Terminal executions slower than this trigger `on_slow_statement`.
    pub slow_statement_threshold: Option<Duration>,
    /// Whether hooks run at all.
    pub hooks_enabled: bool,
    /// Include bound values in the `tsorm.sql` debug event.
    pub log_bound_values: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            slow_statement_threshold: None,
            hooks_enabled: true,
            log_bound_values: false,
        }
    }
}

impl DatabaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slow_statement_threshold(mut self, threshold: Duration) -> Self {
        self.slow_statement_threshold = Some(threshold);
        self
    }

    pub fn enable_hooks(mut self) -> Self {
        self.hooks_enabled = true;
        self
    }

    pub fn disable_hooks(mut self) -> Self {
        self.hooks_enabled = false;
        self
    }

    /// Log argument values. Off by default since they may hold user data.
    pub fn with_log_bound_values(mut self, enabled: bool) -> Self {
        self.log_bound_values = enabled;
        self
    }
}

/// Statement factory over an [`Engine`].
///
/// # Example
///
/// ```rust,ignore
/// use tsorm::prelude::*;
///
/// const ID: Column<i64> = Column::new("users", "id").id();
/// const NAME: Column<String> = Column::new("users", "name");
///
/// let users = Table::new("users").column(&ID).column(&NAME);
/// let db = Database::new(engine, SqliteDialect);
///
/// db.create_table(&users)?;
/// db.insert(&users).set(&ID, 1).set(&NAME, "ann").insert()?;
/// let cursor = db
///     .select(&users)
///     .filter(|w| {
///         w.like(&NAME, "a%");
///     })
///     .order_by_asc(&NAME)
///     .query()?;
/// ```
pub struct Database<E> {
    engine: E,
    dialect: Arc<dyn Dialect>,
    config: DatabaseConfig,
    hooks: CompositeHook,
}

impl<E: Engine> Database<E> {
    pub fn new(engine: E, dialect: impl Dialect + 'static) -> Self {
        Self {
            engine,
            dialect: Arc::new(dialect),
            config: DatabaseConfig::default(),
            hooks: CompositeHook::new(),
        }
    }

    pub fn with_config(mut self, config: DatabaseConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_hook<H: StatementHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn with_hook_arc(mut self, hook: Arc<dyn StatementHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn insert<'a>(&'a self, table: &'a Table) -> InsertQb<'a, E> {
        InsertQb::new(self, table)
    }

    pub fn insert_or_replace<'a>(&'a self, table: &'a Table) -> InsertOrReplaceQb<'a, E> {
        InsertOrReplaceQb::new(self, table)
    }

    pub fn update<'a>(&'a self, table: &'a Table) -> UpdateQb<'a, E> {
        UpdateQb::new(self, table)
    }

    pub fn delete<'a>(&'a self, table: &'a Table) -> DeleteQb<'a, E> {
        DeleteQb::new(self, table)
    }

    pub fn select<'a>(&'a self, table: &'a Table) -> SelectQb<'a, E> {
        SelectQb::new(self, table)
    }

    /// Render and execute `CREATE TABLE`.
    pub fn create_table(&self, table: &Table) -> OrmResult<u64> {
        CreateTableQb::new(self, table).execute()
    }

    /// Run hooks, compile through `compile`, and bind `args` at 1..=n.
    ///
    /// Nothing reaches the engine if a hook aborts. A statement whose binding
    /// fails is closed before the error is returned.
    pub(crate) fn prepare<S, F>(
        &self,
        ctx: &StatementContext,
        args: &[Value],
        compile: F,
    ) -> OrmResult<S>
    where
        S: CompiledStatement,
        F: FnOnce(&E) -> OrmResult<S>,
    {
        if self.config.hooks_enabled {
            if let HookAction::Abort(reason) = self.hooks.before_compile(ctx) {
                return Err(OrmError::Aborted(reason));
            }
        }
        self.log_compile(ctx, args);

        let statement = compile(&self.engine)?;
        bind_all(statement, args)
    }

    /// Execute and close, reporting timing and outcome to hooks.
    pub(crate) fn run<S, F>(
        &self,
        ctx: &StatementContext,
        statement: S,
        describe: F,
    ) -> OrmResult<S::Output>
    where
        S: CompiledStatement,
        F: FnOnce(&S::Output) -> StatementOutcome,
    {
        let start = Instant::now();
        let result = execute_and_close(statement);
        let elapsed = start.elapsed();

        if self.config.hooks_enabled {
            let outcome = match &result {
                Ok(output) => describe(output),
                Err(err) => StatementOutcome::error(err.to_string()),
            };
            self.hooks.after_execute(ctx, elapsed, &outcome);
            if let Some(threshold) = self.config.slow_statement_threshold {
                if elapsed >= threshold {
                    self.hooks.on_slow_statement(ctx, elapsed);
                }
            }
        }
        result
    }

    #[cfg(feature = "tracing")]
    fn log_compile(&self, ctx: &StatementContext, args: &[Value]) {
        if self.config.log_bound_values {
            tracing::debug!(
                target: "tsorm.sql",
                dialect = self.dialect.name(),
                query_type = %ctx.query_type,
                table = %ctx.table,
                arg_count = ctx.arg_count,
                args = ?args,
                sql = %ctx.sql,
                "compiling statement"
            );
        } else {
            tracing::debug!(
                target: "tsorm.sql",
                dialect = self.dialect.name(),
                query_type = %ctx.query_type,
                table = %ctx.table,
                arg_count = ctx.arg_count,
                sql = %ctx.sql,
                "compiling statement"
            );
        }
    }

    #[cfg(not(feature = "tracing"))]
    fn log_compile(&self, _ctx: &StatementContext, _args: &[Value]) {}
}

impl<E: fmt::Debug> fmt::Debug for Database<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("engine", &self.engine)
            .field("dialect", &self.dialect.name())
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .finish()
    }
}
