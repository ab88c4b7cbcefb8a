use std::fmt;
use std::time::Duration;

/// Kind of statement being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    Select,
    Insert,
    InsertOrReplace,
    Update,
    Delete,
    CreateTable,
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryType::Select => "SELECT",
            QueryType::Insert => "INSERT",
            QueryType::InsertOrReplace => "INSERT OR REPLACE",
            QueryType::Update => "UPDATE",
            QueryType::Delete => "DELETE",
            QueryType::CreateTable => "CREATE TABLE",
        };
        f.write_str(name)
    }
}

/// What hooks see about a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementContext {
    pub query_type: QueryType,
    /// Target table; the base table for queries.
    pub table: String,
    pub sql: String,
    /// Placeholders in `sql`.
    pub arg_count: usize,
}

impl StatementContext {
    pub fn new(query_type: QueryType, table: &str, sql: &str, arg_count: usize) -> Self {
        Self {
            query_type,
            table: table.to_string(),
            sql: sql.to_string(),
            arg_count,
        }
    }
}

/// Maximum length for error messages in `StatementOutcome::Error`.
const MAX_ERROR_LEN: usize = 512;

/// Result of a terminal execution, for monitoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementOutcome {
    /// Rows affected by a mutation or DDL statement.
    Affected(u64),
    /// A query produced a cursor.
    Cursor,
    /// Execution failed (message truncated to 512 bytes).
    Error(String),
}

impl StatementOutcome {
    pub fn error(msg: String) -> Self {
        if msg.len() <= MAX_ERROR_LEN {
            return Self::Error(msg);
        }
        Self::Error(format!("{}...", super::truncate_sql_bytes(&msg, MAX_ERROR_LEN)))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for StatementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementOutcome::Affected(n) => write!(f, "{n} affected"),
            StatementOutcome::Cursor => f.write_str("cursor"),
            StatementOutcome::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Returned by [`StatementHook::before_compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookAction {
    Continue,
    /// Refuse the statement; nothing reaches the engine.
    Abort(String),
}

/// Observes statements passing through a [`Database`](crate::Database).
pub trait StatementHook: Send + Sync {
    /// Called after the SQL is rendered, before the engine compiles it.
    fn before_compile(&self, ctx: &StatementContext) -> HookAction {
        let _ = ctx;
        HookAction::Continue
    }

    /// Called after a terminal execution, successful or not.
    fn after_execute(
        &self,
        _ctx: &StatementContext,
        _duration: Duration,
        _outcome: &StatementOutcome,
    ) {
    }

    /// Called when a terminal execution exceeds the configured threshold.
    fn on_slow_statement(&self, _ctx: &StatementContext, _duration: Duration) {}
}

impl<H: StatementHook + ?Sized> StatementHook for std::sync::Arc<H> {
    fn before_compile(&self, ctx: &StatementContext) -> HookAction {
        (**self).before_compile(ctx)
    }

    fn after_execute(
        &self,
        ctx: &StatementContext,
        duration: Duration,
        outcome: &StatementOutcome,
    ) {
        (**self).after_execute(ctx, duration, outcome)
    }

    fn on_slow_statement(&self, ctx: &StatementContext, duration: Duration) {
        (**self).on_slow_statement(ctx, duration)
    }
}
