use super::truncate_sql_bytes;
use super::types::{HookAction, StatementContext, StatementHook, StatementOutcome};
use std::time::Duration;
use tracing::Level;

/// A `tracing`-based hook that emits every statement before it is compiled,
/// and its outcome after execution.
///
/// Enable via the crate feature: `tsorm = { features = ["tracing"] }`.
#[derive(Debug, Clone)]
pub struct TracingSqlHook {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for TracingSqlHook {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl TracingSqlHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }
}

/// Dispatch a tracing event at a runtime-determined level.
macro_rules! emit_at_level {
    ($level:expr, $($field:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($field)*),
            Level::WARN  => tracing::warn!($($field)*),
            Level::INFO  => tracing::info!($($field)*),
            Level::DEBUG => tracing::debug!($($field)*),
            Level::TRACE => tracing::trace!($($field)*),
        }
    };
}

impl StatementHook for TracingSqlHook {
    fn before_compile(&self, ctx: &StatementContext) -> HookAction {
        let sql = self.truncate_sql(&ctx.sql);
        emit_at_level!(
            self.level,
            target: "tsorm.sql",
            query_type = %ctx.query_type,
            table = %ctx.table,
            arg_count = ctx.arg_count,
            sql = %sql,
        );
        HookAction::Continue
    }

    fn after_execute(
        &self,
        ctx: &StatementContext,
        duration: Duration,
        outcome: &StatementOutcome,
    ) {
        emit_at_level!(
            self.level,
            target: "tsorm.sql",
            query_type = %ctx.query_type,
            table = %ctx.table,
            duration_us = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
            outcome = %outcome,
        );
    }

    fn on_slow_statement(&self, ctx: &StatementContext, duration: Duration) {
        tracing::warn!(
            target: "tsorm.sql",
            query_type = %ctx.query_type,
            table = %ctx.table,
            duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            sql = %self.truncate_sql(&ctx.sql),
            "slow statement"
        );
    }
}
