//! Statement hooks.
//!
//! A [`Database`](crate::Database) runs its hooks around every statement:
//! - `before_compile` after the SQL is rendered, with the option to abort
//! - `after_execute` once a terminal operation finishes
//! - `on_slow_statement` when a terminal operation exceeds
//!   [`DatabaseConfig::slow_statement_threshold`](crate::DatabaseConfig)
//!
//! # Example
//!
//! ```rust
//! use tsorm::monitor::{HookAction, QueryType, StatementContext, StatementHook};
//!
//! /// Refuses unfiltered deletes.
//! struct NoBareDelete;
//!
//! impl StatementHook for NoBareDelete {
//!     fn before_compile(&self, ctx: &StatementContext) -> HookAction {
//!         if ctx.query_type == QueryType::Delete && !ctx.sql.contains(" WHERE ") {
//!             return HookAction::Abort(format!("DELETE without WHERE on {}", ctx.table));
//!         }
//!         HookAction::Continue
//!     }
//! }
//! ```

mod monitors;
mod types;

#[cfg(feature = "tracing")]
mod tracing_hook;

#[cfg(test)]
mod tests;

pub use monitors::{CompositeHook, StatementStats, StatsHook};
pub use types::{HookAction, QueryType, StatementContext, StatementHook, StatementOutcome};

#[cfg(feature = "tracing")]
pub use tracing_hook::TracingSqlHook;

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
