use super::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn ctx(query_type: QueryType) -> StatementContext {
    StatementContext::new(query_type, "users", "DELETE FROM users", 0)
}

struct Abort(&'static str);

impl StatementHook for Abort {
    fn before_compile(&self, _ctx: &StatementContext) -> HookAction {
        HookAction::Abort(self.0.to_string())
    }
}

#[derive(Default)]
struct Counting {
    before: AtomicUsize,
    after: AtomicUsize,
}

impl StatementHook for Counting {
    fn before_compile(&self, _ctx: &StatementContext) -> HookAction {
        self.before.fetch_add(1, Ordering::Relaxed);
        HookAction::Continue
    }

    fn after_execute(&self, _ctx: &StatementContext, _d: Duration, _o: &StatementOutcome) {
        self.after.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn test_truncate_sql_bytes_char_boundary() {
    assert_eq!(truncate_sql_bytes("SELECT 1", 100), "SELECT 1");
    assert_eq!(truncate_sql_bytes("SELECT 1", 6), "SELECT");
    // 'é' is two bytes; cutting inside it backs off.
    assert_eq!(truncate_sql_bytes("café", 4), "caf");
}

#[test]
fn test_outcome_error_truncated() {
    let long = "x".repeat(600);
    match StatementOutcome::error(long) {
        StatementOutcome::Error(msg) => {
            assert_eq!(msg.len(), 515);
            assert!(msg.ends_with("..."));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        StatementOutcome::error("boom".to_string()).to_string(),
        "error: boom"
    );
}

#[test]
fn test_composite_first_abort_wins() {
    let counting = Arc::new(Counting::default());
    let hook = CompositeHook::new()
        .add_arc(counting.clone())
        .add(Abort("first"))
        .add(Abort("second"))
        .add_arc(counting.clone());

    assert_eq!(
        hook.before_compile(&ctx(QueryType::Delete)),
        HookAction::Abort("first".to_string())
    );
    assert_eq!(counting.before.load(Ordering::Relaxed), 1);

    hook.after_execute(
        &ctx(QueryType::Delete),
        Duration::from_millis(1),
        &StatementOutcome::Affected(1),
    );
    assert_eq!(counting.after.load(Ordering::Relaxed), 2);
}

#[test]
fn test_stats_hook() {
    let stats = StatsHook::new();
    stats.before_compile(&ctx(QueryType::Select));
    stats.before_compile(&ctx(QueryType::InsertOrReplace));
    stats.before_compile(&ctx(QueryType::InsertOrReplace));
    stats.after_execute(
        &ctx(QueryType::Select),
        Duration::from_millis(10),
        &StatementOutcome::Cursor,
    );
    stats.after_execute(
        &ctx(QueryType::InsertOrReplace),
        Duration::from_millis(20),
        &StatementOutcome::error("constraint".to_string()),
    );
    stats.on_slow_statement(&ctx(QueryType::InsertOrReplace), Duration::from_millis(20));

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.compiled, 3);
    assert_eq!(snapshot.executed, 2);
    assert_eq!(snapshot.failed, 1);
    assert_eq!(snapshot.slow, 1);
    assert_eq!(snapshot.select_count, 1);
    assert_eq!(snapshot.insert_or_replace_count, 2);
    assert_eq!(snapshot.total_duration, Duration::from_millis(30));

    stats.reset();
    assert_eq!(stats.snapshot(), StatementStats::default());
}

#[test]
fn test_query_type_display() {
    assert_eq!(QueryType::InsertOrReplace.to_string(), "INSERT OR REPLACE");
    assert_eq!(QueryType::CreateTable.to_string(), "CREATE TABLE");
}

#[cfg(feature = "tracing")]
#[test]
fn test_tracing_hook_truncation() {
    let hook = TracingSqlHook::new().max_sql_length(10);
    assert_eq!(hook.truncate_sql("SELECT * FROM users"), "SELECT * F...");
    assert_eq!(hook.truncate_sql("SELECT 1"), "SELECT 1");
    assert_eq!(
        hook.before_compile(&ctx(QueryType::Select)),
        HookAction::Continue
    );

    let hook = TracingSqlHook::new().no_truncate();
    assert_eq!(hook.truncate_sql(&"x".repeat(500)).len(), 500);
}
