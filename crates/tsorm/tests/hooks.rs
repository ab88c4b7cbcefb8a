mod common;

use common::RecordingEngine;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tsorm::prelude::*;
use tsorm::{
    HookAction, QueryType, StatementContext, StatementHook, StatementOutcome, StatementStats,
    StatsHook,
};

const ID: Column<i64> = Column::new("users", "id").id();
const NAME: Column<String> = Column::new("users", "name");

fn users() -> Table {
    Table::new("users").column(&ID).column(&NAME)
}

/// Refuses DELETE without WHERE.
struct NoBareDelete;

impl StatementHook for NoBareDelete {
    fn before_compile(&self, ctx: &StatementContext) -> HookAction {
        if ctx.query_type == QueryType::Delete && !ctx.sql.contains(" WHERE ") {
            return HookAction::Abort(format!("unfiltered delete on {}", ctx.table));
        }
        HookAction::Continue
    }
}

#[derive(Default)]
struct Outcomes(Mutex<Vec<(QueryType, StatementOutcome)>>);

impl StatementHook for Outcomes {
    fn after_execute(
        &self,
        ctx: &StatementContext,
        _duration: Duration,
        outcome: &StatementOutcome,
    ) {
        self.0.lock().unwrap().push((ctx.query_type, outcome.clone()));
    }
}

#[test]
fn abort_stops_before_the_engine() {
    let db = Database::new(RecordingEngine::new(), GenericDialect).with_hook(NoBareDelete);
    let users = users();

    let err = db.delete(&users).delete().unwrap_err();
    match err {
        OrmError::Aborted(reason) => assert_eq!(reason, "unfiltered delete on users"),
        other => panic!("expected abort, got {other:?}"),
    }
    assert!(db.engine().records().is_empty());

    db.delete(&users)
        .filter(|w| {
            w.eq(&ID, 1i64);
        })
        .delete()
        .unwrap();
    assert_eq!(db.engine().records().len(), 1);
}

#[test]
fn abort_applies_to_compile_too() {
    let db = Database::new(RecordingEngine::new(), SqliteDialect).with_hook(NoBareDelete);
    let users = users();

    assert!(matches!(
        db.delete(&users).compile(),
        Err(OrmError::Aborted(_))
    ));
    assert!(db.engine().records().is_empty());
}

#[test]
fn stats_count_by_type() {
    let stats = Arc::new(StatsHook::new());
    let db = Database::new(RecordingEngine::new(), SqliteDialect).with_hook_arc(stats.clone());
    let users = users();

    db.create_table(&users).unwrap();
    db.insert(&users).set(&ID, 1i64).set(&NAME, "a").insert().unwrap();
    db.insert_or_replace(&users)
        .set(&ID, 1i64)
        .set(&NAME, "b")
        .insert_or_replace()
        .unwrap();
    db.update(&users).set(&NAME, "c").update().unwrap();
    db.select(&users).query().unwrap();
    // Compiled but never executed by tsorm.
    let mut statement = db.delete(&users).compile().unwrap();
    statement.close().unwrap();

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.compiled, 6);
    assert_eq!(snapshot.executed, 5);
    assert_eq!(snapshot.failed, 0);
    assert_eq!(snapshot.create_table_count, 1);
    assert_eq!(snapshot.insert_count, 1);
    assert_eq!(snapshot.insert_or_replace_count, 1);
    assert_eq!(snapshot.update_count, 1);
    assert_eq!(snapshot.select_count, 1);
    assert_eq!(snapshot.delete_count, 1);

    stats.reset();
    assert_eq!(stats.snapshot(), StatementStats::default());
}

#[test]
fn failures_are_reported_to_hooks() {
    let stats = Arc::new(StatsHook::new());
    let outcomes = Arc::new(Outcomes::default());
    let db = Database::new(RecordingEngine::new().failing_execute(), H2Dialect)
        .with_hook(stats.clone())
        .with_hook(outcomes.clone());
    let users = users();

    assert!(db.insert(&users).set(&ID, 1i64).insert().is_err());

    assert_eq!(stats.snapshot().failed, 1);
    let seen = outcomes.0.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, QueryType::Insert);
    assert_eq!(
        seen[0].1,
        StatementOutcome::Error("Execution error: UNIQUE constraint failed".to_string())
    );
}

#[test]
fn outcomes_describe_results() {
    let outcomes = Arc::new(Outcomes::default());
    let db = Database::new(RecordingEngine::new().affecting(4), GenericDialect)
        .with_hook(outcomes.clone());
    let users = users();

    db.update(&users).set(&NAME, "n").update().unwrap();
    db.select(&users).query().unwrap();

    let seen = outcomes.0.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            (QueryType::Update, StatementOutcome::Affected(4)),
            (QueryType::Select, StatementOutcome::Cursor),
        ]
    );
}

#[test]
fn zero_threshold_marks_everything_slow() {
    let stats = Arc::new(StatsHook::new());
    let config = DatabaseConfig::new().with_slow_statement_threshold(Duration::ZERO);
    let db = Database::new(RecordingEngine::new(), GenericDialect)
        .with_config(config)
        .with_hook(stats.clone());
    let users = users();

    db.select(&users).query().unwrap();
    db.delete(&users).delete().unwrap();
    assert_eq!(stats.snapshot().slow, 2);
}

#[test]
fn disabled_hooks_are_skipped() {
    let stats = Arc::new(StatsHook::new());
    let db = Database::new(RecordingEngine::new(), GenericDialect)
        .with_config(DatabaseConfig::new().disable_hooks())
        .with_hook(NoBareDelete)
        .with_hook(stats.clone());
    let users = users();

    db.delete(&users).delete().unwrap();
    assert_eq!(stats.snapshot(), StatementStats::default());
    assert_eq!(db.engine().records().len(), 1);
}

#[cfg(feature = "tracing")]
#[test]
fn tracing_hook_logs_without_interfering() {
    use tsorm::TracingSqlHook;

    common::init_tracing();
    let config = DatabaseConfig::new()
        .with_slow_statement_threshold(Duration::ZERO)
        .with_log_bound_values(true);
    let db = Database::new(RecordingEngine::new(), SqliteDialect)
        .with_config(config)
        .with_hook(TracingSqlHook::new().max_sql_length(16));
    let users = users();

    db.insert(&users)
        .set(&ID, 3i64)
        .set(&NAME, "a name long enough to be cut")
        .insert()
        .unwrap();
    assert!(db.engine().last().executed);
}
