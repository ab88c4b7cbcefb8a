use super::types::{HookAction, QueryType, StatementContext, StatementHook, StatementOutcome};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A composite hook that runs multiple hooks in sequence.
///
/// The first hook to abort wins; later hooks are not consulted.
#[derive(Clone, Default)]
pub struct CompositeHook {
    hooks: Vec<Arc<dyn StatementHook>>,
}

impl CompositeHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hook.
    #[allow(clippy::should_implement_trait)]
    pub fn add<H: StatementHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Add an Arc-wrapped hook.
    pub fn add_arc(mut self, hook: Arc<dyn StatementHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn push(&mut self, hook: Arc<dyn StatementHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl std::fmt::Debug for CompositeHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeHook")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl StatementHook for CompositeHook {
    fn before_compile(&self, ctx: &StatementContext) -> HookAction {
        for hook in &self.hooks {
            if let action @ HookAction::Abort(_) = hook.before_compile(ctx) {
                return action;
            }
        }
        HookAction::Continue
    }

    fn after_execute(
        &self,
        ctx: &StatementContext,
        duration: Duration,
        outcome: &StatementOutcome,
    ) {
        for hook in &self.hooks {
            hook.after_execute(ctx, duration, outcome);
        }
    }

    fn on_slow_statement(&self, ctx: &StatementContext, duration: Duration) {
        for hook in &self.hooks {
            hook.on_slow_statement(ctx, duration);
        }
    }
}

/// Counts statements by type, plus failures and slow executions.
#[derive(Debug, Default)]
pub struct StatsHook {
    compiled: AtomicU64,
    executed: AtomicU64,
    failed: AtomicU64,
    slow: AtomicU64,
    total_duration_nanos: AtomicU64,
    select_count: AtomicU64,
    insert_count: AtomicU64,
    insert_or_replace_count: AtomicU64,
    update_count: AtomicU64,
    delete_count: AtomicU64,
    create_table_count: AtomicU64,
}

/// Point-in-time copy of [`StatsHook`] counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementStats {
    /// Statements that passed `before_compile`.
    pub compiled: u64,
    /// Terminal executions, failed ones included.
    pub executed: u64,
    pub failed: u64,
    pub slow: u64,
    pub total_duration: Duration,
    pub select_count: u64,
    pub insert_count: u64,
    pub insert_or_replace_count: u64,
    pub update_count: u64,
    pub delete_count: u64,
    pub create_table_count: u64,
}

impl StatsHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StatementStats {
        StatementStats {
            compiled: self.compiled.load(Ordering::Relaxed),
            executed: self.executed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            slow: self.slow.load(Ordering::Relaxed),
            total_duration: Duration::from_nanos(self.total_duration_nanos.load(Ordering::Relaxed)),
            select_count: self.select_count.load(Ordering::Relaxed),
            insert_count: self.insert_count.load(Ordering::Relaxed),
            insert_or_replace_count: self.insert_or_replace_count.load(Ordering::Relaxed),
            update_count: self.update_count.load(Ordering::Relaxed),
            delete_count: self.delete_count.load(Ordering::Relaxed),
            create_table_count: self.create_table_count.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.compiled,
            &self.executed,
            &self.failed,
            &self.slow,
            &self.total_duration_nanos,
            &self.select_count,
            &self.insert_count,
            &self.insert_or_replace_count,
            &self.update_count,
            &self.delete_count,
            &self.create_table_count,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    fn counter(&self, query_type: QueryType) -> &AtomicU64 {
        match query_type {
            QueryType::Select => &self.select_count,
            QueryType::Insert => &self.insert_count,
            QueryType::InsertOrReplace => &self.insert_or_replace_count,
            QueryType::Update => &self.update_count,
            QueryType::Delete => &self.delete_count,
            QueryType::CreateTable => &self.create_table_count,
        }
    }
}

impl StatementHook for StatsHook {
    fn before_compile(&self, ctx: &StatementContext) -> HookAction {
        self.compiled.fetch_add(1, Ordering::Relaxed);
        self.counter(ctx.query_type).fetch_add(1, Ordering::Relaxed);
        HookAction::Continue
    }

    fn after_execute(
        &self,
        _ctx: &StatementContext,
        duration: Duration,
        outcome: &StatementOutcome,
    ) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.executed.fetch_add(1, Ordering::Relaxed);
        let prev = self.total_duration_nanos.fetch_add(nanos, Ordering::Relaxed);
        if prev.checked_add(nanos).is_none() {
            self.total_duration_nanos.store(u64::MAX, Ordering::Relaxed);
        }
        if outcome.is_error() {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn on_slow_statement(&self, _ctx: &StatementContext, _duration: Duration) {
        self.slow.fetch_add(1, Ordering::Relaxed);
    }
}
