//! Recording engine shared by the integration tests.
#![allow(dead_code)]

use bytes::Bytes;
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;
use tsorm::{CompiledStatement, Engine, OrmError, OrmResult, SqlType, Value};

/// Everything the engine saw for one compiled statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub kind: &'static str,
    pub tables: Vec<String>,
    pub sql: String,
    /// `(index, value)` in call order.
    pub binds: Vec<(usize, Value)>,
    pub executed: bool,
    pub closed: bool,
}

impl Record {
    /// Bound values ordered by position; later binds at a position win.
    pub fn by_position(&self) -> Vec<Value> {
        let max = self.binds.iter().map(|(i, _)| *i).max().unwrap_or(0);
        let mut out = vec![None; max];
        for (i, v) in &self.binds {
            out[i - 1] = Some(v.clone());
        }
        out.into_iter()
            .map(|v| v.expect("every position bound"))
            .collect()
    }
}

type Journal = Rc<RefCell<Vec<Record>>>;

#[derive(Debug, Default)]
pub struct RecordingEngine {
    journal: Journal,
    fail_bind_at: Cell<Option<usize>>,
    fail_execute: Cell<bool>,
    fail_compile: Cell<bool>,
    rows: Cell<u64>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        let engine = Self::default();
        engine.rows.set(1);
        engine
    }

    /// Reject the bind at this 1-based position.
    pub fn failing_bind_at(self, index: usize) -> Self {
        self.fail_bind_at.set(Some(index));
        self
    }

    pub fn failing_execute(self) -> Self {
        self.fail_execute.set(true);
        self
    }

    pub fn failing_compile(self) -> Self {
        self.fail_compile.set(true);
        self
    }

    pub fn affecting(self, rows: u64) -> Self {
        self.rows.set(rows);
        self
    }

    pub fn records(&self) -> Ref<'_, Vec<Record>> {
        self.journal.borrow()
    }

    pub fn last(&self) -> Record {
        self.journal
            .borrow()
            .last()
            .cloned()
            .expect("a statement was compiled")
    }

    fn compile(
        &self,
        kind: &'static str,
        tables: &[&str],
        sql: &str,
    ) -> OrmResult<RecordingStatement> {
        if self.fail_compile.get() {
            return Err(OrmError::execution(std::io::Error::other(format!(
                "cannot prepare: {sql}"
            ))));
        }
        let mut journal = self.journal.borrow_mut();
        journal.push(Record {
            kind,
            tables: tables.iter().map(|t| t.to_string()).collect(),
            sql: sql.to_string(),
            binds: Vec::new(),
            executed: false,
            closed: false,
        });
        Ok(RecordingStatement {
            slot: journal.len() - 1,
            journal: Rc::clone(&self.journal),
            fail_bind_at: self.fail_bind_at.get(),
            fail_execute: self.fail_execute.get(),
            rows: self.rows.get(),
        })
    }
}

#[derive(Debug)]
pub struct RecordingStatement {
    slot: usize,
    journal: Journal,
    fail_bind_at: Option<usize>,
    fail_execute: bool,
    rows: u64,
}

impl RecordingStatement {
    fn bind(&mut self, index: usize, value: Value) -> OrmResult<()> {
        if self.fail_bind_at == Some(index) {
            return Err(OrmError::execution(std::io::Error::other(format!(
                "type mismatch at {index}"
            ))));
        }
        self.journal.borrow_mut()[self.slot].binds.push((index, value));
        Ok(())
    }

    fn run(&mut self) -> OrmResult<()> {
        if self.fail_execute {
            return Err(OrmError::execution(std::io::Error::other(
                "UNIQUE constraint failed",
            )));
        }
        self.journal.borrow_mut()[self.slot].executed = true;
        Ok(())
    }

    pub fn record(&self) -> Record {
        self.journal.borrow()[self.slot].clone()
    }
}

/// Query result handed back by [`RecordingEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub sql: String,
    pub args: Vec<(usize, Value)>,
}

pub struct RecordingQuery(RecordingStatement);

pub struct RecordingMutation(RecordingStatement);

macro_rules! recording_binds {
    ($outer:ty, $output:ty, |$this:ident| $execute:expr) => {
        impl CompiledStatement for $outer {
            type Output = $output;

            fn bind_short(&mut self, index: usize, value: i16) -> OrmResult<()> {
                self.0.bind(index, Value::Short(value))
            }
            fn bind_int(&mut self, index: usize, value: i32) -> OrmResult<()> {
                self.0.bind(index, Value::Int(value))
            }
            fn bind_long(&mut self, index: usize, value: i64) -> OrmResult<()> {
                self.0.bind(index, Value::Long(value))
            }
            fn bind_float(&mut self, index: usize, value: f32) -> OrmResult<()> {
                self.0.bind(index, Value::Float(value))
            }
            fn bind_double(&mut self, index: usize, value: f64) -> OrmResult<()> {
                self.0.bind(index, Value::Double(value))
            }
            fn bind_string(&mut self, index: usize, value: &str) -> OrmResult<()> {
                self.0.bind(index, Value::String(value.to_string()))
            }
            fn bind_blob(&mut self, index: usize, value: &[u8]) -> OrmResult<()> {
                self.0.bind(index, Value::Blob(Bytes::copy_from_slice(value)))
            }
            fn bind_null(&mut self, index: usize, sql_type: SqlType) -> OrmResult<()> {
                self.0.bind(index, Value::Null(sql_type))
            }
            fn clear_bindings(&mut self) -> OrmResult<()> {
                self.0.journal.borrow_mut()[self.0.slot].binds.clear();
                Ok(())
            }
            fn execute(&mut self) -> OrmResult<$output> {
                self.0.run()?;
                let $this = &self.0;
                Ok($execute)
            }
            fn close(&mut self) -> OrmResult<()> {
                self.0.journal.borrow_mut()[self.0.slot].closed = true;
                Ok(())
            }
        }

        impl $outer {
            pub fn record(&self) -> Record {
                self.0.record()
            }
        }
    };
}

recording_binds!(RecordingMutation, u64, |this| this.rows);
recording_binds!(RecordingQuery, Cursor, |this| {
    let record = this.record();
    Cursor {
        sql: record.sql,
        args: record.binds,
    }
});

impl Engine for RecordingEngine {
    type Cursor = Cursor;
    type Statement = RecordingMutation;
    type QueryStatement = RecordingQuery;

    fn compile_insert(&self, table: &str, sql: &str) -> OrmResult<RecordingMutation> {
        self.compile("insert", &[table], sql).map(RecordingMutation)
    }

    fn compile_insert_or_replace(&self, table: &str, sql: &str) -> OrmResult<RecordingMutation> {
        self.compile("insert_or_replace", &[table], sql)
            .map(RecordingMutation)
    }

    fn compile_update(&self, table: &str, sql: &str) -> OrmResult<RecordingMutation> {
        self.compile("update", &[table], sql).map(RecordingMutation)
    }

    fn compile_delete(&self, table: &str, sql: &str) -> OrmResult<RecordingMutation> {
        self.compile("delete", &[table], sql).map(RecordingMutation)
    }

    fn compile_create_table(&self, table: &str, sql: &str) -> OrmResult<RecordingMutation> {
        self.compile("create_table", &[table], sql)
            .map(RecordingMutation)
    }

    fn compile_query(&self, tables: &[&str], sql: &str) -> OrmResult<RecordingQuery> {
        self.compile("query", tables, sql).map(RecordingQuery)
    }
}

/// Route `tsorm.sql` events to the test writer. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}
