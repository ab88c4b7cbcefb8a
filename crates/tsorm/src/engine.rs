//! Execution engine abstraction.
//!
//! tsorm never talks to a database directly. An [`Engine`] compiles rendered
//! SQL into a [`CompiledStatement`]; tsorm binds the arguments, and either hands
//! the statement back to the caller or executes and closes it.
//!
//! Transactions, pooling and cancellation belong to the engine.

use crate::error::OrmResult;
use crate::value::{SqlType, Value};

/// A prepared, bindable statement owned by the caller until closed.
///
/// Bind indices are 1-based.
pub trait CompiledStatement {
    /// What `execute` yields: affected rows for mutations, a cursor for queries.
    type Output;

    fn bind_short(&mut self, index: usize, value: i16) -> OrmResult<()>;

    fn bind_int(&mut self, index: usize, value: i32) -> OrmResult<()>;

    fn bind_long(&mut self, index: usize, value: i64) -> OrmResult<()>;

    fn bind_float(&mut self, index: usize, value: f32) -> OrmResult<()>;

    fn bind_double(&mut self, index: usize, value: f64) -> OrmResult<()>;

    fn bind_string(&mut self, index: usize, value: &str) -> OrmResult<()>;

    fn bind_blob(&mut self, index: usize, value: &[u8]) -> OrmResult<()>;

    /// Bind a NULL of the given SQL type.
    fn bind_null(&mut self, index: usize, sql_type: SqlType) -> OrmResult<()>;

    fn clear_bindings(&mut self) -> OrmResult<()>;

    fn execute(&mut self) -> OrmResult<Self::Output>;

    /// Release the underlying statement. Further calls are engine-defined.
    fn close(&mut self) -> OrmResult<()>;

    /// Bind a [`Value`], dispatching on its type.
    fn bind_value(&mut self, index: usize, value: &Value) -> OrmResult<()> {
        match value {
            Value::Short(v) => self.bind_short(index, *v),
            Value::Int(v) => self.bind_int(index, *v),
            Value::Long(v) => self.bind_long(index, *v),
            Value::Float(v) => self.bind_float(index, *v),
            Value::Double(v) => self.bind_double(index, *v),
            Value::String(v) => self.bind_string(index, v),
            Value::Blob(v) => self.bind_blob(index, v),
            Value::Null(ty) => self.bind_null(index, *ty),
        }
    }
}

/// Compiles SQL text into statements.
pub trait Engine {
    /// Result set handle returned by queries. Closing it is the caller's job.
    type Cursor;

    /// Statement type for INSERT / UPDATE / DELETE / DDL (yields affected rows).
    type Statement: CompiledStatement<Output = u64>;

    /// Statement type for SELECT.
    type QueryStatement: CompiledStatement<Output = Self::Cursor>;

    fn compile_insert(&self, table: &str, sql: &str) -> OrmResult<Self::Statement>;

    fn compile_insert_or_replace(&self, table: &str, sql: &str) -> OrmResult<Self::Statement>;

    fn compile_update(&self, table: &str, sql: &str) -> OrmResult<Self::Statement>;

    fn compile_delete(&self, table: &str, sql: &str) -> OrmResult<Self::Statement>;

    fn compile_create_table(&self, table: &str, sql: &str) -> OrmResult<Self::Statement>;

    /// `tables` lists every table the query reads, joins included.
    fn compile_query(&self, tables: &[&str], sql: &str) -> OrmResult<Self::QueryStatement>;
}

/// Bind `args` at positions `1..=args.len()`.
///
/// On a bind failure the statement is closed before the error is returned.
pub fn bind_all<S: CompiledStatement>(mut statement: S, args: &[Value]) -> OrmResult<S> {
    for (i, value) in args.iter().enumerate() {
        if let Err(err) = statement.bind_value(i + 1, value) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                target: "tsorm.sql",
                index = i + 1,
                error = %err,
                "binding failed, closing statement"
            );
            // The bind error is the one worth reporting.
            let _ = statement.close();
            return Err(err);
        }
    }
    Ok(statement)
}

/// Execute and always close. An execute error wins over a close error.
pub fn execute_and_close<S: CompiledStatement>(mut statement: S) -> OrmResult<S::Output> {
    let result = statement.execute();
    let closed = statement.close();
    let output = result?;
    closed?;
    Ok(output)
}
