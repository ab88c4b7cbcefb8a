//! # tsorm
//!
//! Typed SQL statement construction over pluggable dialects and engines.
//!
//! ## Features
//!
//! - **Typed columns**: `Column<T>` only accepts values of `T`; NULLs keep their SQL type
//! - **Fluent WHERE**: predicates, `AND`/`OR`, parenthesized groups via closures
//! - **Dialects**: Generic, H2 and SQLite syntax; bring your own via [`Dialect`]
//! - **Engine-agnostic**: tsorm renders and binds; an [`Engine`] compiles and executes
//! - **Insert-or-replace**: id columns are grouped first no matter the `set` order
//! - **Statement hooks**: inspect, abort, time and count every statement
//!
//! ## Example
//!
//! ```rust,ignore
//! use tsorm::prelude::*;
//!
//! const ID: Column<i64> = Column::new("users", "id").id();
//! const NAME: Column<String> = Column::new("users", "name").max_size(64);
//! const AGE: Column<Option<i32>> = Column::new("users", "age");
//!
//! let users = Table::new("users").column(&ID).column(&NAME).column(&AGE);
//! let db = Database::new(engine, H2Dialect);
//!
//! db.insert_or_replace(&users)
//!     .set(&NAME, "ann")
//!     .set(&ID, 1)
//!     .insert_or_replace()?;
//!
//! db.delete(&users)
//!     .filter(|w| {
//!         w.is_null(&AGE).or().lt(&AGE, 18);
//!     })
//!     .delete()?;
//! ```

pub mod database;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod monitor;
pub mod prelude;
pub mod qb;
pub mod table;
pub mod value;
pub mod where_builder;
pub mod where_section;

pub use database::{Database, DatabaseConfig};
pub use dialect::{Dialect, GenericDialect, H2Dialect, JoinType, SqliteDialect};
pub use engine::{CompiledStatement, Engine};
pub use error::{OrmError, OrmResult};
pub use monitor::{
    CompositeHook, HookAction, QueryType, StatementContext, StatementHook, StatementOutcome,
    StatementStats, StatsHook,
};
pub use qb::{
    ColumnValues, CreateTableQb, DeleteQb, InsertOrReplaceQb, InsertQb, SelectQb, Statement,
    UpdateQb, ValueSetter,
};
pub use table::{Column, ColumnDef, ForeignKey, Table};
pub use value::{SqlType, SqlValue, Value};
pub use where_builder::{GroupBuilder, Predicates, Where, WhereBuilder};
pub use where_section::WhereSection;

#[cfg(feature = "tracing")]
pub use monitor::TracingSqlHook;
