//! Convenient imports for typical `tsorm` usage.
//!
//! ```ignore
//! use tsorm::prelude::*;
//! ```

pub use crate::{
    Column, CompiledStatement, Database, DatabaseConfig, Dialect, Engine, GenericDialect,
    H2Dialect, JoinType, OrmError, OrmResult, Predicates, SqlType, SqliteDialect, Statement,
    Table, Value, ValueSetter, Where, WhereBuilder,
};
