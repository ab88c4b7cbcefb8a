//! Statement builders.
//!
//! Builders are created from a [`Database`](crate::Database) and consumed
//! fluently. `build()` renders an immutable statement value object,
//! `compile()` hands back a bound engine statement, and the terminal methods
//! (`insert()`, `insert_or_replace()`, `update()`, `delete()`, `query()`)
//! execute it and close it.
//!
//! ```rust,ignore
//! use tsorm::prelude::*;
//!
//! db.update(&users)
//!     .set(&NAME, "bea")
//!     .set_null(&BIO)
//!     .filter(|w| {
//!         w.eq(&ID, 7);
//!     })
//!     .update()?;
//! ```
//!
//! Argument order is always SET values (in first-set order), then WHERE
//! arguments (in predicate order).

mod create;
mod delete;
mod insert;
mod remap;
mod select;
mod traits;
mod update;
mod values;

pub use create::{CreateTable, CreateTableQb};
pub use delete::{Delete, DeleteQb};
pub use insert::{Insert, InsertOrReplace, InsertOrReplaceQb, InsertQb};
pub use remap::{IndexToIndicesMap, InsertOrReplaceValues, RemappedStatement};
pub use select::{Query, SelectQb};
pub use traits::Statement;
pub use update::{Update, UpdateQb};
pub use values::{ColumnValues, ValueSetter};
