//! Built statement value objects.

use crate::monitor::{QueryType, StatementContext};
use crate::value::Value;

/// A rendered statement: target table, SQL text, and arguments in bind order.
pub trait Statement {
    fn query_type(&self) -> QueryType;

    fn table(&self) -> &str;

    fn sql(&self) -> &str;

    fn args(&self) -> &[Value];

    /// Hook context for this statement.
    fn context(&self) -> StatementContext {
        StatementContext::new(self.query_type(), self.table(), self.sql(), self.args().len())
    }
}

/// Define a plain `{ table, sql, args }` statement value object.
macro_rules! simple_statement {
    ($(#[$meta:meta])* $name:ident => $query_type:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub(crate) table: String,
            pub(crate) sql: String,
            pub(crate) args: Vec<$crate::value::Value>,
        }

        impl $crate::qb::Statement for $name {
            fn query_type(&self) -> $crate::monitor::QueryType {
                $query_type
            }

            fn table(&self) -> &str {
                &self.table
            }

            fn sql(&self) -> &str {
                &self.sql
            }

            fn args(&self) -> &[$crate::value::Value] {
                &self.args
            }
        }
    };
}

pub(crate) use simple_statement;
