//! Fluent WHERE clause accumulator shared by SELECT, UPDATE and DELETE.
//!
//! Predicates and connectors are recorded in call order. Every predicate pushes
//! exactly one [`WhereSection`] and its bound values, so sections and arguments
//! always line up.
//!
//! ```rust
//! use tsorm::prelude::*;
//!
//! const AGE: Column<i32> = Column::new("users", "age");
//! const ROLE: Column<String> = Column::new("users", "role");
//!
//! let mut w = WhereBuilder::new();
//! w.gt(&AGE, 18).and().or_group(|g| {
//!     g.eq(&ROLE, "admin");
//!     g.eq(&ROLE, "owner");
//! });
//! let snapshot = w.build();
//! assert_eq!(
//!     snapshot.render("?").unwrap().as_deref(),
//!     Some("WHERE age > ? AND (role = ? OR role = ?)")
//! );
//! assert_eq!(snapshot.args().len(), 3);
//! ```

use crate::error::OrmResult;
use crate::table::Column;
use crate::value::{SqlValue, Value};
use crate::where_section::{
    Connector, MultiArgOp, NoArgOp, OneArgOp, WhereSection, render_where_clause,
};

/// Immutable WHERE snapshot: sections plus their arguments in traversal order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Where {
    sections: Vec<WhereSection>,
    args: Vec<Value>,
}

impl Where {
    pub fn sections(&self) -> &[WhereSection] {
        &self.sections
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render `WHERE ...`, or `None` when empty.
    pub fn render(&self, placeholder: &str) -> OrmResult<Option<String>> {
        render_where_clause(&self.sections, placeholder)
    }

    pub fn into_parts(self) -> (Vec<WhereSection>, Vec<Value>) {
        (self.sections, self.args)
    }
}

mod sealed {
    use super::{Column, Connector, GroupBuilder, MultiArgOp, OneArgOp, SqlValue, Value};
    use crate::where_section::WhereSection;

    /// Section storage behind [`super::Predicates`]. Unreachable from outside
    /// the crate, so sections only enter through the typed predicate methods
    /// and always carry the right number of arguments.
    pub trait Sink: Sized {
        /// Record one section and the values it binds.
        fn push_section(&mut self, section: WhereSection, args: Vec<Value>);

        /// Whether column references render as `table.column`.
        fn qualify_columns(&self) -> bool;

        fn column_name<T: SqlValue>(&self, column: &Column<T>) -> String {
            if self.qualify_columns() {
                column.qualified_name()
            } else {
                column.name().to_string()
            }
        }

        fn one_arg<T: SqlValue>(
            &mut self,
            op: OneArgOp,
            column: &Column<T>,
            value: T,
        ) -> &mut Self {
            let column = self.column_name(column);
            self.push_section(
                WhereSection::OneArg { op, column },
                vec![value.into_value()],
            );
            self
        }

        fn multi_arg<T: SqlValue, V: Into<T>>(
            &mut self,
            op: MultiArgOp,
            column: &Column<T>,
            values: impl IntoIterator<Item = V>,
        ) -> &mut Self {
            let args: Vec<Value> = values.into_iter().map(|v| v.into().into_value()).collect();
            let column = self.column_name(column);
            self.push_section(
                WhereSection::MultiArg {
                    op,
                    column,
                    arg_count: args.len(),
                },
                args,
            );
            self
        }

        fn group(
            &mut self,
            connector: Connector,
            f: impl FnOnce(&mut GroupBuilder),
        ) -> &mut Self {
            let mut group = GroupBuilder::new(self.qualify_columns());
            f(&mut group);
            self.push_section(
                WhereSection::Compound {
                    connector,
                    sections: group.sections,
                },
                group.args,
            );
            self
        }
    }
}

/// Predicate methods shared by the top-level [`WhereBuilder`] and the
/// [`GroupBuilder`] handed to `and_group` / `or_group` closures.
///
/// Sections can only be added through these methods:
///
/// ```compile_fail
/// use tsorm::prelude::*;
/// use tsorm::WhereSection;
///
/// let mut w = WhereBuilder::new();
/// w.push_section(WhereSection::Between { column: "age".to_string() }, Vec::new());
/// ```
pub trait Predicates: sealed::Sink {
    /// `column = ?`
    fn eq<T: SqlValue>(&mut self, column: &Column<T>, value: impl Into<T>) -> &mut Self {
        self.one_arg(OneArgOp::Eq, column, value.into())
    }

    /// `column <> ?`
    fn not_eq<T: SqlValue>(&mut self, column: &Column<T>, value: impl Into<T>) -> &mut Self {
        self.one_arg(OneArgOp::NotEq, column, value.into())
    }

    /// `column > ?`
    fn gt<T: SqlValue>(&mut self, column: &Column<T>, value: impl Into<T>) -> &mut Self {
        self.one_arg(OneArgOp::Gt, column, value.into())
    }

    /// `column >= ?`
    fn ge<T: SqlValue>(&mut self, column: &Column<T>, value: impl Into<T>) -> &mut Self {
        self.one_arg(OneArgOp::Ge, column, value.into())
    }

    /// `column < ?`
    fn lt<T: SqlValue>(&mut self, column: &Column<T>, value: impl Into<T>) -> &mut Self {
        self.one_arg(OneArgOp::Lt, column, value.into())
    }

    /// `column <= ?`
    fn le<T: SqlValue>(&mut self, column: &Column<T>, value: impl Into<T>) -> &mut Self {
        self.one_arg(OneArgOp::Le, column, value.into())
    }

    /// `column LIKE ?`
    fn like<T: SqlValue>(&mut self, column: &Column<T>, pattern: impl Into<T>) -> &mut Self {
        self.one_arg(OneArgOp::Like, column, pattern.into())
    }

    /// `column BETWEEN ? AND ?`
    fn between<T: SqlValue>(
        &mut self,
        column: &Column<T>,
        low: impl Into<T>,
        high: impl Into<T>,
    ) -> &mut Self {
        let column = self.column_name(column);
        self.push_section(
            WhereSection::Between { column },
            vec![low.into().into_value(), high.into().into_value()],
        );
        self
    }

    /// `column IN (?, ...)`. An empty list is rejected when the clause is rendered.
    fn is_in<T: SqlValue, V: Into<T>>(
        &mut self,
        column: &Column<T>,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.multi_arg(MultiArgOp::IsIn, column, values)
    }

    /// `column NOT IN (?, ...)`. An empty list is rejected when the clause is rendered.
    fn is_not_in<T: SqlValue, V: Into<T>>(
        &mut self,
        column: &Column<T>,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.multi_arg(MultiArgOp::IsNotIn, column, values)
    }

    /// `column IN (sub_query)`. The sub query must not carry placeholders.
    fn is_in_sub_query<T: SqlValue>(&mut self, column: &Column<T>, sub_query: &str) -> &mut Self {
        let column = self.column_name(column);
        self.push_section(
            WhereSection::MultiArgSubQuery {
                op: MultiArgOp::IsIn,
                column,
                sub_query: sub_query.to_string(),
            },
            Vec::new(),
        );
        self
    }

    /// `column NOT IN (sub_query)`. The sub query must not carry placeholders.
    fn is_not_in_sub_query<T: SqlValue>(
        &mut self,
        column: &Column<T>,
        sub_query: &str,
    ) -> &mut Self {
        let column = self.column_name(column);
        self.push_section(
            WhereSection::MultiArgSubQuery {
                op: MultiArgOp::IsNotIn,
                column,
                sub_query: sub_query.to_string(),
            },
            Vec::new(),
        );
        self
    }

    /// `column IS NULL`
    fn is_null<T: SqlValue>(&mut self, column: &Column<T>) -> &mut Self {
        let column = self.column_name(column);
        self.push_section(
            WhereSection::NoArg {
                op: NoArgOp::IsNull,
                column,
            },
            Vec::new(),
        );
        self
    }

    /// `column IS NOT NULL`
    fn is_not_null<T: SqlValue>(&mut self, column: &Column<T>) -> &mut Self {
        let column = self.column_name(column);
        self.push_section(
            WhereSection::NoArg {
                op: NoArgOp::IsNotNull,
                column,
            },
            Vec::new(),
        );
        self
    }

    /// `(p1 AND p2 AND ...)` over the predicates added inside `f`.
    ///
    /// A group with no predicates fails with a syntax error when rendered.
    fn and_group(&mut self, f: impl FnOnce(&mut GroupBuilder)) -> &mut Self {
        self.group(Connector::And, f)
    }

    /// `(p1 OR p2 OR ...)` over the predicates added inside `f`.
    ///
    /// A group with no predicates fails with a syntax error when rendered.
    fn or_group(&mut self, f: impl FnOnce(&mut GroupBuilder)) -> &mut Self {
        self.group(Connector::Or, f)
    }
}

/// Top-level WHERE accumulator.
#[derive(Debug, Clone, Default)]
pub struct WhereBuilder {
    qualify: bool,
    sections: Vec<WhereSection>,
    args: Vec<Value>,
}

impl WhereBuilder {
    /// Builder rendering bare column names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder rendering `table.column` references.
    pub fn qualified() -> Self {
        Self {
            qualify: true,
            ..Self::default()
        }
    }

    /// Bare `AND` between the previous and next section.
    pub fn and(&mut self) -> &mut Self {
        self.sections.push(WhereSection::Simple(Connector::And));
        self
    }

    /// Bare `OR` between the previous and next section.
    pub fn or(&mut self) -> &mut Self {
        self.sections.push(WhereSection::Simple(Connector::Or));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Snapshot the current state. Later calls on the builder do not affect it.
    pub fn build(&self) -> Where {
        Where {
            sections: self.sections.clone(),
            args: self.args.clone(),
        }
    }
}

impl sealed::Sink for WhereBuilder {
    fn push_section(&mut self, section: WhereSection, args: Vec<Value>) {
        self.sections.push(section);
        self.args.extend(args);
    }

    fn qualify_columns(&self) -> bool {
        self.qualify
    }
}

impl Predicates for WhereBuilder {}

/// Scope for a parenthesized group. Members are joined by the group's
/// connector, so bare `and()` / `or()` are not available here.
#[derive(Debug, Default)]
pub struct GroupBuilder {
    qualify: bool,
    sections: Vec<WhereSection>,
    args: Vec<Value>,
}

impl GroupBuilder {
    fn new(qualify: bool) -> Self {
        Self {
            qualify,
            sections: Vec::new(),
            args: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl sealed::Sink for GroupBuilder {
    fn push_section(&mut self, section: WhereSection, args: Vec<Value>) {
        self.sections.push(section);
        self.args.extend(args);
    }

    fn qualify_columns(&self) -> bool {
        self.qualify
    }
}

impl Predicates for GroupBuilder {}
