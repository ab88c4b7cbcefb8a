//! WHERE clause intermediate representation and its SQL renderer.
//!
//! A WHERE clause is an ordered list of [`WhereSection`]s: predicates that
//! reference one column, simple connectors (`AND`/`OR`) between two adjacent
//! sections, and compound connectors wrapping a parenthesized group.
//!
//! Bind arguments live next to the sections in a separate, parallel list (see
//! [`crate::Where`]). Their count is always [`total_arg_count`] of the sections,
//! in left-to-right, depth-first order.

use crate::error::{OrmError, OrmResult};

/// Predicates that take no argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoArgOp {
    IsNull,
    IsNotNull,
}

impl NoArgOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            NoArgOp::IsNull => "IS NULL",
            NoArgOp::IsNotNull => "IS NOT NULL",
        }
    }
}

/// Comparison predicates that take exactly one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneArgOp {
    Eq,
    NotEq,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
}

impl OneArgOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            OneArgOp::Eq => "=",
            OneArgOp::NotEq => "<>",
            OneArgOp::Gt => ">",
            OneArgOp::Ge => ">=",
            OneArgOp::Lt => "<",
            OneArgOp::Le => "<=",
            OneArgOp::Like => "LIKE",
        }
    }
}

/// Membership predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiArgOp {
    IsIn,
    IsNotIn,
}

impl MultiArgOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            MultiArgOp::IsIn => "IN",
            MultiArgOp::IsNotIn => "NOT IN",
        }
    }
}

/// Logical connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_sql(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// One element of a WHERE clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhereSection {
    /// `column IS [NOT] NULL`
    NoArg { op: NoArgOp, column: String },
    /// `column op ?`
    OneArg { op: OneArgOp, column: String },
    /// `column [NOT] IN (?, ?, ...)` with `arg_count` placeholders.
    MultiArg {
        op: MultiArgOp,
        column: String,
        arg_count: usize,
    },
    /// `column [NOT] IN (sub query)`; the sub query is embedded literally.
    MultiArgSubQuery {
        op: MultiArgOp,
        column: String,
        sub_query: String,
    },
    /// `column BETWEEN ? AND ?`
    Between { column: String },
    /// Bare `AND` / `OR` between two adjacent sections.
    Simple(Connector),
    /// `(a AND b AND ...)` / `(a OR b OR ...)`
    Compound {
        connector: Connector,
        sections: Vec<WhereSection>,
    },
}

impl WhereSection {
    /// Number of placeholders this section renders.
    pub fn arg_count(&self) -> usize {
        match self {
            WhereSection::NoArg { .. }
            | WhereSection::MultiArgSubQuery { .. }
            | WhereSection::Simple(_) => 0,
            WhereSection::OneArg { .. } => 1,
            WhereSection::Between { .. } => 2,
            WhereSection::MultiArg { arg_count, .. } => *arg_count,
            WhereSection::Compound { sections, .. } => total_arg_count(sections),
        }
    }

    /// Render this section alone, without the `WHERE` keyword.
    pub fn to_sql(&self, placeholder: &str) -> OrmResult<String> {
        let sql = match self {
            WhereSection::NoArg { op, column } => format!("{} {}", column, op.as_sql()),
            WhereSection::OneArg { op, column } => {
                format!("{} {} {}", column, op.as_sql(), placeholder)
            }
            WhereSection::MultiArg {
                op,
                column,
                arg_count,
            } => {
                if *arg_count == 0 {
                    return Err(OrmError::syntax(format!(
                        "{} predicate on '{}' requires at least one argument",
                        op.as_sql(),
                        column
                    )));
                }
                let placeholders = vec![placeholder; *arg_count].join(", ");
                format!("{} {} ({})", column, op.as_sql(), placeholders)
            }
            WhereSection::MultiArgSubQuery {
                op,
                column,
                sub_query,
            } => {
                if sub_query.trim().is_empty() {
                    return Err(OrmError::syntax(format!(
                        "{} predicate on '{}' has an empty sub query",
                        op.as_sql(),
                        column
                    )));
                }
                format!("{} {} ({})", column, op.as_sql(), sub_query)
            }
            WhereSection::Between { column } => {
                format!("{} BETWEEN {} AND {}", column, placeholder, placeholder)
            }
            WhereSection::Simple(connector) => connector.as_sql().to_string(),
            WhereSection::Compound {
                connector,
                sections,
            } => {
                if sections.is_empty() {
                    return Err(OrmError::syntax(format!(
                        "{} group must contain at least one predicate",
                        connector.as_sql()
                    )));
                }
                let mut parts = Vec::with_capacity(sections.len());
                for section in sections {
                    if let WhereSection::Simple(inner) = section {
                        return Err(OrmError::syntax(format!(
                            "bare {} is not allowed inside a {} group",
                            inner.as_sql(),
                            connector.as_sql()
                        )));
                    }
                    parts.push(section.to_sql(placeholder)?);
                }
                let separator = format!(" {} ", connector.as_sql());
                format!("({})", parts.join(separator.as_str()))
            }
        };
        Ok(sql)
    }
}

/// Total placeholder count of a section list, nested groups included.
pub fn total_arg_count(sections: &[WhereSection]) -> usize {
    sections.iter().map(WhereSection::arg_count).sum()
}

/// Top-level sections must alternate predicate, connector, predicate, ...
fn check_alternation(sections: &[WhereSection]) -> OrmResult<()> {
    let mut after_predicate = false;
    for section in sections {
        match (section, after_predicate) {
            (WhereSection::Simple(connector), false) => {
                return Err(OrmError::syntax(format!(
                    "{} must follow a predicate",
                    connector.as_sql()
                )));
            }
            (WhereSection::Simple(_), true) => after_predicate = false,
            (_, true) => {
                return Err(OrmError::syntax(
                    "adjacent predicates need an AND or OR between them",
                ));
            }
            (_, false) => after_predicate = true,
        }
    }
    if !after_predicate {
        return Err(OrmError::syntax("WHERE clause must not end with a connector"));
    }
    Ok(())
}

/// Render a full clause starting with `WHERE`.
///
/// Returns `Ok(None)` when there are no sections.
pub fn render_where_clause(
    sections: &[WhereSection],
    placeholder: &str,
) -> OrmResult<Option<String>> {
    if sections.is_empty() {
        return Ok(None);
    }
    check_alternation(sections)?;

    let mut sql = String::from("WHERE");
    for section in sections {
        sql.push(' ');
        sql.push_str(&section.to_sql(placeholder)?);
    }
    Ok(Some(sql))
}
