use super::{Dialect, simple};
use crate::error::OrmResult;

/// H2: generic syntax, upsert through `MERGE INTO ... KEY (...)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct H2Dialect;

impl Dialect for H2Dialect {
    fn name(&self) -> &'static str {
        "H2"
    }

    fn build_insert_or_replace(
        &self,
        table: &str,
        id_columns: &[&str],
        columns: &[&str],
    ) -> OrmResult<String> {
        let all = simple::insert_or_replace_columns(table, id_columns, columns)?;
        Ok(format!(
            "MERGE INTO {} ({}) KEY ({}) VALUES ({})",
            table,
            all.join(", "),
            id_columns.join(", "),
            simple::placeholders(self, all.len())
        ))
    }
}
