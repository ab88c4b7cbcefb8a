//! Bind-index remapping for insert-or-replace.
//!
//! Insert-or-replace SQL lists id columns before every other column, but
//! callers `set` columns in whatever order suits them. Each distinct column gets
//! a client index in arrival order; [`InsertOrReplaceValues`] keeps track of the
//! placeholder each client index lands on, and [`RemappedStatement`] redirects
//! binds accordingly.

use crate::engine::CompiledStatement;
use crate::error::{OrmError, OrmResult};
use crate::table::ColumnDef;
use crate::value::{SqlType, Value};
use indexmap::IndexMap;

/// Fixed-size map from a 1-based client index to one or more 1-based
/// statement indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexToIndicesMap {
    targets: Vec<Vec<usize>>,
}

impl IndexToIndicesMap {
    pub fn new(size: usize) -> Self {
        Self {
            targets: vec![Vec::new(); size],
        }
    }

    pub fn size(&self) -> usize {
        self.targets.len()
    }

    fn slot(&self, index: usize) -> OrmResult<usize> {
        if index == 0 || index > self.targets.len() {
            return Err(OrmError::IndexOutOfBounds {
                index,
                size: self.targets.len(),
            });
        }
        Ok(index - 1)
    }

    /// Add `target` to the indices bound for client `index`.
    pub fn put(&mut self, index: usize, target: usize) -> OrmResult<()> {
        let slot = self.slot(index)?;
        self.targets[slot].push(target);
        Ok(())
    }

    /// Statement indices across all client indices.
    pub fn target_count(&self) -> usize {
        self.targets.iter().map(Vec::len).sum()
    }

    pub fn get(&self, index: usize) -> OrmResult<&[usize]> {
        let slot = self.slot(index)?;
        Ok(&self.targets[slot])
    }
}

/// Column values of an insert-or-replace, split into id and non-id columns.
#[derive(Debug, Clone, Default)]
pub struct InsertOrReplaceValues {
    ids: IndexMap<&'static str, Value>,
    others: IndexMap<&'static str, Value>,
    // Client arrival order.
    arrivals: Vec<ColumnDef>,
    // 0-based client index -> 0-based position in `ids ++ others`.
    indices: Vec<usize>,
}

impl InsertOrReplaceValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value. A column seen before only has its value replaced.
    pub fn insert(&mut self, column: ColumnDef, value: Value) {
        let map = if column.is_id {
            &mut self.ids
        } else {
            &mut self.others
        };
        if let Some(slot) = map.get_mut(column.name) {
            *slot = value;
            return;
        }

        let from = self.indices.len();
        let to = if column.is_id { self.ids.len() } else { from };
        if column.is_id {
            self.ids.insert(column.name, value);
        } else {
            self.others.insert(column.name, value);
        }
        self.arrivals.push(column);
        self.indices.push(to);

        if to != from {
            // An id column cut in ahead of non-id columns: make room.
            for (client, target) in self.indices.iter_mut().enumerate() {
                if client != from && *target >= to {
                    *target += 1;
                }
            }
        }
    }

    pub fn id_columns(&self) -> Vec<&'static str> {
        self.ids.keys().copied().collect()
    }

    pub fn other_columns(&self) -> Vec<&'static str> {
        self.others.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// 1-based statement position for each 1-based client index.
    pub fn positions(&self) -> Vec<usize> {
        self.indices.iter().map(|t| t + 1).collect()
    }

    /// Columns in client order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.arrivals.iter()
    }

    /// Values in client order.
    pub fn client_args(&self) -> Vec<Value> {
        self.arrivals
            .iter()
            .filter_map(|column| {
                if column.is_id {
                    self.ids.get(column.name)
                } else {
                    self.others.get(column.name)
                }
            })
            .cloned()
            .collect()
    }

    /// Values in statement order (`ids ++ others`).
    pub fn ordered_args(&self) -> Vec<Value> {
        self.ids.values().chain(self.others.values()).cloned().collect()
    }

    /// Build the client-to-statement map.
    ///
    /// With `rebind_non_id` every non-id value is also bound a second time
    /// after the full VALUES list, in non-id order.
    pub fn index_map(&self, rebind_non_id: bool) -> OrmResult<IndexToIndicesMap> {
        let total = self.indices.len();
        let id_count = self.ids.len();
        let mut map = IndexToIndicesMap::new(total);
        for (client, &target) in self.indices.iter().enumerate() {
            map.put(client + 1, target + 1)?;
            if rebind_non_id && target >= id_count {
                map.put(client + 1, total + (target - id_count) + 1)?;
            }
        }
        Ok(map)
    }
}

/// Compiled statement wrapper that binds client indices at their mapped
/// positions.
#[derive(Debug)]
pub struct RemappedStatement<S> {
    inner: S,
    map: IndexToIndicesMap,
}

impl<S: CompiledStatement> RemappedStatement<S> {
    pub fn new(inner: S, map: IndexToIndicesMap) -> Self {
        Self { inner, map }
    }

    pub fn index_map(&self) -> &IndexToIndicesMap {
        &self.map
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn each_target(
        &mut self,
        index: usize,
        mut bind: impl FnMut(&mut S, usize) -> OrmResult<()>,
    ) -> OrmResult<()> {
        let Self { inner, map } = self;
        for &target in map.get(index)? {
            bind(&mut *inner, target)?;
        }
        Ok(())
    }
}

impl<S: CompiledStatement> CompiledStatement for RemappedStatement<S> {
    type Output = S::Output;

    fn bind_short(&mut self, index: usize, value: i16) -> OrmResult<()> {
        self.each_target(index, |s, i| s.bind_short(i, value))
    }

    fn bind_int(&mut self, index: usize, value: i32) -> OrmResult<()> {
        self.each_target(index, |s, i| s.bind_int(i, value))
    }

    fn bind_long(&mut self, index: usize, value: i64) -> OrmResult<()> {
        self.each_target(index, |s, i| s.bind_long(i, value))
    }

    fn bind_float(&mut self, index: usize, value: f32) -> OrmResult<()> {
        self.each_target(index, |s, i| s.bind_float(i, value))
    }

    fn bind_double(&mut self, index: usize, value: f64) -> OrmResult<()> {
        self.each_target(index, |s, i| s.bind_double(i, value))
    }

    fn bind_string(&mut self, index: usize, value: &str) -> OrmResult<()> {
        self.each_target(index, |s, i| s.bind_string(i, value))
    }

    fn bind_blob(&mut self, index: usize, value: &[u8]) -> OrmResult<()> {
        self.each_target(index, |s, i| s.bind_blob(i, value))
    }

    fn bind_null(&mut self, index: usize, sql_type: SqlType) -> OrmResult<()> {
        self.each_target(index, |s, i| s.bind_null(i, sql_type))
    }

    fn clear_bindings(&mut self) -> OrmResult<()> {
        self.inner.clear_bindings()
    }

    fn execute(&mut self) -> OrmResult<Self::Output> {
        self.inner.execute()
    }

    fn close(&mut self) -> OrmResult<()> {
        self.inner.close()
    }
}
