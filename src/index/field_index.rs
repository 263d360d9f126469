use std::collections::HashMap;
use std::hash::Hash;
use crate::core::config::IndexConfig;
use crate::core::types::{IndexKind, RowId};

/// Typed key → row ids for one field.
///
/// Row-id lists keep insertion order. After a merge that is chunk order, which
/// only matches row-id order when every chunk contributed in sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIndex<K: Eq + Hash> {
    entries: HashMap<K, Vec<RowId>>,
}

impl<K: Eq + Hash> Default for FieldIndex<K> {
    fn default() -> Self {
        FieldIndex {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> FieldIndex<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: K, row: RowId) {
        self.entries.entry(key).or_default().push(row);
    }

    /// Fold another index into this one, appending its lists after ours.
    pub fn absorb(&mut self, other: FieldIndex<K>) {
        for (key, rows) in other.entries {
            match self.entries.get_mut(&key) {
                Some(existing) => existing.extend(rows),
                None => {
                    self.entries.insert(key, rows);
                }
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> &[RowId]
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rows under every key accepted by `pred`, in map iteration order.
    pub fn collect_where(&self, mut pred: impl FnMut(&K) -> bool) -> Vec<RowId> {
        self.entries
            .iter()
            .filter(|(key, _)| pred(key))
            .flat_map(|(_, rows)| rows.iter().copied())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[RowId])> {
        self.entries.iter().map(|(key, rows)| (key, rows.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total row ids across all keys.
    pub fn row_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

impl<K: Eq + Hash + Ord> FieldIndex<K> {
    /// Most frequent keys first; equal counts ordered by key.
    pub fn top_keys(&self, n: usize) -> Vec<(&K, usize)> {
        let mut keys: Vec<(&K, usize)> = self
            .entries
            .iter()
            .map(|(key, rows)| (key, rows.len()))
            .collect();
        keys.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        keys.truncate(n);
        keys
    }
}

/// One local map per configured field, grouped by kind. Keyed by the configured spelling.
#[derive(Debug, Default)]
pub struct IndexSet {
    pub strings: HashMap<String, FieldIndex<String>>,
    pub integers: HashMap<String, FieldIndex<i64>>,
    pub dates: HashMap<String, FieldIndex<String>>,
}

impl IndexSet {
    pub fn for_config(config: &IndexConfig) -> Self {
        let mut set = IndexSet::default();
        for field in config.fields() {
            let name = field.name.clone();
            match field.kind {
                IndexKind::String => {
                    set.strings.insert(name, FieldIndex::new());
                }
                IndexKind::Integer => {
                    set.integers.insert(name, FieldIndex::new());
                }
                IndexKind::Date => {
                    set.dates.insert(name, FieldIndex::new());
                }
            }
        }
        set
    }
}
