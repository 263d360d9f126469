use std::collections::HashMap;
use std::hash::Hash;
use parking_lot::{RwLock, RwLockReadGuard};
use crate::core::config::IndexConfig;
use crate::core::types::IndexKind;
use crate::index::field_index::FieldIndex;

/// All global maps of one index kind. Each field is its own lock domain.
#[derive(Debug)]
pub struct KindIndex<K: Eq + Hash> {
    fields: HashMap<String, RwLock<FieldIndex<K>>>,
}

impl<K: Eq + Hash> KindIndex<K> {
    fn for_kind(config: &IndexConfig, kind: IndexKind) -> Self {
        let fields = config
            .fields_of(kind)
            .map(|f| (f.name.clone(), RwLock::new(FieldIndex::new())))
            .collect();
        KindIndex { fields }
    }

    /// Exclusive-access slot for one field, keyed by the configured spelling.
    pub fn slot(&self, field: &str) -> Option<&RwLock<FieldIndex<K>>> {
        self.fields.get(field)
    }

    pub fn read(&self, field: &str) -> Option<RwLockReadGuard<'_, FieldIndex<K>>> {
        self.fields.get(field).map(|slot| slot.read())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// The three global indexes, one per kind.
#[derive(Debug)]
pub struct GlobalIndexes {
    pub strings: KindIndex<String>,
    pub integers: KindIndex<i64>,
    pub dates: KindIndex<String>,
}

impl GlobalIndexes {
    pub fn new(config: &IndexConfig) -> Self {
        GlobalIndexes {
            strings: KindIndex::for_kind(config, IndexKind::String),
            integers: KindIndex::for_kind(config, IndexKind::Integer),
            dates: KindIndex::for_kind(config, IndexKind::Date),
        }
    }

    /// Distinct key count and total row count for a configured field.
    pub fn field_sizes(&self, field: &str, kind: IndexKind) -> Option<(usize, usize)> {
        match kind {
            IndexKind::String => self.strings.read(field).map(|i| (i.len(), i.row_count())),
            IndexKind::Integer => self.integers.read(field).map(|i| (i.len(), i.row_count())),
            IndexKind::Date => self.dates.read(field).map(|i| (i.len(), i.row_count())),
        }
    }

    /// Top keys rendered as text, most frequent first.
    pub fn top_keys(&self, field: &str, kind: IndexKind, n: usize) -> Vec<(String, usize)> {
        fn render<K: Eq + Hash + Ord + ToString>(index: &FieldIndex<K>, n: usize) -> Vec<(String, usize)> {
            index
                .top_keys(n)
                .into_iter()
                .map(|(key, count)| (key.to_string(), count))
                .collect()
        }

        match kind {
            IndexKind::String => self.strings.read(field).map(|i| render(&*i, n)),
            IndexKind::Integer => self.integers.read(field).map(|i| render(&*i, n)),
            IndexKind::Date => self.dates.read(field).map(|i| render(&*i, n)),
        }
        .unwrap_or_default()
    }
}
