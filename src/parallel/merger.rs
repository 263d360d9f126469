use rayon::prelude::*;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;
use crate::index::field_index::{FieldIndex, IndexSet};
use crate::index::global::{GlobalIndexes, KindIndex};
use crate::parallel::pool::WorkerPool;

/// Folds chunk-local indexes into the global indexes.
///
/// The three kinds merge as independent passes. Within a kind every field is
/// its own task; a field's chunks are folded in chunk order, each fold under
/// that field's write lock.
pub struct IndexMerger;

impl IndexMerger {
    /// `locals` must be in chunk order.
    pub fn merge(pool: &WorkerPool, target: &GlobalIndexes, locals: Vec<IndexSet>) {
        let chunk_count = locals.len();
        let mut strings = Vec::with_capacity(chunk_count);
        let mut integers = Vec::with_capacity(chunk_count);
        let mut dates = Vec::with_capacity(chunk_count);
        for set in locals {
            strings.push(set.strings);
            integers.push(set.integers);
            dates.push(set.dates);
        }

        pool.install(|| {
            rayon::join(
                || merge_kind("String", &target.strings, strings),
                || {
                    rayon::join(
                        || merge_kind("Integer", &target.integers, integers),
                        || merge_kind("Date", &target.dates, dates),
                    )
                },
            )
        });
    }
}

fn merge_kind<K>(kind: &str, target: &KindIndex<K>, mut chunks: Vec<HashMap<String, FieldIndex<K>>>)
where
    K: Eq + Hash + Send + Sync,
{
    // Regroup by field, keeping chunk order inside each group.
    let per_field: Vec<(&str, Vec<FieldIndex<K>>)> = target
        .field_names()
        .map(|field| {
            let parts = chunks.iter_mut().filter_map(|chunk| chunk.remove(field)).collect();
            (field, parts)
        })
        .collect();

    per_field.into_par_iter().for_each(|(field, parts)| {
        let Some(slot) = target.slot(field) else {
            return;
        };
        for part in parts {
            if part.is_empty() {
                continue;
            }
            slot.write().absorb(part);
        }
        let merged = slot.read();
        debug!(kind, field, keys = merged.len(), rows = merged.row_count(), "field merged");
    });
}
