use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use serde_json::Value;
use tracing::{debug, error};
use crate::core::config::{IndexConfig, IndexedField};
use crate::core::error::{Error, Result};
use crate::core::types::{IndexKind, Record, RowId};
use crate::index::field_index::IndexSet;
use crate::parallel::pool::WorkerPool;

/// Contiguous slice of the input with its own local indexes.
#[derive(Debug)]
pub struct Chunk {
    pub id: usize,
    pub start: RowId,
    pub records: Vec<Record>,
    pub indexes: IndexSet,
}

/// Parallel chunk builder. Chunks share nothing while building.
pub struct ChunkIndexer<'a> {
    pub config: &'a IndexConfig,
    pub chunk_size: usize,
    pub progress: Arc<AtomicUsize>,
}

impl<'a> ChunkIndexer<'a> {
    pub fn new(config: &'a IndexConfig, chunk_size: usize) -> Self {
        ChunkIndexer {
            config,
            chunk_size: chunk_size.max(1),
            progress: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Records processed so far by the current build.
    pub fn get_progress(&self) -> usize {
        self.progress.load(Ordering::Relaxed)
    }

    pub fn chunk_count(&self, total: usize) -> usize {
        total.div_ceil(self.chunk_size)
    }

    /// Split `records` into ordered chunks and index each one on the pool.
    ///
    /// The first classification failure aborts the whole build.
    pub fn build(&self, pool: &WorkerPool, records: Vec<Value>) -> Result<Vec<Chunk>> {
        self.progress.store(0, Ordering::Relaxed);
        let records: Vec<Record> = records.into_iter().map(Record::new).collect();
        let total = records.len();

        let chunks = pool.install(|| {
            records
                .par_chunks(self.chunk_size)
                .enumerate()
                .map(|(id, slice)| self.build_chunk(id, slice, total))
                .collect::<Result<Vec<Chunk>>>()
        })?;

        debug_assert_eq!(chunks.len(), self.chunk_count(total));
        Ok(chunks)
    }

    fn build_chunk(&self, id: usize, slice: &[Record], total: usize) -> Result<Chunk> {
        let start = id * self.chunk_size;
        let mut chunk = Chunk {
            id,
            start: RowId(start),
            records: Vec::with_capacity(slice.len()),
            indexes: IndexSet::for_config(self.config),
        };

        for (offset, record) in slice.iter().enumerate() {
            let row = RowId(start + offset);
            chunk.records.push(record.clone());
            index_record(record, row, self.config, &mut chunk.indexes)?;
        }

        let done = self.progress.fetch_add(slice.len(), Ordering::Relaxed) + slice.len();
        debug!(chunk = id, records = slice.len(), progress = done, total, "chunk indexed");
        Ok(chunk)
    }
}

/// Insert one record's configured fields into the chunk-local indexes.
pub fn index_record(record: &Record, row: RowId, config: &IndexConfig, indexes: &mut IndexSet) -> Result<()> {
    for field in config.fields() {
        let value = match record.get_field(&field.name) {
            Some(Value::Null) | None => continue,
            Some(value) => value,
        };

        let outcome = classify(field, value).and_then(|key| {
            if let Some(key) = key {
                insert_key(field, key, row, indexes);
            }
            Ok(())
        });

        if let Err(err) = outcome {
            error!(
                field = %field.name,
                kind = %field.kind,
                row = row.0,
                "{} - failed to build index, check the index kind configured for this field",
                err
            );
            return Err(err);
        }
    }
    Ok(())
}

enum Key {
    Text(String),
    Integer(i64),
}

/// `Ok(None)` means the value is skipped for this field only.
fn classify(field: &IndexedField, value: &Value) -> Result<Option<Key>> {
    match field.kind {
        IndexKind::String | IndexKind::Date => match value {
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => Ok(Some(Key::Text(s.clone()))),
            other => Err(Error::classification(
                &field.name,
                field.kind.name(),
                format!("expected a string, found {}", json_type(other)),
            )),
        },
        IndexKind::Integer => match value {
            Value::Number(n) => n.as_i64().map(|v| Some(Key::Integer(v))).ok_or_else(|| {
                Error::classification(
                    &field.name,
                    field.kind.name(),
                    format!("number {} is not a signed 64-bit integer", n),
                )
            }),
            Value::String(s) => Ok(s.trim().parse::<i64>().ok().map(Key::Integer)),
            _ => Ok(None),
        },
    }
}

fn insert_key(field: &IndexedField, key: Key, row: RowId, indexes: &mut IndexSet) {
    let name = field.name.as_str();
    match (field.kind, key) {
        (IndexKind::String, Key::Text(text)) => {
            if let Some(index) = indexes.strings.get_mut(name) {
                index.insert(text, row);
            }
        }
        (IndexKind::Date, Key::Text(text)) => {
            if let Some(index) = indexes.dates.get_mut(name) {
                index.insert(text, row);
            }
        }
        (IndexKind::Integer, Key::Integer(value)) => {
            if let Some(index) = indexes.integers.get_mut(name) {
                index.insert(value, row);
            }
        }
        _ => {}
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
