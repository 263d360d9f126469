use crate::core::types::{Record, RowId};

/// Append-only record sequence; a record's row id is its position.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn with_capacity(capacity: usize) -> Self {
        RecordStore {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Append a chunk's records. Chunks must arrive in chunk order.
    pub fn extend(&mut self, chunk: Vec<Record>) {
        self.records.extend(chunk);
    }

    pub fn get(&self, row: RowId) -> Option<&Record> {
        self.records.get(row.0)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.records.capacity()
    }

    /// Map row ids back to records, keeping the given order. Unknown ids are skipped.
    pub fn materialize(&self, rows: &[RowId]) -> Vec<Record> {
        rows.iter().filter_map(|row| self.get(*row).cloned()).collect()
    }
}
