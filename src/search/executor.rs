use crossbeam::queue::SegQueue;
use rayon::prelude::*;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;
use crate::core::types::{value_text, IndexKind, Record, RowId};
use crate::index::global::GlobalIndexes;
use crate::parallel::pool::WorkerPool;
use crate::query::ast::{Condition, Operator};
use crate::query::planner::{IndexKey, LogicalPlan};
use crate::storage::record_store::RecordStore;

/// Minimum records per linear-scan partition.
const MIN_SCAN_PARTITION: usize = 1024;

/// Evaluates logical plans against the loaded store and global indexes.
pub struct QueryExecutor<'a> {
    pub store: &'a RecordStore,
    pub indexes: &'a GlobalIndexes,
    pub pool: &'a WorkerPool,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(store: &'a RecordStore, indexes: &'a GlobalIndexes, pool: &'a WorkerPool) -> Self {
        QueryExecutor { store, indexes, pool }
    }

    /// Matching row ids, ascending and without duplicates.
    pub fn execute(&self, plan: &LogicalPlan) -> Vec<RowId> {
        let mut rows = self.execute_plan(plan);
        rows.sort_unstable();
        rows.dedup();
        rows
    }

    fn execute_plan(&self, plan: &LogicalPlan) -> Vec<RowId> {
        match plan {
            LogicalPlan::IndexSeek { field, key } => self.index_seek(&field.name, field.kind, key),
            LogicalPlan::IndexRange { field, op, bound } => self
                .indexes
                .integers
                .read(&field.name)
                .map(|index| index.collect_where(|key| op.compare(key, bound)))
                .unwrap_or_default(),
            LogicalPlan::Scan { condition } => self.linear_scan(condition),
            LogicalPlan::Empty => Vec::new(),
            LogicalPlan::Intersection { inputs } => self.intersect(inputs),
        }
    }

    fn index_seek(&self, field: &str, kind: IndexKind, key: &IndexKey) -> Vec<RowId> {
        match (kind, key) {
            (IndexKind::String, IndexKey::Text(text)) => self
                .indexes
                .strings
                .read(field)
                .map(|index| index.get(text.as_str()).to_vec()),
            (IndexKind::Date, IndexKey::Text(text)) => self
                .indexes
                .dates
                .read(field)
                .map(|index| index.get(text.as_str()).to_vec()),
            (IndexKind::Integer, IndexKey::Integer(value)) => self
                .indexes
                .integers
                .read(field)
                .map(|index| index.get(value).to_vec()),
            _ => None,
        }
        .unwrap_or_default()
    }

    fn intersect(&self, inputs: &[LogicalPlan]) -> Vec<RowId> {
        let mut parts = inputs.iter().map(|plan| self.execute_plan(plan));
        let Some(first) = parts.next() else {
            return Vec::new();
        };
        let mut acc: HashSet<RowId> = first.into_iter().collect();
        for part in parts {
            let other: HashSet<RowId> = part.into_iter().collect();
            acc.retain(|row| other.contains(row));
        }
        acc.into_iter().collect()
    }

    /// Evaluate `condition` over every record, partitioned across the pool.
    pub fn linear_scan(&self, condition: &Condition) -> Vec<RowId> {
        let records = self.store.records();
        if records.is_empty() {
            return Vec::new();
        }

        let matcher = ScanMatcher::new(condition);
        let partition = records
            .len()
            .div_ceil(self.pool.workers().max(1))
            .max(MIN_SCAN_PARTITION);
        let matches = SegQueue::new();

        self.pool.install(|| {
            records
                .par_chunks(partition)
                .enumerate()
                .for_each(|(part, slice)| {
                    let base = part * partition;
                    for (offset, record) in slice.iter().enumerate() {
                        if matcher.matches(record) {
                            matches.push(RowId(base + offset));
                        }
                    }
                });
        });

        let mut rows = Vec::with_capacity(matches.len());
        while let Some(row) = matches.pop() {
            rows.push(row);
        }
        rows.sort_unstable();
        debug!(field = %condition.field, op = %condition.op, matched = rows.len(), "linear scan");
        rows
    }
}

/// Per-record predicate for one condition, with the literal pre-parsed.
struct ScanMatcher<'c> {
    field: &'c str,
    op: Operator,
    text: &'c str,
    number: Option<f64>,
}

impl<'c> ScanMatcher<'c> {
    fn new(condition: &'c Condition) -> Self {
        ScanMatcher {
            field: &condition.field,
            op: condition.op,
            text: &condition.value,
            number: condition.value.trim().parse::<f64>().ok(),
        }
    }

    fn matches(&self, record: &Record) -> bool {
        let Some(value) = record.get_field(self.field) else {
            return false;
        };
        match self.op {
            Operator::Eq => value_text(value) == self.text,
            Operator::Lt | Operator::Gt => match (value, self.number) {
                (Value::Number(n), Some(bound)) => n
                    .as_f64()
                    .is_some_and(|v| self.op.compare(&v, &bound)),
                _ => false,
            },
        }
    }
}
