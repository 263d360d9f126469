use std::fmt;
use serde::{Serialize, Deserialize};
use crate::core::types::IndexKind;
use crate::query::cache::CacheStats;

/// Per-field index summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub field: String,
    pub kind: IndexKind,
    pub unique_values: usize,
    pub indexed_rows: usize,
    /// Most frequent keys, as text, with their row counts.
    pub top_values: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub fields: Vec<FieldStats>,
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Index Statistics:")?;
        for field in &self.fields {
            writeln!(f, "{} ({}): {} unique values", field.field, field.kind, field.unique_values)?;
            for (key, count) in &field.top_values {
                writeln!(f, "  {}: {} records", key, count)?;
            }
        }
        Ok(())
    }
}

/// Database statistics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub total_records: usize,
    pub index_count: usize,
    pub chunk_count: usize,
    pub load_time_ms: u64,
    /// Queries that ran the pipeline, i.e. cache misses.
    pub queries_executed: u64,
    pub cache_stats: CacheStats,
}
