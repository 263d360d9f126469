use std::fmt;
use serde::{Deserialize, Serialize};
use crate::core::types::{Record, RowId};

/// Outcome of a query. Only `Ok` results were evaluated against the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryStatus {
    Ok,
    /// No condition could be extracted from the input.
    Unparseable,
    /// More than two conditions, or two without AND.
    Unsupported,
}

/// Query results container
#[derive(Debug, Clone)]
pub struct QueryResults {
    pub status: QueryStatus,
    /// Ascending, without duplicates.
    pub rows: Vec<RowId>,
    /// One record per entry of `rows`, same order.
    pub records: Vec<Record>,
    pub took_ms: u64,
}

impl QueryResults {
    pub fn empty(status: QueryStatus) -> Self {
        QueryResults {
            status,
            rows: Vec::new(),
            records: Vec::new(),
            took_ms: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_ok(&self) -> bool {
        self.status == QueryStatus::Ok
    }

    pub fn preview(&self, limit: usize) -> ResultPreview<'_> {
        ResultPreview {
            results: self,
            limit,
        }
    }
}

/// First `limit` matched records, rendered as raw JSON.
pub struct ResultPreview<'a> {
    results: &'a QueryResults,
    limit: usize,
}

impl fmt::Display for ResultPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.results.len();
        writeln!(f, "Found {} results:", total)?;
        for record in self.results.records.iter().take(self.limit) {
            writeln!(f, "{}", record)?;
        }
        if total > self.limit {
            writeln!(f, "... and {} more results", total - self.limit)?;
        }
        Ok(())
    }
}
