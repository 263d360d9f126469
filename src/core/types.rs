use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use serde::{Serialize, Deserialize};
use serde_json::Value;
use crate::core::error::{Error, Result};

/// Position of a record in the store, assigned once at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(pub usize);

impl RowId {
    pub fn new(id: usize) -> Self {
        RowId(id)
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl From<usize> for RowId {
    fn from(id: usize) -> Self {
        RowId(id)
    }
}

/// Immutable structured record. Cloning shares the underlying value.
#[derive(Debug, Clone, PartialEq)]
pub struct Record(Arc<Value>);

impl Record {
    pub fn new(value: Value) -> Self {
        Record(Arc::new(value))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Field lookup is exact (case-sensitive); non-object records have no fields.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.0.as_object().and_then(|fields| fields.get(name))
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Record::new(value)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Textual form of a field value used by equality in linear scans.
///
/// Numbers render as their source text (`5.10` stays `5.10`).
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Value::Number(n) => Cow::Owned(n.to_string()),
        other => Cow::Owned(other.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexKind {
    String,
    Integer,
    Date,
}

impl IndexKind {
    pub const ALL: [IndexKind; 3] = [IndexKind::String, IndexKind::Integer, IndexKind::Date];

    pub fn name(&self) -> &'static str {
        match self {
            IndexKind::String => "String",
            IndexKind::Integer => "Integer",
            IndexKind::Date => "Date",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndexKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        IndexKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_argument(format!("unknown index kind '{}'", s)))
    }
}
