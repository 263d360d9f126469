use std::path::Path;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::IndexKind;

pub const MAX_INDEXES: usize = 3;
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// A field declared for indexing, with the spelling used to read records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedField {
    pub name: String,
    pub kind: IndexKind,
}

/// Field name → index kind. Immutable once built; lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexConfig {
    fields: Vec<IndexedField>,
}

impl IndexConfig {
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, IndexKind)>,
        S: Into<String>,
    {
        let mut fields: Vec<IndexedField> = Vec::new();
        for (name, kind) in entries {
            let name = name.into();
            if fields.iter().any(|f| f.name.eq_ignore_ascii_case(&name)) {
                return Err(Error::invalid_argument(format!(
                    "field '{}' is configured more than once",
                    name
                )));
            }
            fields.push(IndexedField { name, kind });
        }

        if fields.len() > MAX_INDEXES {
            return Err(Error::invalid_argument(format!(
                "Maximum {} indexes allowed, got {}",
                MAX_INDEXES,
                fields.len()
            )));
        }

        Ok(IndexConfig { fields })
    }

    /// Parse the `Database.IndexFieldVsType` section of a JSON settings document.
    pub fn from_settings_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.database.index_config()
    }

    pub fn resolve(&self, field: &str) -> Option<&IndexedField> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(field))
    }

    pub fn kind_of(&self, field: &str) -> Option<IndexKind> {
        self.resolve(field).map(|f| f.kind)
    }

    pub fn fields(&self) -> &[IndexedField] {
        &self.fields
    }

    pub fn fields_of(&self, kind: IndexKind) -> impl Iterator<Item = &IndexedField> {
        self.fields.iter().filter(move |f| f.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub index: IndexConfig,
    pub chunk_size: usize,
    pub worker_threads: usize,
    pub preview_limit: usize,
    pub top_values: usize,
    /// `None` keeps every query result for the life of the process.
    pub cache_capacity: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            index: IndexConfig::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            worker_threads: num_cpus::get(),
            preview_limit: 5,
            top_values: 3,
            cache_capacity: None,
        }
    }
}

impl Config {
    pub fn new(index: IndexConfig) -> Self {
        Config {
            index,
            ..Default::default()
        }
    }

    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub fn from_settings_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        let section = settings.database;
        let mut config = Config::new(section.index_config()?);
        if let Some(size) = section.chunk_size {
            config.chunk_size = size;
        }
        if let Some(threads) = section.worker_threads {
            config.worker_threads = threads;
        }
        if let Some(limit) = section.preview_limit {
            config.preview_limit = limit;
        }
        config.cache_capacity = section.cache_capacity;
        Ok(config)
    }

    pub fn from_settings_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::new(
                ErrorKind::Io,
                format!("failed to read settings {:?}: {}", path, e),
            )
        })?;
        Self::from_settings_json(&content)
    }

    /// Apply `VESSELDB_CHUNK_SIZE` / `VESSELDB_WORKER_THREADS` when set and numeric.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides read through `lookup`, keyed by environment variable name.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name)?.trim().parse::<usize>().ok();
        if let Some(size) = read("VESSELDB_CHUNK_SIZE") {
            self.chunk_size = size;
        }
        if let Some(threads) = read("VESSELDB_WORKER_THREADS") {
            self.worker_threads = threads;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::invalid_argument("chunk_size must be at least 1"));
        }
        if self.worker_threads == 0 {
            return Err(Error::invalid_argument("worker_threads must be at least 1"));
        }
        if self.cache_capacity == Some(0) {
            return Err(Error::invalid_argument("cache_capacity must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Settings {
    #[serde(default)]
    database: DatabaseSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DatabaseSection {
    #[serde(default)]
    index_field_vs_type: serde_json::Map<String, Value>,
    chunk_size: Option<usize>,
    worker_threads: Option<usize>,
    preview_limit: Option<usize>,
    cache_capacity: Option<usize>,
}

impl DatabaseSection {
    fn index_config(&self) -> Result<IndexConfig> {
        let mut entries = Vec::with_capacity(self.index_field_vs_type.len());
        for (field, kind) in &self.index_field_vs_type {
            match kind.as_str().map(str::parse::<IndexKind>) {
                Some(Ok(kind)) => entries.push((field.clone(), kind)),
                _ => warn!(field = %field, kind = %kind, "skipping index with unknown kind"),
            }
        }
        IndexConfig::new(entries)
    }
}
