use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use serde_json::Value;
use tracing::{debug, info, warn};
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::stats::{DatabaseStats, FieldStats, IndexStats};
use crate::index::global::GlobalIndexes;
use crate::parallel::indexer::ChunkIndexer;
use crate::parallel::merger::IndexMerger;
use crate::parallel::pool::WorkerPool;
use crate::query::cache::QueryCache;
use crate::query::parser::QueryParser;
use crate::query::planner::QueryPlanner;
use crate::search::executor::QueryExecutor;
use crate::search::results::{QueryResults, QueryStatus};
use crate::storage::record_store::RecordStore;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Load-once, query-many record database.
#[derive(Debug)]
pub struct Database {
    config: Config,
    pool: WorkerPool,
    parser: QueryParser,
    store: RecordStore,
    indexes: GlobalIndexes,
    cache: QueryCache,

    loaded: bool,
    chunk_count: usize,
    load_time: Duration,
    query_count: AtomicU64,
}

impl Database {
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let pool = WorkerPool::new(config.worker_threads)?;
        let indexes = GlobalIndexes::new(&config.index);
        let cache = QueryCache::new(config.cache_capacity);

        info!(
            indexes = config.index.len(),
            workers = config.worker_threads,
            chunk_size = config.chunk_size,
            "database opened"
        );

        Ok(Database {
            config,
            pool,
            parser: QueryParser::new(),
            store: RecordStore::default(),
            indexes,
            cache,
            loaded: false,
            chunk_count: 0,
            load_time: Duration::ZERO,
            query_count: AtomicU64::new(0),
        })
    }

    /// Ingest the full record collection and build the global indexes.
    ///
    /// Allowed once. A classification failure leaves the database empty.
    pub fn load_records(&mut self, records: Vec<Value>) -> Result<()> {
        if self.loaded {
            return Err(Error::new(ErrorKind::InvalidState, "records are already loaded"));
        }

        let start = Instant::now();
        let total = records.len();
        info!(records = total, "loading records");

        let indexer = ChunkIndexer::new(&self.config.index, self.config.chunk_size);
        let chunks = indexer.build(&self.pool, records)?;
        let chunk_count = chunks.len();

        let mut store = RecordStore::with_capacity(total);
        let mut locals = Vec::with_capacity(chunk_count);
        for chunk in chunks {
            store.extend(chunk.records);
            locals.push(chunk.indexes);
        }
        IndexMerger::merge(&self.pool, &self.indexes, locals);

        self.store = store;
        self.loaded = true;
        self.chunk_count = chunk_count;
        self.load_time = start.elapsed();
        // Results computed before the load are stale.
        self.cache.clear();

        info!(
            records = self.store.len(),
            chunks = chunk_count,
            elapsed_ms = self.load_time.as_millis() as u64,
            "records loaded"
        );
        Ok(())
    }

    /// Load a top-level JSON array of records.
    pub fn load_json<R: Read>(&mut self, reader: R) -> Result<()> {
        let records: Vec<Value> = serde_json::from_reader(reader)?;
        self.load_records(records)
    }

    pub fn load_json_file(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|e| {
            Error::new(ErrorKind::Io, format!("failed to open {:?}: {}", path, e))
        })?;
        let bytes = file.metadata().map(|m| m.len()).unwrap_or(0);
        info!(path = %path.display(), size_mb = bytes as f64 / (1024.0 * 1024.0), "reading data file");
        self.load_json(BufReader::with_capacity(READ_BUFFER_SIZE, file))
    }

    /// Answer a query, serving repeated query strings from the cache.
    ///
    /// Malformed or unsupported queries yield an empty result with the
    /// matching status, never an error.
    pub fn query(&self, input: &str) -> Arc<QueryResults> {
        if let Some(results) = self.cache.get(input) {
            debug!(query = input, "cache hit");
            return results;
        }

        let results = Arc::new(self.execute(input));
        self.cache.put(input, results.clone());
        results
    }

    /// Run the query pipeline without consulting or filling the cache.
    pub fn execute(&self, input: &str) -> QueryResults {
        let start = Instant::now();
        self.query_count.fetch_add(1, Ordering::Relaxed);
        let mut results = self.evaluate(input);
        results.took_ms = start.elapsed().as_millis() as u64;
        debug!(query = input, status = ?results.status, matched = results.len(), took_ms = results.took_ms, "query executed");
        results
    }

    fn evaluate(&self, input: &str) -> QueryResults {
        let Some(query) = self.parser.parse(input) else {
            warn!(query = input, "invalid query format");
            return QueryResults::empty(QueryStatus::Unparseable);
        };

        let planner = QueryPlanner::new(&self.config.index);
        let Some(plan) = planner.plan(&query) else {
            warn!(query = input, conditions = query.conditions.len(), "format not supported");
            return QueryResults::empty(QueryStatus::Unsupported);
        };

        let executor = QueryExecutor::new(&self.store, &self.indexes, &self.pool);
        let rows = executor.execute(&plan);
        let records = self.store.materialize(&rows);
        QueryResults {
            status: QueryStatus::Ok,
            rows,
            records,
            took_ms: 0,
        }
    }

    /// Per configured field: distinct keys, indexed rows, and the `top_n` most frequent keys.
    pub fn index_stats(&self, top_n: usize) -> IndexStats {
        let fields = self
            .config
            .index
            .fields()
            .iter()
            .map(|field| {
                let (unique_values, indexed_rows) = self
                    .indexes
                    .field_sizes(&field.name, field.kind)
                    .unwrap_or_default();
                FieldStats {
                    field: field.name.clone(),
                    kind: field.kind,
                    unique_values,
                    indexed_rows,
                    top_values: self.indexes.top_keys(&field.name, field.kind, top_n),
                }
            })
            .collect();
        IndexStats { fields }
    }

    pub fn stats(&self) -> DatabaseStats {
        DatabaseStats {
            total_records: self.store.len(),
            index_count: self.config.index.len(),
            chunk_count: self.chunk_count,
            load_time_ms: self.load_time.as_millis() as u64,
            queries_executed: self.query_count.load(Ordering::Relaxed),
            cache_stats: self.cache.stats(),
        }
    }

    pub fn records(&self) -> &RecordStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}
