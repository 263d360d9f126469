pub mod core;
pub mod storage;
pub mod index;
pub mod parallel;
pub mod query;
pub mod search;

pub use crate::core::config::{Config, IndexConfig};
pub use crate::core::database::Database;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::{IndexKind, Record, RowId};
pub use crate::search::results::{QueryResults, QueryStatus};

/*
┌──────────────────────────────────────────────────────────────────────────────┐
│                          VESSELDB STRUCT ARCHITECTURE                        │
└──────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── CORE LAYER ──────────────────────────────────┐
│  struct Database                                                             │
│  • config: Config                 // index config, chunk size, workers       │
│  • pool: WorkerPool               // fixed-size rayon pool                    │
│  • parser: QueryParser                                                        │
│  • store: RecordStore             // row id = position                       │
│  • indexes: GlobalIndexes         // per-field RwLock<FieldIndex<K>>         │
│  • cache: QueryCache              // raw query string → Arc<QueryResults>    │
│  • query_count: AtomicU64         // pipeline runs (cache misses)            │
└──────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── LOAD PATH ───────────────────────────────────┐
│  Vec<Value>                                                                  │
│     │ ChunkIndexer::build        par_chunks(chunk_size), no shared state     │
│     ▼                                                                        │
│  Vec<Chunk { records, IndexSet }>   (chunk order)                            │
│     │ RecordStore::extend        sequential, chunk order                     │
│     │ IndexMerger::merge         join(String, join(Integer, Date))           │
│     ▼                            par over fields, fold under write lock      │
│  GlobalIndexes                                                               │
└──────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── QUERY PATH ──────────────────────────────────┐
│  &str ──► QueryCache ──hit──► Arc<QueryResults>                              │
│            │ miss                                                            │
│            ▼                                                                 │
│  QueryParser ──► Query { conditions, combinator }                            │
│  QueryPlanner ──► LogicalPlan                                                │
│     IndexSeek | IndexRange | Scan | Empty | Intersection                     │
│  QueryExecutor ──► sorted, deduped Vec<RowId>                                │
│     Scan: par_chunks over RecordStore → SegQueue → sort                      │
│  RecordStore::materialize ──► QueryResults ──► cache                         │
└──────────────────────────────────────────────────────────────────────────────┘
*/
