pub mod pool;
pub mod indexer;
pub mod merger;

pub use indexer::{Chunk, ChunkIndexer};
pub use merger::IndexMerger;
pub use pool::WorkerPool;
