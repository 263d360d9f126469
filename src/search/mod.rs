pub mod executor;
pub mod results;

pub use executor::QueryExecutor;
pub use results::{QueryResults, QueryStatus, ResultPreview};
