pub mod ast;
pub mod parser;
pub mod planner;
pub mod cache;

pub use ast::{Combinator, Condition, Operator, Query};
pub use cache::{CacheStats, QueryCache};
pub use parser::QueryParser;
pub use planner::{IndexKey, LogicalPlan, QueryPlanner};
