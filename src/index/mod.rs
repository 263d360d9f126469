pub mod field_index;
pub mod global;

pub use field_index::{FieldIndex, IndexSet};
pub use global::{GlobalIndexes, KindIndex};
