//! Grouping & suggestion engine.
//!
//! - [`columns`] - key column resolution by label matching
//! - [`grouper`] - headcount grouping, classification and merge suggestions
//! - [`pipeline`] - bytes-to-tables orchestration

pub mod columns;
pub mod grouper;
pub mod pipeline;

pub use columns::resolve_columns;
pub use grouper::{build_summary, count_groups};
pub use pipeline::{process_bytes, Processed, SheetInfo};
