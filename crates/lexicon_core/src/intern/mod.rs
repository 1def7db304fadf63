//! Per-run interning and deduplication state.
//!
//! Both objects are constructed by the caller and threaded explicitly
//! through the pipeline; nothing here is process-global.

pub mod dedup;
pub mod tags;

pub use dedup::DedupGuard;
pub use tags::TagInterner;
