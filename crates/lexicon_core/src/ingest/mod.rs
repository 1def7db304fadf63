//! Raw dump ingestion.
//!
//! # Responsibility
//! - Decode one JSON record per line into a typed raw record.
//! - Normalize raw records into word rows plus their dependent data.
//!
//! # Invariants
//! - Malformed lines are reported, never fatal.
//! - Only I/O failures of the underlying reader abort a stream.

pub mod normalize;
pub mod raw;
pub mod reader;
