//! Whole-store use cases.
//!
//! # Responsibility
//! - `compile`: raw dump to full store.
//! - `lite`: full store to lite subset store.

pub mod compile;
pub mod lite;
