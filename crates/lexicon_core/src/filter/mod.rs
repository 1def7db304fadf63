//! Part-of-speech specific form filtering.
//!
//! # Responsibility
//! - Express which inflected forms are kept, and which tags are stripped,
//!   as declarative rule tables.
//! - Evaluate those tables uniformly with one rule engine.
//!
//! # Invariants
//! - Universal rules run before part-of-speech rules.
//! - A tentative rejection left standing at the end of a stage drops the form.
//! - Surviving tag sets are canonical (sorted, deduplicated).

pub mod engine;
pub mod policy;

pub use engine::{FilteredForm, FormFilter, FormVerdict};
pub use policy::{Action, Condition, PolicyTable, Rule};
