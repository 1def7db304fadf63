//! Domain model for compiled lexicon stores.
//!
//! # Responsibility
//! - Define the row shapes shared by the compiler, the lite builder and
//!   read-side lookups.
//! - Own the canonical encodings of closed vocabularies (`pos`, `gender`,
//!   `relation_type`) and of tag sets.
//!
//! # Invariants
//! - Rows are created once per compilation run and never updated in place.
//! - `base_form` is a textual reference, never a foreign key.

pub mod tags;
pub mod word;
