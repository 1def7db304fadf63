//! Core of the lexicon compiler.
//! Turns a raw JSONL dictionary dump into a normalized SQLite store, derives
//! the lite subset and answers lookups and audits against either store.

pub mod audit;
pub mod db;
pub mod filter;
pub mod ingest;
pub mod intern;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod service;
pub mod store;

pub use audit::{audit_store, AuditReport};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use lookup::{lookup_entries, DictionaryEntry};
pub use model::tags::TagSet;
pub use model::word::{Gender, NewWord, PartOfSpeech, RelationType, StoredWord};
pub use service::compile::{
    compile_file, compile_into, CompileError, CompileOptions, CompileReport,
};
pub use service::lite::{build_lite_file, LiteError, LiteOptions, LiteReport};
pub use store::{StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
