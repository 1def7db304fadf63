//! Persistence of compiled lexicon rows.
//!
//! # Responsibility
//! - Define the write contract used by the compilation pipeline.
//! - Keep SQL details of the five tables inside this boundary.
//! - Create lookup indexes once bulk writes are complete.
//!
//! # Invariants
//! - Rows are appended, never updated.
//! - Dependent rows are only written for word ids returned by `insert_word`.
//! - A tag key conflict is reported as `TagInsert::Conflict`, not an error.

use crate::db::DbError;
use crate::model::word::{NewWord, Relation, TagId, WordId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod indexes;
pub mod read;
pub mod writer;

pub use indexes::{create_lookup_indexes, LOOKUP_INDEXES};
pub use writer::SqliteLexiconWriter;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for store writes and row decoding.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Persisted data cannot be decoded into the model.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid lexicon data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of persisting a new tag key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagInsert {
    Inserted(TagId),
    /// The store already holds a row with this key.
    Conflict,
}

/// Row counters maintained by a writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteCounts {
    pub words: u64,
    pub definitions: u64,
    pub relations: u64,
    pub tags: u64,
    pub forms: u64,
}

/// Append-only write contract of the compilation pipeline.
pub trait LexiconWriter {
    /// Inserts one word row and returns its freshly assigned id.
    fn insert_word(&mut self, word: &NewWord) -> StoreResult<WordId>;
    /// Inserts glosses in display order.
    fn insert_definitions(&mut self, word_id: WordId, definitions: &[String]) -> StoreResult<()>;
    fn insert_relations(&mut self, word_id: WordId, relations: &[Relation]) -> StoreResult<()>;
    /// Persists a new canonical tag key.
    fn insert_tag(&mut self, key: &str) -> StoreResult<TagInsert>;
    /// Looks up the id of an existing tag key.
    fn find_tag(&self, key: &str) -> StoreResult<Option<TagId>>;
    fn insert_form(&mut self, word_id: WordId, text: &str, tag_id: TagId) -> StoreResult<()>;
    /// Durability checkpoint: commits rows written since the last one.
    fn checkpoint(&mut self) -> StoreResult<()>;
    fn counts(&self) -> WriteCounts;
}
