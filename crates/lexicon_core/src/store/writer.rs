//! SQLite implementation of [`LexiconWriter`].

use super::{LexiconWriter, StoreResult, TagInsert, WriteCounts};
use crate::model::word::{NewWord, Relation, TagId, WordId};
use log::debug;
use rusqlite::{ffi, params, Connection, OptionalExtension, Transaction};

/// Batched, append-only writer over one connection.
///
/// Writes run inside a transaction that is opened lazily and committed by
/// [`LexiconWriter::checkpoint`] or [`SqliteLexiconWriter::finish`].
/// Dropping the writer without finishing rolls back the open batch.
pub struct SqliteLexiconWriter<'conn> {
    conn: &'conn Connection,
    batch: Option<Transaction<'conn>>,
    counts: WriteCounts,
    checkpoints: u64,
}

impl<'conn> SqliteLexiconWriter<'conn> {
    /// Constructs a writer from a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            batch: None,
            counts: WriteCounts::default(),
            checkpoints: 0,
        }
    }

    /// Commits the open batch and returns the final counters.
    pub fn finish(mut self) -> StoreResult<WriteCounts> {
        self.checkpoint()?;
        Ok(self.counts)
    }

    fn ensure_batch(&mut self) -> StoreResult<()> {
        if self.batch.is_none() {
            self.batch = Some(self.conn.unchecked_transaction()?);
        }
        Ok(())
    }
}

impl LexiconWriter for SqliteLexiconWriter<'_> {
    fn insert_word(&mut self, word: &NewWord) -> StoreResult<WordId> {
        self.ensure_batch()?;
        let conn = self.conn;
        let mut stmt = conn.prepare_cached(
            "INSERT INTO words (word, pos, gender, ipa, base_form)
             VALUES (?1, ?2, ?3, ?4, ?5);",
        )?;
        stmt.execute(params![
            word.text.as_str(),
            word.pos.as_str(),
            word.gender.map(|gender| gender.code()),
            word.phonetic.as_str(),
            word.base_form.as_deref(),
        ])?;
        self.counts.words += 1;
        Ok(conn.last_insert_rowid())
    }

    fn insert_definitions(&mut self, word_id: WordId, definitions: &[String]) -> StoreResult<()> {
        if definitions.is_empty() {
            return Ok(());
        }
        self.ensure_batch()?;
        let mut stmt = self
            .conn
            .prepare_cached("INSERT INTO definitions (word_id, definition) VALUES (?1, ?2);")?;
        for definition in definitions {
            stmt.execute(params![word_id, definition.as_str()])?;
        }
        self.counts.definitions += definitions.len() as u64;
        Ok(())
    }

    fn insert_relations(&mut self, word_id: WordId, relations: &[Relation]) -> StoreResult<()> {
        if relations.is_empty() {
            return Ok(());
        }
        self.ensure_batch()?;
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO relations (word_id, relation_type, related_word) VALUES (?1, ?2, ?3);",
        )?;
        for relation in relations {
            stmt.execute(params![
                word_id,
                relation.kind.as_str(),
                relation.related_word.as_str()
            ])?;
        }
        self.counts.relations += relations.len() as u64;
        Ok(())
    }

    fn insert_tag(&mut self, key: &str) -> StoreResult<TagInsert> {
        self.ensure_batch()?;
        let conn = self.conn;
        let mut stmt = conn.prepare_cached("INSERT INTO tags (tags) VALUES (?1);")?;
        match stmt.execute([key]) {
            Ok(_) => {
                self.counts.tags += 1;
                Ok(TagInsert::Inserted(conn.last_insert_rowid()))
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Ok(TagInsert::Conflict)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn find_tag(&self, key: &str) -> StoreResult<Option<TagId>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id FROM tags WHERE tags = ?1;")?;
        let id = stmt.query_row([key], |row| row.get(0)).optional()?;
        Ok(id)
    }

    fn insert_form(&mut self, word_id: WordId, text: &str, tag_id: TagId) -> StoreResult<()> {
        self.ensure_batch()?;
        let mut stmt = self
            .conn
            .prepare_cached("INSERT INTO forms (word_id, form, tag_id) VALUES (?1, ?2, ?3);")?;
        stmt.execute(params![word_id, text, tag_id])?;
        self.counts.forms += 1;
        Ok(())
    }

    fn checkpoint(&mut self) -> StoreResult<()> {
        if let Some(batch) = self.batch.take() {
            batch.commit()?;
            self.checkpoints += 1;
            debug!(
                "event=store_checkpoint module=store status=ok checkpoint={} words={} forms={}",
                self.checkpoints, self.counts.words, self.counts.forms
            );
        }
        Ok(())
    }

    fn counts(&self) -> WriteCounts {
        self.counts
    }
}
