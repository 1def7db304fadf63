//! Headword lookup over a compiled store.
//!
//! # Responsibility
//! - Serve the read contract of dictionary front ends: matching words with
//!   their glosses, forms (with decoded tag lists) and grouped relations.
//!
//! # Invariants
//! - Headword matching uses SQLite `NOCASE` collation (ASCII case folding).
//! - Definitions and forms keep insertion order.

use crate::model::word::{RelationType, StoredWord, WordId};
use crate::store::read::{parse_relation_type, parse_tag_key, parse_word_row, WORD_SELECT_SQL};
use crate::store::StoreResult;
use rusqlite::Connection;
use serde::Serialize;

/// One form of an entry with its canonical tag list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryForm {
    pub text: String,
    pub tags: Vec<String>,
}

/// Relations of an entry grouped by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelationGroups {
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    pub related: Vec<String>,
}

impl RelationGroups {
    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty() && self.antonyms.is_empty() && self.related.is_empty()
    }

    fn push(&mut self, kind: RelationType, word: String) {
        match kind {
            RelationType::Synonym => self.synonyms.push(word),
            RelationType::Antonym => self.antonyms.push(word),
            RelationType::Related => self.related.push(word),
        }
    }
}

/// Full read model of one word row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictionaryEntry {
    #[serde(flatten)]
    pub word: StoredWord,
    pub definitions: Vec<String>,
    pub forms: Vec<EntryForm>,
    pub relations: RelationGroups,
}

/// Returns every word whose text matches `headword` case-insensitively,
/// ordered by id.
pub fn lookup_entries(conn: &Connection, headword: &str) -> StoreResult<Vec<DictionaryEntry>> {
    let mut stmt = conn.prepare(&format!(
        "{WORD_SELECT_SQL}
         WHERE word = ?1 COLLATE NOCASE
         ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([headword])?;
    let mut entries = Vec::new();
    while let Some(row) = rows.next()? {
        let word = parse_word_row(row)?;
        let id = word.id;
        entries.push(DictionaryEntry {
            word,
            definitions: load_definitions(conn, id)?,
            forms: load_forms(conn, id)?,
            relations: load_relations(conn, id)?,
        });
    }
    Ok(entries)
}

/// Returns the words recorded as inflections of `base_text` (exact match).
pub fn lookup_inflections(conn: &Connection, base_text: &str) -> StoreResult<Vec<StoredWord>> {
    let mut stmt = conn.prepare(&format!(
        "{WORD_SELECT_SQL}
         WHERE base_form = ?1
         ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([base_text])?;
    let mut words = Vec::new();
    while let Some(row) = rows.next()? {
        words.push(parse_word_row(row)?);
    }
    Ok(words)
}

fn load_definitions(conn: &Connection, word_id: WordId) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT definition FROM definitions
         WHERE word_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([word_id])?;
    let mut definitions = Vec::new();
    while let Some(row) = rows.next()? {
        definitions.push(row.get(0)?);
    }
    Ok(definitions)
}

fn load_forms(conn: &Connection, word_id: WordId) -> StoreResult<Vec<EntryForm>> {
    let mut stmt = conn.prepare_cached(
        "SELECT f.form, t.tags
         FROM forms f
         INNER JOIN tags t ON t.id = f.tag_id
         WHERE f.word_id = ?1
         ORDER BY f.id ASC;",
    )?;
    let mut rows = stmt.query([word_id])?;
    let mut forms = Vec::new();
    while let Some(row) = rows.next()? {
        let key: String = row.get(1)?;
        forms.push(EntryForm {
            text: row.get(0)?,
            tags: parse_tag_key(&key)?.into_vec(),
        });
    }
    Ok(forms)
}

fn load_relations(conn: &Connection, word_id: WordId) -> StoreResult<RelationGroups> {
    let mut stmt = conn.prepare_cached(
        "SELECT relation_type, related_word FROM relations
         WHERE word_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([word_id])?;
    let mut groups = RelationGroups::default();
    while let Some(row) = rows.next()? {
        let kind: String = row.get(0)?;
        groups.push(parse_relation_type(&kind)?, row.get(1)?);
    }
    Ok(groups)
}
