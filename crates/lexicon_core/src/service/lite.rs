//! Lite store derivation.
//!
//! # Responsibility
//! - Select a coverage-driven subset of headwords from a compiled store.
//! - Pull in every inflection pointing at a selected headword.
//! - Copy selected words and their dependent rows into a fresh store with
//!   the same schema, then index and compact it.
//!
//! # Invariants
//! - Inflections are matched by `base_form` text, never by id.
//! - Only tags referenced by copied forms are copied.
//! - Row ids are preserved, so cross-table references stay valid.

use crate::db::{create_fresh_db, open_db, same_file, DbError};
use crate::model::word::{PartOfSpeech, TagId, WordId};
use crate::store::read::{parse_word_row, WORD_SELECT_SQL};
use crate::store::{create_lookup_indexes, StoreError, StoreResult};
use log::{error, info};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Transaction};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Learning-critical classes kept whole.
pub const CORE_CLASSES: &[PartOfSpeech] = &[PartOfSpeech::Verb, PartOfSpeech::Adj];

/// Small function-word classes kept whole.
pub const CLOSED_CLASSES: &[PartOfSpeech] = &[
    PartOfSpeech::Adv,
    PartOfSpeech::Prep,
    PartOfSpeech::Conj,
    PartOfSpeech::Pron,
    PartOfSpeech::Det,
    PartOfSpeech::Particle,
];

const DEFAULT_NOUN_MAX_CHARS: usize = 10;
const DEFAULT_NOUN_CAP: usize = 15_000;

/// Selection heuristics of the lite store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteOptions {
    /// Longest noun headword (in characters) eligible for selection.
    pub noun_max_chars: usize,
    /// Maximum number of short nouns selected.
    pub noun_cap: usize,
}

impl Default for LiteOptions {
    fn default() -> Self {
        Self {
            noun_max_chars: DEFAULT_NOUN_MAX_CHARS,
            noun_cap: DEFAULT_NOUN_CAP,
        }
    }
}

/// Headwords chosen for the lite store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiteSelection {
    /// Non-inflection words picked by the class and length heuristics.
    pub base: BTreeSet<WordId>,
    /// Inflections whose base form is the text of a base word.
    pub inflections: BTreeSet<WordId>,
    pub core_words: u64,
    pub closed_class_words: u64,
    pub short_nouns: u64,
}

impl LiteSelection {
    pub fn contains(&self, id: WordId) -> bool {
        self.base.contains(&id) || self.inflections.contains(&id)
    }
}

/// Summary of one lite derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LiteReport {
    pub core_words: u64,
    pub closed_class_words: u64,
    pub short_nouns: u64,
    pub base_selection: u64,
    pub inflections_added: u64,
    pub words: u64,
    pub definitions: u64,
    pub tags: u64,
    pub forms: u64,
    pub relations: u64,
    pub duration_ms: u64,
}

#[derive(Debug)]
pub enum LiteError {
    /// Source store file does not exist.
    SourceMissing(PathBuf),
    /// Target path resolves to the source store.
    TargetIsSource(PathBuf),
    Db(DbError),
    Store(StoreError),
}

impl Display for LiteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceMissing(path) => write!(f, "source store not found: {}", path.display()),
            Self::TargetIsSource(path) => write!(
                f,
                "lite target {} is the source store; refusing to overwrite it",
                path.display()
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LiteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SourceMissing(_) | Self::TargetIsSource(_) => None,
            Self::Db(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<DbError> for LiteError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<StoreError> for LiteError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<rusqlite::Error> for LiteError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Derives a lite store at `target` from the compiled store at `source`.
///
/// An existing store at `target` is replaced, unless it is `source` itself.
pub fn build_lite_file(
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
    options: &LiteOptions,
) -> Result<LiteReport, LiteError> {
    let source = source.as_ref();
    if !source.is_file() {
        return Err(LiteError::SourceMissing(source.to_path_buf()));
    }
    let target = target.as_ref();
    if same_file(source, target) {
        return Err(LiteError::TargetIsSource(target.to_path_buf()));
    }

    let source_conn = open_db(source)?;
    let mut target_conn = create_fresh_db(target)?;
    build_lite_store(&source_conn, &mut target_conn, options)
}

/// Copies the lite subset of `source` into the migrated, empty `target`.
pub fn build_lite_store(
    source: &Connection,
    target: &mut Connection,
    options: &LiteOptions,
) -> Result<LiteReport, LiteError> {
    let started_at = Instant::now();
    info!(
        "event=lite_start module=lite status=start noun_max_chars={} noun_cap={}",
        options.noun_max_chars, options.noun_cap
    );

    match derive(source, target, options) {
        Ok(mut report) => {
            report.duration_ms = started_at.elapsed().as_millis() as u64;
            info!(
                "event=lite_finish module=lite status=ok words={} forms={} tags={} duration_ms={}",
                report.words, report.forms, report.tags, report.duration_ms
            );
            Ok(report)
        }
        Err(err) => {
            error!(
                "event=lite_finish module=lite status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn derive(
    source: &Connection,
    target: &mut Connection,
    options: &LiteOptions,
) -> Result<LiteReport, LiteError> {
    let selection = select_lite_words(source, options)?;
    info!(
        "event=lite_select module=lite status=ok core={} closed_class={} short_nouns={} inflections={}",
        selection.core_words,
        selection.closed_class_words,
        selection.short_nouns,
        selection.inflections.len()
    );

    let mut report = LiteReport {
        core_words: selection.core_words,
        closed_class_words: selection.closed_class_words,
        short_nouns: selection.short_nouns,
        base_selection: selection.base.len() as u64,
        inflections_added: selection.inflections.len() as u64,
        ..LiteReport::default()
    };

    let tx = target.transaction()?;
    report.words = copy_words(source, &tx, &selection)?;
    report.definitions = copy_dependent_rows(
        source,
        &tx,
        "SELECT id, word_id, definition FROM definitions ORDER BY id;",
        "INSERT INTO definitions (id, word_id, definition) VALUES (?1, ?2, ?3);",
        &selection,
    )?;
    let tag_ids = referenced_tags(source, &selection)?;
    report.tags = copy_tags(source, &tx, &tag_ids)?;
    report.forms = copy_dependent_rows(
        source,
        &tx,
        "SELECT id, word_id, form, tag_id FROM forms ORDER BY id;",
        "INSERT INTO forms (id, word_id, form, tag_id) VALUES (?1, ?2, ?3, ?4);",
        &selection,
    )?;
    report.relations = copy_dependent_rows(
        source,
        &tx,
        "SELECT id, word_id, relation_type, related_word FROM relations ORDER BY id;",
        "INSERT INTO relations (id, word_id, relation_type, related_word) VALUES (?1, ?2, ?3, ?4);",
        &selection,
    )?;
    tx.commit()?;

    create_lookup_indexes(target)?;
    target.execute_batch("VACUUM;")?;
    Ok(report)
}

/// Computes the base selection and its inflection closure.
pub fn select_lite_words(source: &Connection, options: &LiteOptions) -> StoreResult<LiteSelection> {
    let mut selection = LiteSelection::default();

    for pos in CORE_CLASSES {
        selection.core_words += select_headwords(source, *pos, &mut selection.base)?;
    }
    for pos in CLOSED_CLASSES {
        selection.closed_class_words += select_headwords(source, *pos, &mut selection.base)?;
    }
    selection.short_nouns = select_short_nouns(source, options, &mut selection.base)?;

    let base_texts = headword_texts(source, &selection.base)?;
    let mut stmt = source.prepare(
        "SELECT id, base_form
         FROM words
         WHERE base_form IS NOT NULL
         ORDER BY id;",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let base_form: String = row.get(1)?;
        if base_texts.contains(&base_form) {
            selection.inflections.insert(row.get(0)?);
        }
    }

    Ok(selection)
}

fn select_headwords(
    source: &Connection,
    pos: PartOfSpeech,
    into: &mut BTreeSet<WordId>,
) -> StoreResult<u64> {
    let mut stmt = source.prepare(
        "SELECT id FROM words
         WHERE pos = ?1
           AND base_form IS NULL;",
    )?;
    let mut rows = stmt.query([pos.as_str()])?;
    let mut count = 0;
    while let Some(row) = rows.next()? {
        into.insert(row.get(0)?);
        count += 1;
    }
    Ok(count)
}

fn select_short_nouns(
    source: &Connection,
    options: &LiteOptions,
    into: &mut BTreeSet<WordId>,
) -> StoreResult<u64> {
    let mut stmt = source.prepare(
        "SELECT id FROM words
         WHERE pos = ?1
           AND base_form IS NULL
           AND LENGTH(word) <= ?2
         ORDER BY LENGTH(word) ASC, word ASC
         LIMIT ?3;",
    )?;
    let mut rows = stmt.query(params![
        PartOfSpeech::Noun.as_str(),
        options.noun_max_chars as i64,
        options.noun_cap as i64
    ])?;
    let mut count = 0;
    while let Some(row) = rows.next()? {
        into.insert(row.get(0)?);
        count += 1;
    }
    Ok(count)
}

fn headword_texts(source: &Connection, ids: &BTreeSet<WordId>) -> StoreResult<HashSet<String>> {
    let mut stmt = source.prepare("SELECT id, word FROM words WHERE base_form IS NULL;")?;
    let mut rows = stmt.query([])?;
    let mut texts = HashSet::new();
    while let Some(row) = rows.next()? {
        let id: WordId = row.get(0)?;
        if ids.contains(&id) {
            texts.insert(row.get(1)?);
        }
    }
    Ok(texts)
}

fn copy_words(
    source: &Connection,
    tx: &Transaction<'_>,
    selection: &LiteSelection,
) -> StoreResult<u64> {
    let mut select = source.prepare(&format!("{WORD_SELECT_SQL} ORDER BY id;"))?;
    let mut insert = tx.prepare(
        "INSERT INTO words (id, word, pos, gender, ipa, base_form)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
    )?;
    let mut rows = select.query([])?;
    let mut copied = 0;
    while let Some(row) = rows.next()? {
        let word = parse_word_row(row)?;
        if !selection.contains(word.id) {
            continue;
        }
        insert.execute(params![
            word.id,
            word.text,
            word.pos.as_str(),
            word.gender.map(|gender| gender.code()),
            word.phonetic,
            word.base_form,
        ])?;
        copied += 1;
    }
    Ok(copied)
}

/// Copies rows whose second column is the owning `word_id`.
fn copy_dependent_rows(
    source: &Connection,
    tx: &Transaction<'_>,
    select_sql: &str,
    insert_sql: &str,
    selection: &LiteSelection,
) -> StoreResult<u64> {
    let mut select = source.prepare(select_sql)?;
    let columns = select.column_count();
    let mut insert = tx.prepare(insert_sql)?;
    let mut rows = select.query([])?;
    let mut copied = 0;
    while let Some(row) = rows.next()? {
        let word_id: WordId = row.get(1)?;
        if !selection.contains(word_id) {
            continue;
        }
        let values = (0..columns)
            .map(|index| row.get::<_, Value>(index))
            .collect::<Result<Vec<_>, _>>()?;
        insert.execute(params_from_iter(values))?;
        copied += 1;
    }
    Ok(copied)
}

fn referenced_tags(source: &Connection, selection: &LiteSelection) -> StoreResult<BTreeSet<TagId>> {
    let mut stmt = source.prepare("SELECT word_id, tag_id FROM forms;")?;
    let mut rows = stmt.query([])?;
    let mut tag_ids = BTreeSet::new();
    while let Some(row) = rows.next()? {
        let word_id: WordId = row.get(0)?;
        if selection.contains(word_id) {
            tag_ids.insert(row.get(1)?);
        }
    }
    Ok(tag_ids)
}

fn copy_tags(
    source: &Connection,
    tx: &Transaction<'_>,
    tag_ids: &BTreeSet<TagId>,
) -> StoreResult<u64> {
    let mut select = source.prepare("SELECT id, tags FROM tags ORDER BY id;")?;
    let mut insert = tx.prepare("INSERT INTO tags (id, tags) VALUES (?1, ?2);")?;
    let mut rows = select.query([])?;
    let mut copied = 0;
    while let Some(row) = rows.next()? {
        let id: TagId = row.get(0)?;
        if !tag_ids.contains(&id) {
            continue;
        }
        let key: String = row.get(1)?;
        insert.execute(params![id, key])?;
        copied += 1;
    }
    if copied != tag_ids.len() as u64 {
        return Err(StoreError::InvalidData(format!(
            "forms reference {} tag ids but only {copied} exist in tags",
            tag_ids.len()
        )));
    }
    Ok(copied)
}
