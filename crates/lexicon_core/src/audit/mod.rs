//! Store verification and statistics.
//!
//! # Responsibility
//! - Check a compiled (or lite) store against the compiler's guarantees:
//!   referential integrity, injective tag interning, inflection glosses and
//!   the form filtering policy.
//! - Report per-table and per-part-of-speech counts.
//!
//! # Invariants
//! - Auditing is read-only.

use crate::db::migrations::schema_version;
use crate::filter::policy::{ADJ_DECLENSION_TAGS, NOUN_ARTICLE_TAGS};
use crate::filter::{FormFilter, FormVerdict};
use crate::ingest::normalize::{is_comparative_gloss, FormCandidate};
use crate::model::tags::TagSet;
use crate::model::word::{PartOfSpeech, TagId, WordId};
use crate::store::read::parse_tag_key;
use crate::store::{StoreError, StoreResult};
use log::{info, warn};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub words: u64,
    /// Words without a base-form link.
    pub base_words: u64,
    pub definitions: u64,
    pub tags: u64,
    pub forms: u64,
    pub relations: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PosFormCount {
    pub pos: PartOfSpeech,
    pub forms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub schema_version: u32,
    pub counts: TableCounts,
    /// Forms whose word or tag does not exist.
    pub orphan_forms: u64,
    /// Tags referenced by no form.
    pub unused_tags: u64,
    /// Tag rows decoding to a set already held by another row.
    pub duplicate_tag_sets: u64,
    /// Inflections holding at least one non-comparative gloss.
    pub inflections_with_glosses: u64,
    pub noun_article_forms: u64,
    pub adjective_phrase_forms: u64,
    pub adjective_declension_forms: u64,
    /// Forms the universal filter stage would drop.
    pub removed_marker_forms: u64,
    /// Forms per part of speech, most frequent first.
    pub forms_by_pos: Vec<PosFormCount>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.violations() == 0
    }

    pub fn violations(&self) -> u64 {
        self.orphan_forms
            + self.unused_tags
            + self.duplicate_tag_sets
            + self.inflections_with_glosses
            + self.noun_article_forms
            + self.adjective_phrase_forms
            + self.adjective_declension_forms
            + self.removed_marker_forms
    }
}

/// Audits every guarantee against the store behind `conn`.
pub fn audit_store(conn: &Connection) -> StoreResult<AuditReport> {
    let mut report = AuditReport {
        schema_version: schema_version(conn)?,
        counts: table_counts(conn)?,
        orphan_forms: count(
            conn,
            "SELECT COUNT(*)
             FROM forms f
             LEFT JOIN words w ON w.id = f.word_id
             LEFT JOIN tags t ON t.id = f.tag_id
             WHERE w.id IS NULL OR t.id IS NULL;",
        )?,
        unused_tags: count(
            conn,
            "SELECT COUNT(*)
             FROM tags t
             WHERE NOT EXISTS (SELECT 1 FROM forms f WHERE f.tag_id = t.id);",
        )?,
        ..AuditReport::default()
    };

    let tag_map = load_tag_map(conn)?;
    let mut distinct = HashSet::new();
    report.duplicate_tag_sets = tag_map
        .values()
        .filter(|tags| !distinct.insert(*tags))
        .count() as u64;

    report.inflections_with_glosses = inflections_with_glosses(conn)?;
    audit_forms(conn, &tag_map, &mut report)?;

    if report.is_clean() {
        info!(
            "event=audit module=audit status=ok words={} forms={} tags={}",
            report.counts.words, report.counts.forms, report.counts.tags
        );
    } else {
        warn!(
            "event=audit module=audit status=violations violations={} orphan_forms={} unused_tags={} duplicate_tag_sets={}",
            report.violations(),
            report.orphan_forms,
            report.unused_tags,
            report.duplicate_tag_sets
        );
    }
    Ok(report)
}

fn table_counts(conn: &Connection) -> StoreResult<TableCounts> {
    Ok(TableCounts {
        words: count(conn, "SELECT COUNT(*) FROM words;")?,
        base_words: count(conn, "SELECT COUNT(*) FROM words WHERE base_form IS NULL;")?,
        definitions: count(conn, "SELECT COUNT(*) FROM definitions;")?,
        tags: count(conn, "SELECT COUNT(*) FROM tags;")?,
        forms: count(conn, "SELECT COUNT(*) FROM forms;")?,
        relations: count(conn, "SELECT COUNT(*) FROM relations;")?,
    })
}

fn count(conn: &Connection, sql: &str) -> StoreResult<u64> {
    let value: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(value as u64)
}

fn load_tag_map(conn: &Connection) -> StoreResult<HashMap<TagId, TagSet>> {
    let mut stmt = conn.prepare("SELECT id, tags FROM tags;")?;
    let mut rows = stmt.query([])?;
    let mut tags = HashMap::new();
    while let Some(row) = rows.next()? {
        let key: String = row.get(1)?;
        tags.insert(row.get(0)?, parse_tag_key(&key)?);
    }
    Ok(tags)
}

fn inflections_with_glosses(conn: &Connection) -> StoreResult<u64> {
    let mut stmt = conn.prepare(
        "SELECT d.word_id, d.definition
         FROM definitions d
         INNER JOIN words w ON w.id = d.word_id
         WHERE w.base_form IS NOT NULL;",
    )?;
    let mut rows = stmt.query([])?;
    let mut offenders: BTreeSet<WordId> = BTreeSet::new();
    while let Some(row) = rows.next()? {
        let definition: String = row.get(1)?;
        if !is_comparative_gloss(&definition) {
            offenders.insert(row.get(0)?);
        }
    }
    Ok(offenders.len() as u64)
}

fn audit_forms(
    conn: &Connection,
    tag_map: &HashMap<TagId, TagSet>,
    report: &mut AuditReport,
) -> StoreResult<()> {
    let universal = FormFilter::default();
    let mut by_pos: BTreeMap<PartOfSpeech, u64> = BTreeMap::new();
    let mut stmt = conn.prepare(
        "SELECT w.pos, f.form, f.tag_id
         FROM forms f
         INNER JOIN words w ON w.id = f.word_id;",
    )?;
    let mut rows = stmt.query([])?;

    while let Some(row) = rows.next()? {
        let pos_text: String = row.get(0)?;
        let pos = PartOfSpeech::parse(&pos_text).ok_or_else(|| {
            StoreError::InvalidData(format!("invalid part of speech `{pos_text}` in words.pos"))
        })?;
        let text: String = row.get(1)?;
        let tag_id: TagId = row.get(2)?;
        *by_pos.entry(pos).or_default() += 1;

        // Orphaned tag ids are already counted by `orphan_forms`.
        let Some(tags) = tag_map.get(&tag_id) else {
            continue;
        };

        match pos {
            PartOfSpeech::Noun if tags.contains_any(NOUN_ARTICLE_TAGS) => {
                report.noun_article_forms += 1;
            }
            PartOfSpeech::Adj => {
                if text.contains(' ') {
                    report.adjective_phrase_forms += 1;
                }
                if tags.contains_any(ADJ_DECLENSION_TAGS) {
                    report.adjective_declension_forms += 1;
                }
            }
            _ => {}
        }

        let candidate = FormCandidate {
            text,
            tags: tags.as_slice().to_vec(),
        };
        if let FormVerdict::Drop { .. } = universal.evaluate(PartOfSpeech::Other, &candidate) {
            report.removed_marker_forms += 1;
        }
    }

    let mut forms_by_pos: Vec<PosFormCount> = by_pos
        .into_iter()
        .map(|(pos, forms)| PosFormCount { pos, forms })
        .collect();
    forms_by_pos.sort_by(|left, right| right.forms.cmp(&left.forms).then(left.pos.cmp(&right.pos)));
    report.forms_by_pos = forms_by_pos;
    Ok(())
}
