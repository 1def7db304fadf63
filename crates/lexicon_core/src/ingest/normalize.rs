//! Record normalization.
//!
//! # Responsibility
//! - Extract headword, part of speech, gender, phonetic transcription and
//!   base-form link from one raw record.
//! - Collect glosses and lexical relations for dictionary headwords.
//! - Decide whether a record is skipped entirely.
//!
//! # Invariants
//! - Inflections (records with a base-form link) carry no definitions and
//!   no relations.
//! - When any gloss is a comparative marker, only comparative glosses are
//!   kept.
//! - A record with neither definitions nor a base-form link is skipped.

use super::raw::{RawLink, RawRecord, RawSense};
use crate::model::word::{Gender, NewWord, PartOfSpeech, Relation, RelationType};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Raw part-of-speech value of proper names.
pub const PROPER_NAME_POS: &str = "name";

static COMPARATIVE_GLOSS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"comparative (degree|form) of").expect("valid comparative regex"));

/// Returns whether a gloss marks a comparative degree/form of another word.
pub fn is_comparative_gloss(gloss: &str) -> bool {
    COMPARATIVE_GLOSS_RE.is_match(gloss)
}

/// One unfiltered `(form, tags)` pair of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormCandidate {
    pub text: String,
    pub tags: Vec<String>,
}

/// Normalized content of one record, ready for filtering and persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexemeEntry {
    pub word: NewWord,
    /// Glosses in document order.
    pub definitions: Vec<String>,
    /// Set-deduplicated relations in first-seen order.
    pub relations: Vec<Relation>,
    /// Forms with non-empty text, in document order, not yet filtered.
    pub forms: Vec<FormCandidate>,
}

/// Why a record contributes nothing to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingHeadword,
    ProperName,
    /// Neither definitions nor a base-form link.
    NoContent,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingHeadword => "missing_headword",
            Self::ProperName => "proper_name",
            Self::NoContent => "no_content",
        }
    }
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalizes one raw record, or reports why it is skipped.
pub fn normalize_record(record: RawRecord) -> Result<LexemeEntry, SkipReason> {
    let RawRecord {
        word,
        pos,
        sounds,
        senses,
        forms,
    } = record;

    let text = match word {
        Some(text) if !text.is_empty() => text,
        _ => return Err(SkipReason::MissingHeadword),
    };

    let pos = match pos.as_deref() {
        Some(PROPER_NAME_POS) => return Err(SkipReason::ProperName),
        Some(raw) => PartOfSpeech::from_raw(raw),
        None => PartOfSpeech::Other,
    };

    let phonetic = sounds
        .iter()
        .find_map(|sound| sound.ipa.clone())
        .unwrap_or_default();

    let gender = if pos == PartOfSpeech::Noun {
        find_gender(&senses)
    } else {
        None
    };

    let base_form = find_base_form(&senses);

    let (definitions, relations) = if base_form.is_none() {
        (collect_definitions(&senses), collect_relations(&senses))
    } else {
        (Vec::new(), Vec::new())
    };

    if definitions.is_empty() && base_form.is_none() {
        return Err(SkipReason::NoContent);
    }

    let forms = forms
        .into_iter()
        .filter_map(|form| match form.form {
            Some(text) if !text.is_empty() => Some(FormCandidate {
                text,
                tags: form.tags,
            }),
            _ => None,
        })
        .collect();

    Ok(LexemeEntry {
        word: NewWord {
            text,
            pos,
            gender,
            phonetic,
            base_form,
        },
        definitions,
        relations,
        forms,
    })
}

fn find_gender(senses: &[RawSense]) -> Option<Gender> {
    senses
        .iter()
        .flat_map(|sense| sense.tags.iter())
        .find_map(|tag| Gender::from_tag(tag))
}

fn find_base_form(senses: &[RawSense]) -> Option<String> {
    senses
        .iter()
        .flat_map(|sense| sense.form_of.iter())
        .find_map(RawLink::word)
        .map(str::to_string)
}

fn collect_definitions(senses: &[RawSense]) -> Vec<String> {
    let glosses: Vec<String> = senses
        .iter()
        .flat_map(|sense| sense.glosses.iter().cloned())
        .collect();

    if glosses.iter().any(|gloss| is_comparative_gloss(gloss)) {
        return glosses
            .into_iter()
            .filter(|gloss| is_comparative_gloss(gloss))
            .collect();
    }
    glosses
}

fn collect_relations(senses: &[RawSense]) -> Vec<Relation> {
    let mut seen: HashSet<(RelationType, &str)> = HashSet::new();
    let mut relations = Vec::new();

    for sense in senses {
        let groups = [
            (RelationType::Synonym, &sense.synonyms),
            (RelationType::Antonym, &sense.antonyms),
            (RelationType::Related, &sense.related),
        ];
        for (kind, links) in groups {
            for word in links.iter().filter_map(RawLink::word) {
                if seen.insert((kind, word)) {
                    relations.push(Relation::new(kind, word));
                }
            }
        }
    }

    relations
}
