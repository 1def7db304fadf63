//! Row decoding shared by read-side modules.
//!
//! Read paths reject invalid persisted values instead of masking them.

use super::{StoreError, StoreResult};
use crate::model::tags::TagSet;
use crate::model::word::{Gender, PartOfSpeech, RelationType, StoredWord};
use rusqlite::Row;

pub const WORD_SELECT_SQL: &str = "SELECT
    id,
    word,
    pos,
    gender,
    ipa,
    base_form
FROM words";

pub fn parse_word_row(row: &Row<'_>) -> StoreResult<StoredWord> {
    let pos_text: String = row.get("pos")?;
    let pos = PartOfSpeech::parse(&pos_text).ok_or_else(|| {
        StoreError::InvalidData(format!("invalid part of speech `{pos_text}` in words.pos"))
    })?;

    let gender = match row.get::<_, Option<String>>("gender")? {
        Some(code) => Some(Gender::parse(&code).ok_or_else(|| {
            StoreError::InvalidData(format!("invalid gender `{code}` in words.gender"))
        })?),
        None => None,
    };

    Ok(StoredWord {
        id: row.get("id")?,
        text: row.get("word")?,
        pos,
        gender,
        phonetic: row.get("ipa")?,
        base_form: row.get("base_form")?,
    })
}

pub fn parse_relation_type(value: &str) -> StoreResult<RelationType> {
    RelationType::parse(value).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid relation type `{value}` in relations.relation_type"
        ))
    })
}

pub fn parse_tag_key(key: &str) -> StoreResult<TagSet> {
    TagSet::from_key(key)
        .map_err(|err| StoreError::InvalidData(format!("invalid tag key `{key}` in tags.tags: {err}")))
}
