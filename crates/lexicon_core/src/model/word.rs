//! Word, relation and closed-vocabulary types.

use serde::{Deserialize, Serialize};

/// Surrogate key of a `words` row, assigned at insertion and never reused.
pub type WordId = i64;

/// Interned identity of one canonical tag set.
pub type TagId = i64;

/// Closed part-of-speech vocabulary of the compiled store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adj,
    Adv,
    Prep,
    Conj,
    Pron,
    Det,
    Particle,
    /// Any raw part of speech outside the closed set.
    Other,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 10] = [
        Self::Noun,
        Self::Verb,
        Self::Adj,
        Self::Adv,
        Self::Prep,
        Self::Conj,
        Self::Pron,
        Self::Det,
        Self::Particle,
        Self::Other,
    ];

    /// Maps a raw dump value onto the closed set. Unknown values become `Other`.
    pub fn from_raw(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::Other)
    }

    /// Strict decoding of a stored `words.pos` value.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|pos| pos.as_str() == value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adj => "adj",
            Self::Adv => "adv",
            Self::Prep => "prep",
            Self::Conj => "conj",
            Self::Pron => "pron",
            Self::Det => "det",
            Self::Particle => "particle",
            Self::Other => "other",
        }
    }
}

/// Grammatical gender. Only ever set on nouns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "m")]
    Masculine,
    #[serde(rename = "f")]
    Feminine,
    #[serde(rename = "n")]
    Neuter,
}

impl Gender {
    /// Recognizes the sense-level tag spelling (`masculine`, ...).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "masculine" => Some(Self::Masculine),
            "feminine" => Some(Self::Feminine),
            "neuter" => Some(Self::Neuter),
            _ => None,
        }
    }

    /// Decodes the stored one-letter code.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "m" => Some(Self::Masculine),
            "f" => Some(Self::Feminine),
            "n" => Some(Self::Neuter),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Masculine => "m",
            Self::Feminine => "f",
            Self::Neuter => "n",
        }
    }
}

/// Kind of a soft cross-reference between headwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Synonym,
    Antonym,
    Related,
}

impl RelationType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "synonym" => Some(Self::Synonym),
            "antonym" => Some(Self::Antonym),
            "related" => Some(Self::Related),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Synonym => "synonym",
            Self::Antonym => "antonym",
            Self::Related => "related",
        }
    }
}

/// Relation to another headword by text. Never resolved to a `WordId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub kind: RelationType,
    pub related_word: String,
}

impl Relation {
    pub fn new(kind: RelationType, related_word: impl Into<String>) -> Self {
        Self {
            kind,
            related_word: related_word.into(),
        }
    }
}

/// Word row as produced by the normalizer, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWord {
    pub text: String,
    pub pos: PartOfSpeech,
    /// `None` for every non-noun and for nouns without a gender tag.
    pub gender: Option<Gender>,
    /// Empty when the record carries no transcription.
    pub phonetic: String,
    /// Present iff the record is an inflection of another headword.
    pub base_form: Option<String>,
}

impl NewWord {
    pub fn is_inflection(&self) -> bool {
        self.base_form.is_some()
    }
}

/// Persisted `words` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredWord {
    pub id: WordId,
    pub text: String,
    pub pos: PartOfSpeech,
    pub gender: Option<Gender>,
    pub phonetic: String,
    pub base_form: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Gender, PartOfSpeech, RelationType};

    #[test]
    fn unknown_raw_pos_maps_to_other() {
        assert_eq!(PartOfSpeech::from_raw("adj"), PartOfSpeech::Adj);
        assert_eq!(PartOfSpeech::from_raw("intj"), PartOfSpeech::Other);
        assert_eq!(PartOfSpeech::parse("intj"), None);
    }

    #[test]
    fn stored_codes_roundtrip() {
        for pos in PartOfSpeech::ALL {
            assert_eq!(PartOfSpeech::parse(pos.as_str()), Some(pos));
        }
        assert_eq!(Gender::parse(Gender::Neuter.code()), Some(Gender::Neuter));
        assert_eq!(Gender::from_tag("feminine"), Some(Gender::Feminine));
        assert_eq!(Gender::from_tag("plural"), None);
        assert_eq!(RelationType::parse("antonym"), Some(RelationType::Antonym));
    }
}
