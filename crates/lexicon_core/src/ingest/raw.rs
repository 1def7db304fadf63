//! Typed shape of one raw lexeme record.
//!
//! Every member is optional. Explicit `null` values are accepted wherever a
//! list or string is expected and read as absent. Unknown keys are ignored.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub pos: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sounds: Vec<RawSound>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub senses: Vec<RawSense>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub forms: Vec<RawForm>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSound {
    #[serde(default)]
    pub ipa: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSense {
    #[serde(default, deserialize_with = "null_as_default")]
    pub glosses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub form_of: Vec<RawLink>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub synonyms: Vec<RawLink>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub antonyms: Vec<RawLink>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub related: Vec<RawLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForm {
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

/// Reference to another headword inside a sense.
///
/// Dumps occasionally carry bare strings or other shapes in these lists;
/// those are kept as `Unrecognized` so the rest of the record still decodes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLink {
    Entry {
        #[serde(default)]
        word: Option<String>,
    },
    Unrecognized(serde_json::Value),
}

impl RawLink {
    /// Linked headword, if present and non-empty.
    pub fn word(&self) -> Option<&str> {
        match self {
            Self::Entry { word: Some(word) } if !word.is_empty() => Some(word.as_str()),
            _ => None,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
