//! Canonical grammatical tag sets.
//!
//! # Invariants
//! - A `TagSet` is always sorted lexicographically and free of duplicates,
//!   so equal sets in any input order produce the same storage key.
//! - The storage key is the JSON array encoding of the sorted list.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Builds the canonical (sorted, deduplicated) form of `tags`.
    pub fn canonical<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values: Vec<String> = tags.into_iter().map(Into::into).collect();
        values.sort();
        values.dedup();
        Self(values)
    }

    /// Decodes a storage key produced by [`TagSet::key`].
    ///
    /// The decoded list is re-canonicalized, so hand-written keys in any
    /// order compare equal to interned ones.
    pub fn from_key(key: &str) -> Result<Self, serde_json::Error> {
        let values: Vec<String> = serde_json::from_str(key)?;
        Ok(Self::canonical(values))
    }

    /// Storage key used for interning.
    pub fn key(&self) -> String {
        serde_json::to_string(&self.0).expect("string lists always encode as JSON")
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.binary_search_by(|probe| probe.as_str().cmp(tag)).is_ok()
    }

    pub fn contains_any(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| self.contains(tag))
    }

    /// Removes every tag listed in `tags`. Order is preserved, so the set
    /// stays canonical.
    pub fn strip(&mut self, tags: &[&str]) {
        self.0.retain(|tag| !tags.contains(&tag.as_str()));
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
