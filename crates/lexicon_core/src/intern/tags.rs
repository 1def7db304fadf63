//! Tag-set interning.
//!
//! # Invariants
//! - One canonical key maps to exactly one tag id for the lifetime of a run.
//! - A key already present in the store (insert conflict) is resolved by
//!   lookup and cached; it is never surfaced as an error.

use crate::model::tags::TagSet;
use crate::model::word::TagId;
use crate::store::{LexiconWriter, StoreError, StoreResult, TagInsert};
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct TagInterner {
    cache: HashMap<String, TagId>,
    conflicts: u64,
}

impl TagInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `tags`, persisting a new tag row on first sight.
    pub fn intern<W: LexiconWriter + ?Sized>(
        &mut self,
        writer: &mut W,
        tags: &TagSet,
    ) -> StoreResult<TagId> {
        self.intern_key(writer, tags.key())
    }

    pub fn intern_key<W: LexiconWriter + ?Sized>(
        &mut self,
        writer: &mut W,
        key: String,
    ) -> StoreResult<TagId> {
        if let Some(id) = self.cache.get(&key) {
            return Ok(*id);
        }

        let id = match writer.insert_tag(&key)? {
            TagInsert::Inserted(id) => id,
            TagInsert::Conflict => {
                self.conflicts += 1;
                debug!("event=tag_conflict module=intern status=recovered key={key}");
                writer.find_tag(&key)?.ok_or_else(|| {
                    StoreError::InvalidData(format!(
                        "tag key `{key}` conflicted on insert but cannot be found"
                    ))
                })?
            }
        };

        self.cache.insert(key, id);
        Ok(id)
    }

    /// Number of distinct tag sets seen by this interner.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Insert conflicts recovered through lookup.
    pub fn conflicts(&self) -> u64 {
        self.conflicts
    }
}

#[cfg(test)]
mod tests {
    use super::TagInterner;
    use crate::model::tags::TagSet;
    use crate::model::word::{NewWord, Relation, TagId, WordId};
    use crate::store::{LexiconWriter, StoreResult, TagInsert, WriteCounts};
    use std::collections::HashMap;

    /// In-memory writer whose tag table may be pre-seeded to simulate keys
    /// written outside the interner.
    #[derive(Default)]
    struct FakeWriter {
        tags: HashMap<String, TagId>,
        inserts: usize,
    }

    impl LexiconWriter for FakeWriter {
        fn insert_word(&mut self, _word: &NewWord) -> StoreResult<WordId> {
            Ok(1)
        }
        fn insert_definitions(&mut self, _: WordId, _: &[String]) -> StoreResult<()> {
            Ok(())
        }
        fn insert_relations(&mut self, _: WordId, _: &[Relation]) -> StoreResult<()> {
            Ok(())
        }
        fn insert_tag(&mut self, key: &str) -> StoreResult<TagInsert> {
            self.inserts += 1;
            if self.tags.contains_key(key) {
                return Ok(TagInsert::Conflict);
            }
            let id = self.tags.len() as TagId + 1;
            self.tags.insert(key.to_string(), id);
            Ok(TagInsert::Inserted(id))
        }
        fn find_tag(&self, key: &str) -> StoreResult<Option<TagId>> {
            Ok(self.tags.get(key).copied())
        }
        fn insert_form(&mut self, _: WordId, _: &str, _: TagId) -> StoreResult<()> {
            Ok(())
        }
        fn checkpoint(&mut self) -> StoreResult<()> {
            Ok(())
        }
        fn counts(&self) -> WriteCounts {
            WriteCounts::default()
        }
    }

    #[test]
    fn equal_sets_in_any_order_share_one_id() {
        let mut writer = FakeWriter::default();
        let mut interner = TagInterner::new();

        let first = interner
            .intern(&mut writer, &TagSet::canonical(["singular", "nominative"]))
            .unwrap();
        let second = interner
            .intern(&mut writer, &TagSet::canonical(["nominative", "singular"]))
            .unwrap();
        let other = interner
            .intern(&mut writer, &TagSet::canonical(["plural"]))
            .unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(interner.len(), 2);
        assert_eq!(writer.inserts, 2, "cache hits must not touch the store");
    }

    #[test]
    fn insert_conflict_falls_back_to_lookup_and_is_cached() {
        let mut writer = FakeWriter::default();
        let key = TagSet::canonical(["dative"]).key();
        writer.tags.insert(key.clone(), 41);
        let mut interner = TagInterner::new();

        let id = interner.intern_key(&mut writer, key.clone()).unwrap();
        assert_eq!(id, 41);
        assert_eq!(interner.conflicts(), 1);

        let again = interner.intern_key(&mut writer, key).unwrap();
        assert_eq!(again, 41);
        assert_eq!(writer.inserts, 1);
    }
}
