//! Per-word `(form text, tag key)` uniqueness.

use std::collections::HashSet;

/// Tracks the forms already written for one word.
///
/// Tag stripping can collapse two distinct raw forms onto the same pair;
/// the second one is silently dropped.
#[derive(Debug, Default)]
pub struct DedupGuard {
    seen: HashSet<(String, String)>,
}

impl DedupGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time a pair is offered, `false` afterwards.
    pub fn admit(&mut self, text: &str, tag_key: &str) -> bool {
        self.seen.insert((text.to_string(), tag_key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
