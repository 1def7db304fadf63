//! Declarative filtering rules.

use crate::model::tags::TagSet;
use crate::model::word::PartOfSpeech;

/// Tags describing inflection-table layout rather than grammar.
pub const METADATA_TAGS: &[&str] = &["inflection-template", "table-tags"];

/// Rare or compound constructions excluded from the store.
pub const REMOVAL_TAGS: &[&str] = &[
    "future-i",
    "future-ii",
    "perfect",
    "pluperfect",
    "subjunctive-i",
    "rare",
    "archaic",
    "obsolete",
    "proscribed",
    "nonstandard",
    "subordinate-clause",
    "multiword-construction",
    "future",
];

pub const RESCUE_TAGS: &[&str] = &["subjunctive-ii"];

/// Markers that keep a `subjunctive-ii` form rejected.
pub const RESCUE_BLOCKERS: &[&str] = &["multiword-construction", "future", "future-ii"];

pub const NOUN_DROP_TAGS: &[&str] = &["diminutive"];

pub const NOUN_ARTICLE_TAGS: &[&str] = &["definite", "indefinite"];

pub const ADJ_DECLENSION_TAGS: &[&str] = &[
    "strong",
    "weak",
    "mixed",
    "includes-article",
    "without-article",
    "definite",
    "indefinite",
];

/// Predicate over one candidate form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The tag set intersects the listed tags.
    AnyTag(&'static [&'static str]),
    /// The form text contains the character.
    TextContains(char),
}

impl Condition {
    pub fn matches(&self, text: &str, tags: &TagSet) -> bool {
        match self {
            Self::AnyTag(listed) => tags.contains_any(listed),
            Self::TextContains(needle) => text.contains(*needle),
        }
    }
}

/// Effect of a matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Drop the form immediately. Nothing can reinstate it.
    Drop,
    /// Mark the form rejected; a later `Rescue` in the same stage may undo it.
    Reject,
    /// Undo a pending `Reject`.
    Rescue,
    /// Remove the listed tags and continue.
    StripTags(&'static [&'static str]),
}

/// One `{predicate, action}` entry of a policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Stable identifier used in run reports and logs.
    pub name: &'static str,
    pub when: Condition,
    /// Suppresses the rule when this condition also matches.
    pub unless: Option<Condition>,
    pub action: Action,
}

impl Rule {
    pub fn applies(&self, text: &str, tags: &TagSet) -> bool {
        self.when.matches(text, tags)
            && !self
                .unless
                .is_some_and(|condition| condition.matches(text, tags))
    }
}

pub const UNIVERSAL_RULES: &[Rule] = &[
    Rule {
        name: "metadata",
        when: Condition::AnyTag(METADATA_TAGS),
        unless: None,
        action: Action::Drop,
    },
    Rule {
        name: "removal_set",
        when: Condition::AnyTag(REMOVAL_TAGS),
        unless: None,
        action: Action::Reject,
    },
    Rule {
        name: "subjunctive_ii_rescue",
        when: Condition::AnyTag(RESCUE_TAGS),
        unless: Some(Condition::AnyTag(RESCUE_BLOCKERS)),
        action: Action::Rescue,
    },
];

pub const NOUN_RULES: &[Rule] = &[
    Rule {
        name: "noun_diminutive",
        when: Condition::AnyTag(NOUN_DROP_TAGS),
        unless: None,
        action: Action::Drop,
    },
    Rule {
        name: "noun_article",
        when: Condition::AnyTag(NOUN_ARTICLE_TAGS),
        unless: None,
        action: Action::StripTags(NOUN_ARTICLE_TAGS),
    },
];

pub const ADJ_RULES: &[Rule] = &[
    Rule {
        name: "adj_phrase",
        when: Condition::TextContains(' '),
        unless: None,
        action: Action::Drop,
    },
    Rule {
        name: "adj_declension",
        when: Condition::AnyTag(ADJ_DECLENSION_TAGS),
        unless: None,
        action: Action::StripTags(ADJ_DECLENSION_TAGS),
    },
];

/// Complete filtering policy: one universal stage, then one stage chosen by
/// part of speech.
#[derive(Debug, Clone, Copy)]
pub struct PolicyTable {
    pub universal: &'static [Rule],
    pub noun: &'static [Rule],
    pub adj: &'static [Rule],
}

impl PolicyTable {
    pub const fn standard() -> Self {
        Self {
            universal: UNIVERSAL_RULES,
            noun: NOUN_RULES,
            adj: ADJ_RULES,
        }
    }

    /// Part-of-speech stage. Classes without their own table keep forms as-is.
    pub fn rules_for(&self, pos: PartOfSpeech) -> &'static [Rule] {
        match pos {
            PartOfSpeech::Noun => self.noun,
            PartOfSpeech::Adj => self.adj,
            _ => &[],
        }
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}
