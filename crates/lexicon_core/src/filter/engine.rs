//! Rule engine evaluating a [`PolicyTable`] against candidate forms.

use super::policy::{Action, PolicyTable, Rule};
use crate::ingest::normalize::FormCandidate;
use crate::model::tags::TagSet;
use crate::model::word::PartOfSpeech;

/// A form that survived filtering, with its canonical tag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredForm {
    pub text: String,
    pub tags: TagSet,
}

/// Outcome of filtering one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormVerdict {
    Keep(FilteredForm),
    /// `rule` names the rule that removed the form.
    Drop { rule: &'static str },
}

impl FormVerdict {
    pub fn kept(self) -> Option<FilteredForm> {
        match self {
            Self::Keep(form) => Some(form),
            Self::Drop { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormFilter {
    table: PolicyTable,
}

impl FormFilter {
    pub fn new(table: PolicyTable) -> Self {
        Self { table }
    }

    /// Runs the universal stage, then the stage for `pos`.
    pub fn evaluate(&self, pos: PartOfSpeech, candidate: &FormCandidate) -> FormVerdict {
        let text = candidate.text.as_str();
        let mut tags = TagSet::canonical(candidate.tags.iter().map(String::as_str));

        for stage in [self.table.universal, self.table.rules_for(pos)] {
            if let Err(rule) = run_stage(stage, text, &mut tags) {
                return FormVerdict::Drop { rule };
            }
        }

        FormVerdict::Keep(FilteredForm {
            text: candidate.text.clone(),
            tags,
        })
    }

    /// Filters every candidate of one record, keeping document order.
    pub fn filter_all<'a>(
        &'a self,
        pos: PartOfSpeech,
        candidates: &'a [FormCandidate],
    ) -> impl Iterator<Item = FormVerdict> + 'a {
        candidates
            .iter()
            .map(move |candidate| self.evaluate(pos, candidate))
    }
}

/// Evaluates one stage in order. Returns the name of the dropping rule when
/// the form must go.
fn run_stage(rules: &[Rule], text: &str, tags: &mut TagSet) -> Result<(), &'static str> {
    let mut pending_reject: Option<&'static str> = None;

    for rule in rules {
        if !rule.applies(text, tags) {
            continue;
        }
        match rule.action {
            Action::Drop => return Err(rule.name),
            Action::Reject => {
                pending_reject.get_or_insert(rule.name);
            }
            Action::Rescue => pending_reject = None,
            Action::StripTags(stripped) => tags.strip(stripped),
        }
    }

    match pending_reject {
        Some(rule) => Err(rule),
        None => Ok(()),
    }
}
