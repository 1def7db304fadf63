//! `audit`: verify a store and print its statistics.

use std::path::PathBuf;

use clap::Parser;
use lexicon_core::{audit_store, open_db, DbError, StoreError};

#[derive(Parser, Debug)]
pub struct Args {
    /// Store to verify.
    #[arg(short, long)]
    db: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("store not found: {}", .0.display())]
    MissingStore(PathBuf),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("audit found {0} violations")]
    Violations(u64),
}

pub fn run(args: Args) -> Result<(), AuditError> {
    if !args.db.is_file() {
        return Err(AuditError::MissingStore(args.db));
    }
    let conn = open_db(&args.db)?;
    let report = audit_store(&conn)?;

    let counts = &report.counts;
    println!("schema_version={}", report.schema_version);
    println!("words={}", counts.words);
    println!("base_words={}", counts.base_words);
    println!("inflections={}", counts.words - counts.base_words);
    println!("definitions={}", counts.definitions);
    println!("tags={}", counts.tags);
    println!("forms={}", counts.forms);
    println!("relations={}", counts.relations);
    for entry in &report.forms_by_pos {
        println!("forms.{}={}", entry.pos.as_str(), entry.forms);
    }
    println!("orphan_forms={}", report.orphan_forms);
    println!("unused_tags={}", report.unused_tags);
    println!("duplicate_tag_sets={}", report.duplicate_tag_sets);
    println!("inflections_with_glosses={}", report.inflections_with_glosses);
    println!("noun_article_forms={}", report.noun_article_forms);
    println!("adjective_phrase_forms={}", report.adjective_phrase_forms);
    println!("adjective_declension_forms={}", report.adjective_declension_forms);
    println!("removed_marker_forms={}", report.removed_marker_forms);

    if report.is_clean() {
        println!("status=clean");
        Ok(())
    } else {
        println!("status=violations");
        Err(AuditError::Violations(report.violations()))
    }
}
