//! `inspect`: print what a store holds for one headword.

use std::path::PathBuf;

use clap::Parser;
use lexicon_core::lookup::lookup_inflections;
use lexicon_core::{lookup_entries, open_db, DbError, StoreError};

#[derive(Parser, Debug)]
pub struct Args {
    /// Store to read.
    #[arg(short, long)]
    db: PathBuf,

    /// Headword, matched case-insensitively.
    headword: String,

    /// Print entries as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("store not found: {}", .0.display())]
    MissingStore(PathBuf),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("cannot encode entries: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn run(args: Args) -> Result<(), InspectError> {
    if !args.db.is_file() {
        return Err(InspectError::MissingStore(args.db));
    }
    let conn = open_db(&args.db)?;
    let entries = lookup_entries(&conn, &args.headword)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("headword={} entries={}", args.headword, entries.len());
    for entry in &entries {
        let word = &entry.word;
        println!();
        println!("id={} word={} pos={}", word.id, word.text, word.pos.as_str());
        if let Some(gender) = word.gender {
            println!("gender={}", gender.code());
        }
        if !word.phonetic.is_empty() {
            println!("ipa={}", word.phonetic);
        }
        match &word.base_form {
            Some(base) => println!("base_form={base}"),
            None => {
                for inflection in lookup_inflections(&conn, &word.text)? {
                    println!("inflection={} pos={}", inflection.text, inflection.pos.as_str());
                }
            }
        }
        for definition in &entry.definitions {
            println!("definition={definition}");
        }
        for form in &entry.forms {
            println!("form={} tags={}", form.text, form.tags.join(","));
        }
        if entry.relations.is_empty() {
            println!("relations=none");
        }
        for synonym in &entry.relations.synonyms {
            println!("synonym={synonym}");
        }
        for antonym in &entry.relations.antonyms {
            println!("antonym={antonym}");
        }
        for related in &entry.relations.related {
            println!("related={related}");
        }
    }
    Ok(())
}
