//! `lite`: full store to lite subset store.

use std::path::PathBuf;

use clap::Parser;
use lexicon_core::{build_lite_file, LiteError, LiteOptions};

#[derive(Parser, Debug)]
pub struct Args {
    /// Full store produced by `build`.
    #[arg(short, long)]
    source: PathBuf,

    /// Lite store file to create. An existing file is replaced.
    #[arg(short, long)]
    target: PathBuf,

    /// Longest noun headword, in characters, eligible for the lite store.
    #[arg(long, default_value_t = 10)]
    noun_max_chars: usize,

    /// Maximum number of short nouns kept.
    #[arg(long, default_value_t = 15_000)]
    noun_cap: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum LiteCommandError {
    #[error(transparent)]
    Lite(#[from] LiteError),

    #[error("--noun-max-chars must be at least 1")]
    InvalidNounLength,
}

pub fn run(args: Args) -> Result<(), LiteCommandError> {
    if args.noun_max_chars == 0 {
        return Err(LiteCommandError::InvalidNounLength);
    }
    let options = LiteOptions {
        noun_max_chars: args.noun_max_chars,
        noun_cap: args.noun_cap,
    };
    let report = build_lite_file(&args.source, &args.target, &options)?;

    println!("core_words={}", report.core_words);
    println!("closed_class_words={}", report.closed_class_words);
    println!("short_nouns={}", report.short_nouns);
    println!("base_selection={}", report.base_selection);
    println!("inflections_added={}", report.inflections_added);
    println!("words={}", report.words);
    println!("definitions={}", report.definitions);
    println!("tags={}", report.tags);
    println!("forms={}", report.forms);
    println!("relations={}", report.relations);
    println!("duration_ms={}", report.duration_ms);
    Ok(())
}
