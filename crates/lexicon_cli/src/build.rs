//! `build`: raw JSONL dump to full store.

use std::path::PathBuf;

use clap::Parser;
use lexicon_core::{compile_file, CompileError, CompileOptions};

#[derive(Parser, Debug)]
pub struct Args {
    /// JSONL dump, one headword record per line.
    #[arg(short, long)]
    input: PathBuf,

    /// Store file to create. An existing file is replaced.
    #[arg(short, long)]
    output: PathBuf,

    /// Words written between two commits.
    #[arg(long, default_value_t = 1000)]
    batch_size: usize,

    /// Stop after this many input lines.
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Compile(#[from] CompileError),
}

pub fn run(args: Args) -> Result<(), BuildError> {
    let options = CompileOptions {
        batch_size: args.batch_size,
        limit: args.limit,
        ..CompileOptions::default()
    };
    let report = compile_file(&args.input, &args.output, &options)?;

    println!("run_id={}", report.run_id);
    println!("lines_read={}", report.lines_read);
    println!("malformed_lines={}", report.malformed_lines);
    for (reason, count) in &report.skipped {
        println!("skipped.{reason}={count}");
    }
    println!("words={}", report.words);
    println!("inflections={}", report.inflections);
    println!("definitions={}", report.definitions);
    println!("relations={}", report.relations);
    println!("forms={}", report.forms);
    for (rule, count) in &report.forms_rejected {
        println!("forms_rejected.{rule}={count}");
    }
    println!("forms_deduplicated={}", report.forms_deduplicated);
    println!("tags={}", report.tags);
    println!("duration_ms={}", report.duration_ms);
    Ok(())
}
