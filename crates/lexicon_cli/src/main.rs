//! Command-line entry point of the lexicon compiler.
//!
//! # Responsibility
//! - Parse global flags and dispatch to one subcommand per pipeline stage.
//! - Print run summaries as `key=value` lines on stdout.
//! - Map every failure to a non-zero exit status.

mod audit;
mod build;
mod inspect;
mod lite;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;
use thiserror::Error;

use crate::{audit::AuditError, build::BuildError, inspect::InspectError, lite::LiteCommandError};

#[derive(Parser, Debug)]
#[command(name = "lexicon", version, about = "Compiles a raw dictionary dump into SQLite stores.")]
struct Cli {
    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Directory for rolling log files. Logging is off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compiles a JSONL dump into a full store.
    Build(build::Args),

    /// Derives the lite store from a full store.
    Lite(lite::Args),

    /// Prints the entries stored for a headword.
    Inspect(inspect::Args),

    /// Verifies a store and prints its statistics.
    Audit(audit::Args),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Build(_) => "build",
            Self::Lite(_) => "lite",
            Self::Inspect(_) => "inspect",
            Self::Audit(_) => "audit",
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("cannot resolve working directory: {0}")]
    WorkingDir(#[from] std::io::Error),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Lite(#[from] LiteCommandError),

    #[error(transparent)]
    Inspect(#[from] InspectError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    if let Some(log_dir) = &cli.log_dir {
        start_logging(cli.log_level.as_deref(), log_dir)?;
    }
    info!(
        "event=cli_command module=cli status=start command={} version={}",
        cli.command.name(),
        lexicon_core::core_version()
    );

    match cli.command {
        Command::Build(args) => Ok(build::run(args)?),
        Command::Lite(args) => Ok(lite::run(args)?),
        Command::Inspect(args) => Ok(inspect::run(args)?),
        Command::Audit(args) => Ok(audit::run(args)?),
    }
}

fn start_logging(level: Option<&str>, log_dir: &Path) -> Result<(), CliError> {
    let log_dir = if log_dir.is_absolute() {
        log_dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(log_dir)
    };
    let level = level.unwrap_or_else(|| lexicon_core::default_log_level());
    lexicon_core::init_logging(level, &log_dir.to_string_lossy()).map_err(CliError::Logging)
}
