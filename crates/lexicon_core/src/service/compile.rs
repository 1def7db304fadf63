//! Compilation of a raw JSONL dump into a relational lexicon store.
//!
//! # Responsibility
//! - Drive records through normalization, form filtering, tag interning and
//!   per-word deduplication into a [`LexiconWriter`].
//! - Checkpoint writes in batches and create lookup indexes at the end.
//! - Report what was written, skipped and filtered.
//!
//! # Invariants
//! - Single pass, one record fully written before the next is read.
//! - Malformed lines and skipped records never abort a run.
//! - Any I/O or store failure aborts the run; the partial store is invalid.

use crate::db::{create_fresh_db, same_file};
use crate::filter::{FormFilter, FormVerdict, PolicyTable};
use crate::ingest::normalize::{normalize_record, LexemeEntry};
use crate::ingest::reader::{RecordLine, RecordReader};
use crate::intern::{DedupGuard, TagInterner};
use crate::store::{
    create_lookup_indexes, LexiconWriter, SqliteLexiconWriter, StoreError, StoreResult,
};
use log::{debug, error, info, trace};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

const DEFAULT_BATCH_SIZE: usize = 1000;

/// Tunables of one compilation run.
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    /// Words written between two durability checkpoints. `0` acts as `1`.
    pub batch_size: usize,
    /// Stop after this many non-blank input lines.
    pub limit: Option<usize>,
    pub policy: PolicyTable,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            limit: None,
            policy: PolicyTable::standard(),
        }
    }
}

/// Summary of one compilation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileReport {
    pub run_id: Uuid,
    /// Non-blank input lines consumed.
    pub lines_read: u64,
    pub malformed_lines: u64,
    /// Skipped records by reason.
    pub skipped: BTreeMap<String, u64>,
    pub words: u64,
    /// Words written with a base-form link.
    pub inflections: u64,
    pub definitions: u64,
    pub relations: u64,
    pub forms: u64,
    /// Forms removed by policy, keyed by rule name.
    pub forms_rejected: BTreeMap<String, u64>,
    pub forms_deduplicated: u64,
    pub tags: u64,
    pub tag_conflicts: u64,
    pub duration_ms: u64,
}

impl CompileReport {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            lines_read: 0,
            malformed_lines: 0,
            skipped: BTreeMap::new(),
            words: 0,
            inflections: 0,
            definitions: 0,
            relations: 0,
            forms: 0,
            forms_rejected: BTreeMap::new(),
            forms_deduplicated: 0,
            tags: 0,
            tag_conflicts: 0,
            duration_ms: 0,
        }
    }

    pub fn skipped_total(&self) -> u64 {
        self.skipped.values().sum()
    }

    pub fn forms_rejected_total(&self) -> u64 {
        self.forms_rejected.values().sum()
    }
}

/// Fatal compilation failure.
///
/// `Io` and `Store` carry the number of input records fully processed
/// before the failure.
#[derive(Debug)]
pub enum CompileError {
    /// Output path resolves to the input dump.
    OutputIsInput(PathBuf),
    Io {
        records_processed: u64,
        source: io::Error,
    },
    Store {
        records_processed: u64,
        source: StoreError,
    },
}

impl CompileError {
    pub fn records_processed(&self) -> u64 {
        match self {
            Self::OutputIsInput(_) => 0,
            Self::Io {
                records_processed, ..
            }
            | Self::Store {
                records_processed, ..
            } => *records_processed,
        }
    }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutputIsInput(path) => write!(
                f,
                "output store {} is the input dump; refusing to overwrite it",
                path.display()
            ),
            Self::Io {
                records_processed,
                source,
            } => write!(
                f,
                "compilation aborted after {records_processed} records: input error: {source}"
            ),
            Self::Store {
                records_processed,
                source,
            } => write!(
                f,
                "compilation aborted after {records_processed} records: store error: {source}"
            ),
        }
    }
}

impl Error for CompileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OutputIsInput(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Store { source, .. } => Some(source),
        }
    }
}

/// Compiles the JSONL file at `input` into a fresh store at `output`.
///
/// An existing store at `output` is replaced, unless it is `input` itself.
pub fn compile_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &CompileOptions,
) -> Result<CompileReport, CompileError> {
    let file = File::open(input.as_ref()).map_err(|source| CompileError::Io {
        records_processed: 0,
        source,
    })?;
    if same_file(input.as_ref(), output.as_ref()) {
        return Err(CompileError::OutputIsInput(output.as_ref().to_path_buf()));
    }
    let conn = create_fresh_db(output.as_ref()).map_err(|err| CompileError::Store {
        records_processed: 0,
        source: err.into(),
    })?;
    compile_into(&conn, BufReader::new(file), options)
}

/// Compiles `input` into a migrated, empty store and indexes it.
pub fn compile_into<R: BufRead>(
    conn: &Connection,
    input: R,
    options: &CompileOptions,
) -> Result<CompileReport, CompileError> {
    let mut writer = SqliteLexiconWriter::new(conn);
    let report = compile_records(input, &mut writer, options)?;
    let lines_read = report.lines_read;
    let store_failure = |source: StoreError| CompileError::Store {
        records_processed: lines_read,
        source,
    };

    writer.finish().map_err(store_failure)?;
    create_lookup_indexes(conn).map_err(|err| store_failure(err.into()))?;
    Ok(report)
}

/// Runs the record pipeline against any writer.
///
/// The final batch is checkpointed; index creation is left to the caller.
pub fn compile_records<R: BufRead, W: LexiconWriter>(
    input: R,
    writer: &mut W,
    options: &CompileOptions,
) -> Result<CompileReport, CompileError> {
    let started_at = Instant::now();
    let mut run = CompileRun::new(writer, options);
    info!(
        "event=compile_start module=compile status=start run_id={} batch_size={} limit={:?}",
        run.report.run_id, run.batch_size, options.limit
    );

    match run.consume(input) {
        Ok(()) => {
            run.report.duration_ms = started_at.elapsed().as_millis() as u64;
            let report = run.into_report();
            info!(
                "event=compile_finish module=compile status=ok run_id={} lines={} words={} forms={} tags={} skipped={} malformed={} duration_ms={}",
                report.run_id,
                report.lines_read,
                report.words,
                report.forms,
                report.tags,
                report.skipped_total(),
                report.malformed_lines,
                report.duration_ms
            );
            Ok(report)
        }
        Err(err) => {
            error!(
                "event=compile_finish module=compile status=error run_id={} records_processed={} duration_ms={} error={}",
                run.report.run_id,
                err.records_processed(),
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Mutable state of one run. Owned here and threaded through every step.
struct CompileRun<'w, W: LexiconWriter> {
    writer: &'w mut W,
    interner: TagInterner,
    filter: FormFilter,
    batch_size: usize,
    limit: Option<usize>,
    since_checkpoint: usize,
    report: CompileReport,
}

impl<'w, W: LexiconWriter> CompileRun<'w, W> {
    fn new(writer: &'w mut W, options: &CompileOptions) -> Self {
        Self {
            writer,
            interner: TagInterner::new(),
            filter: FormFilter::new(options.policy),
            batch_size: options.batch_size.max(1),
            limit: options.limit,
            since_checkpoint: 0,
            report: CompileReport::new(Uuid::new_v4()),
        }
    }

    fn consume<R: BufRead>(&mut self, input: R) -> Result<(), CompileError> {
        for line in RecordReader::new(input) {
            if self
                .limit
                .is_some_and(|limit| self.report.lines_read >= limit as u64)
            {
                debug!(
                    "event=compile_limit module=compile status=ok run_id={} limit={}",
                    self.report.run_id, self.report.lines_read
                );
                break;
            }

            let (line_no, line) = line.map_err(|source| CompileError::Io {
                records_processed: self.report.lines_read,
                source,
            })?;
            self.process(line_no, line)
                .map_err(|source| self.store_error(source))?;
            self.report.lines_read += 1;
        }

        self.writer
            .checkpoint()
            .map_err(|source| self.store_error(source))
    }

    fn process(&mut self, line_no: u64, line: RecordLine) -> StoreResult<()> {
        let record = match line {
            RecordLine::Parsed(record) => record,
            RecordLine::Malformed(err) => {
                self.report.malformed_lines += 1;
                debug!(
                    "event=record_malformed module=compile status=skipped line={line_no} error={err}"
                );
                return Ok(());
            }
        };

        match normalize_record(record) {
            Ok(entry) => self.write_entry(entry),
            Err(reason) => {
                trace!(
                    "event=record_skipped module=compile status=skipped line={line_no} reason={reason}"
                );
                *self.report.skipped.entry(reason.to_string()).or_default() += 1;
                Ok(())
            }
        }
    }

    fn write_entry(&mut self, entry: LexemeEntry) -> StoreResult<()> {
        let word_id = self.writer.insert_word(&entry.word)?;
        self.writer.insert_definitions(word_id, &entry.definitions)?;
        self.writer.insert_relations(word_id, &entry.relations)?;
        if entry.word.is_inflection() {
            self.report.inflections += 1;
        }

        let filter = self.filter;
        let mut guard = DedupGuard::new();
        for verdict in filter.filter_all(entry.word.pos, &entry.forms) {
            let form = match verdict {
                FormVerdict::Keep(form) => form,
                FormVerdict::Drop { rule } => {
                    *self.report.forms_rejected.entry(rule.to_string()).or_default() += 1;
                    continue;
                }
            };

            let key = form.tags.key();
            if !guard.admit(&form.text, &key) {
                self.report.forms_deduplicated += 1;
                continue;
            }
            let tag_id = self.interner.intern_key(self.writer, key)?;
            self.writer.insert_form(word_id, &form.text, tag_id)?;
        }

        self.since_checkpoint += 1;
        if self.since_checkpoint >= self.batch_size {
            self.writer.checkpoint()?;
            self.since_checkpoint = 0;
            let counts = self.writer.counts();
            info!(
                "event=compile_progress module=compile status=running run_id={} lines={} words={} forms={} tags={}",
                self.report.run_id,
                self.report.lines_read,
                counts.words,
                counts.forms,
                counts.tags
            );
        }
        Ok(())
    }

    fn store_error(&self, source: StoreError) -> CompileError {
        CompileError::Store {
            records_processed: self.report.lines_read,
            source,
        }
    }

    fn into_report(self) -> CompileReport {
        let counts = self.writer.counts();
        CompileReport {
            words: counts.words,
            definitions: counts.definitions,
            relations: counts.relations,
            forms: counts.forms,
            tags: counts.tags,
            tag_conflicts: self.interner.conflicts(),
            ..self.report
        }
    }
}
