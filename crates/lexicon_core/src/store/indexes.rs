//! Lookup indexes of compiled stores.
//!
//! Created once after all rows are written; bulk inserts run without them.

use crate::db::DbResult;
use log::info;
use rusqlite::Connection;
use std::time::Instant;

/// `(index name, table, column)` triples.
pub const LOOKUP_INDEXES: &[(&str, &str, &str)] = &[
    ("idx_word", "words", "word"),
    ("idx_base_form", "words", "base_form"),
    ("idx_def_word_id", "definitions", "word_id"),
    ("idx_forms_word_id", "forms", "word_id"),
    ("idx_forms_tag_id", "forms", "tag_id"),
    ("idx_relations_word_id", "relations", "word_id"),
];

/// Creates every lookup index. Safe to call on a store that already has them.
pub fn create_lookup_indexes(conn: &Connection) -> DbResult<()> {
    let started_at = Instant::now();
    let sql: String = LOOKUP_INDEXES
        .iter()
        .map(|(name, table, column)| {
            format!("CREATE INDEX IF NOT EXISTS {name} ON {table}({column});\n")
        })
        .collect();

    conn.execute_batch(&sql)?;
    info!(
        "event=index_create module=store status=ok count={} duration_ms={}",
        LOOKUP_INDEXES.len(),
        started_at.elapsed().as_millis()
    );
    Ok(())
}
