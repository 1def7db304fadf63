use lexicon_core::db::migrations::{latest_version, schema_version};
use lexicon_core::db::{create_fresh_db, open_db, open_db_in_memory, same_file, DbError};
use rusqlite::Connection;

const LEXICON_TABLES: &[&str] = &["words", "definitions", "tags", "forms", "relations"];

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    for table in LEXICON_TABLES {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexicon.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first).unwrap(), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), latest_version());
    assert_table_exists(&conn_second, "words");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn create_fresh_db_discards_previous_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexicon.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO words (word, pos, ipa) VALUES ('Haus', 'noun', '');",
        [],
    )
    .unwrap();
    drop(conn);

    let conn = create_fresh_db(&path).unwrap();
    let words: i64 = conn
        .query_row("SELECT COUNT(*) FROM words;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(words, 0);
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
}

#[test]
fn schema_rejects_duplicate_tag_keys_and_unknown_gender() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO tags (tags) VALUES ('[\"plural\"]');", [])
        .unwrap();

    assert!(conn
        .execute("INSERT INTO tags (tags) VALUES ('[\"plural\"]');", [])
        .is_err());
    assert!(conn
        .execute(
            "INSERT INTO words (word, pos, gender, ipa) VALUES ('Haus', 'noun', 'x', '');",
            [],
        )
        .is_err());
}

#[test]
fn schema_enforces_form_references() {
    let conn = open_db_in_memory().unwrap();

    let err = conn
        .execute(
            "INSERT INTO forms (word_id, form, tag_id) VALUES (42, 'Häuser', 7);",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("FOREIGN KEY"));
}

#[test]
fn same_file_resolves_relative_segments_and_missing_targets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexicon.db");
    std::fs::write(&path, b"").unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();

    assert!(same_file(&path, dir.path().join("sub/../lexicon.db")));
    assert!(!same_file(&path, dir.path().join("lite.db")));

    let missing = dir.path().join("lite.db");
    assert!(same_file(&missing, dir.path().join("sub/../lite.db")));
    assert!(!same_file(&missing, dir.path().join("nowhere/lite.db")));
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
