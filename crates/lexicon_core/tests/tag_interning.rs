use lexicon_core::db::open_db_in_memory;
use lexicon_core::intern::TagInterner;
use lexicon_core::model::tags::TagSet;
use lexicon_core::store::{LexiconWriter, SqliteLexiconWriter, TagInsert};
use lexicon_core::{compile_into, CompileOptions};
use rusqlite::Connection;
use serde_json::json;

fn tag_rows(conn: &Connection) -> Vec<(i64, String)> {
    let mut stmt = conn.prepare("SELECT id, tags FROM tags ORDER BY id;").unwrap();
    stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn interner_reuses_ids_for_equal_sets() {
    let conn = open_db_in_memory().unwrap();
    let mut writer = SqliteLexiconWriter::new(&conn);
    let mut interner = TagInterner::new();

    let first = interner
        .intern(&mut writer, &TagSet::canonical(["plural", "genitive"]))
        .unwrap();
    let second = interner
        .intern(&mut writer, &TagSet::canonical(["genitive", "plural"]))
        .unwrap();
    let other = interner
        .intern(&mut writer, &TagSet::canonical(["singular"]))
        .unwrap();
    let counts = writer.finish().unwrap();

    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(interner.len(), 2);
    assert_eq!(counts.tags, 2);
    assert_eq!(
        tag_rows(&conn),
        vec![
            (first, r#"["genitive","plural"]"#.to_string()),
            (other, r#"["singular"]"#.to_string()),
        ]
    );
}

#[test]
fn writer_reports_conflict_for_existing_key() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO tags (tags) VALUES ('[\"dative\"]');", [])
        .unwrap();
    let mut writer = SqliteLexiconWriter::new(&conn);

    assert_eq!(writer.insert_tag(r#"["dative"]"#).unwrap(), TagInsert::Conflict);
    assert_eq!(writer.find_tag(r#"["dative"]"#).unwrap(), Some(1));
    assert_eq!(writer.find_tag(r#"["ablative"]"#).unwrap(), None);
    assert!(matches!(
        writer.insert_tag(r#"["ablative"]"#).unwrap(),
        TagInsert::Inserted(_)
    ));
}

#[test]
fn interner_falls_back_to_lookup_on_conflict() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO tags (tags) VALUES ('[\"nominative\",\"plural\"]');",
        [],
    )
    .unwrap();
    let mut writer = SqliteLexiconWriter::new(&conn);
    let mut interner = TagInterner::new();

    let id = interner
        .intern(&mut writer, &TagSet::canonical(["plural", "nominative"]))
        .unwrap();
    let again = interner
        .intern(&mut writer, &TagSet::canonical(["nominative", "plural"]))
        .unwrap();
    writer.finish().unwrap();

    assert_eq!(id, 1);
    assert_eq!(again, 1);
    assert_eq!(interner.conflicts(), 1);
    assert_eq!(tag_rows(&conn).len(), 1);
}

#[test]
fn compilation_recovers_from_preexisting_tag_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO tags (tags) VALUES ('[\"nominative\",\"plural\"]');",
        [],
    )
    .unwrap();
    let input = json!({
        "word": "Tisch",
        "pos": "noun",
        "senses": [{"glosses": ["table"]}],
        "forms": [
            {"form": "Tische", "tags": ["plural", "nominative"]},
            {"form": "Tisches", "tags": ["genitive", "singular"]}
        ]
    })
    .to_string();

    let report = compile_into(&conn, input.as_bytes(), &CompileOptions::default()).unwrap();

    assert_eq!(report.tag_conflicts, 1);
    assert_eq!(report.tags, 1);
    assert_eq!(report.forms, 2);
    let tag_id: i64 = conn
        .query_row("SELECT tag_id FROM forms WHERE form = 'Tische';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(tag_id, 1);
    assert_eq!(tag_rows(&conn).len(), 2);
}
