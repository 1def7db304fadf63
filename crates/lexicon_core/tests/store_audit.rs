use lexicon_core::db::migrations::latest_version;
use lexicon_core::db::open_db_in_memory;
use lexicon_core::{audit_store, compile_into, CompileOptions, PartOfSpeech};
use rusqlite::{params, Connection};
use serde_json::{json, Value};

fn store() -> Connection {
    let records = [
        json!({
            "word": "Mann",
            "pos": "noun",
            "senses": [{"glosses": ["man"], "tags": ["masculine"]}],
            "forms": [
                {"form": "Mann", "tags": ["nominative", "singular"]},
                {"form": "Männer", "tags": ["nominative", "plural"]},
                {"form": "des Mannes", "tags": ["genitive", "singular", "definite"]}
            ]
        }),
        json!({
            "word": "schön",
            "pos": "adj",
            "senses": [{"glosses": ["beautiful"]}],
            "forms": [
                {"form": "schöner", "tags": ["comparative"]},
                {"form": "die schöne", "tags": ["weak", "nominative", "feminine"]}
            ]
        }),
        json!({
            "word": "gehen",
            "pos": "verb",
            "senses": [{"glosses": ["to go"]}],
            "forms": [
                {"form": "ginge", "tags": ["subjunctive-ii", "rare"]},
                {"form": "ginget", "tags": ["subjunctive-ii", "future-ii"]}
            ]
        }),
        json!({
            "word": "schöner",
            "pos": "adj",
            "senses": [{"glosses": ["comparative degree of schön"], "form_of": [{"word": "schön"}]}]
        }),
    ];
    let input = records
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    let conn = open_db_in_memory().unwrap();
    compile_into(&conn, input.as_bytes(), &CompileOptions::default()).unwrap();
    conn
}

fn word_id(conn: &Connection, word: &str) -> i64 {
    conn.query_row("SELECT id FROM words WHERE word = ?1;", [word], |row| {
        row.get(0)
    })
    .unwrap()
}

fn insert_tag(conn: &Connection, key: &str) -> i64 {
    conn.execute("INSERT INTO tags (tags) VALUES (?1);", [key])
        .unwrap();
    conn.last_insert_rowid()
}

fn insert_form(conn: &Connection, word_id: i64, form: &str, tag_id: i64) {
    conn.execute(
        "INSERT INTO forms (word_id, form, tag_id) VALUES (?1, ?2, ?3);",
        params![word_id, form, tag_id],
    )
    .unwrap();
}

#[test]
fn compiled_store_is_clean() {
    let conn = store();

    let report = audit_store(&conn).unwrap();

    assert!(report.is_clean(), "{report:?}");
    assert_eq!(report.violations(), 0);
    assert_eq!(report.schema_version, latest_version());
    assert_eq!(report.counts.words, 4);
    assert_eq!(report.counts.base_words, 3);
    assert_eq!(report.counts.definitions, 3);
    assert_eq!(report.counts.forms, 5);
}

#[test]
fn forms_are_counted_per_part_of_speech_most_frequent_first() {
    let conn = store();

    let report = audit_store(&conn).unwrap();

    let by_pos: Vec<(PartOfSpeech, u64)> = report
        .forms_by_pos
        .iter()
        .map(|entry| (entry.pos, entry.forms))
        .collect();
    assert_eq!(
        by_pos,
        vec![
            (PartOfSpeech::Noun, 3),
            (PartOfSpeech::Verb, 1),
            (PartOfSpeech::Adj, 1),
        ]
    );
}

#[test]
fn injected_violations_are_reported() {
    let conn = store();
    let mann = word_id(&conn, "Mann");
    let schoen = word_id(&conn, "schön");
    let gehen = word_id(&conn, "gehen");

    let article = insert_tag(&conn, r#"["definite","nominative"]"#);
    insert_form(&conn, mann, "der Mann", article);
    insert_form(&conn, schoen, "die schöne", article);
    let rare = insert_tag(&conn, r#"["rare"]"#);
    insert_form(&conn, gehen, "gehet", rare);
    insert_tag(&conn, r#"["singular","nominative"]"#);
    conn.execute(
        "INSERT INTO words (word, pos, ipa, base_form) VALUES ('ging', 'verb', '', 'gehen');",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO definitions (word_id, definition) VALUES (?1, 'went');",
        [conn.last_insert_rowid()],
    )
    .unwrap();
    conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
    insert_form(&conn, 999, "Geist", article);

    let report = audit_store(&conn).unwrap();

    assert_eq!(report.orphan_forms, 1);
    assert_eq!(report.unused_tags, 1);
    assert_eq!(report.duplicate_tag_sets, 1);
    assert_eq!(report.inflections_with_glosses, 1);
    assert_eq!(report.noun_article_forms, 1);
    assert_eq!(report.adjective_phrase_forms, 1);
    assert_eq!(report.adjective_declension_forms, 1);
    assert_eq!(report.removed_marker_forms, 1);
    assert_eq!(report.violations(), 8);
    assert!(!report.is_clean());
}

#[test]
fn comparative_glosses_on_inflections_are_not_violations() {
    let conn = store();
    let schoener = word_id(&conn, "schöner");
    conn.execute(
        "INSERT INTO definitions (word_id, definition) VALUES (?1, 'comparative form of schön');",
        [schoener],
    )
    .unwrap();

    let report = audit_store(&conn).unwrap();

    assert_eq!(report.inflections_with_glosses, 0);
    assert!(report.is_clean());
}
