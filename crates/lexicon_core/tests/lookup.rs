use lexicon_core::db::open_db_in_memory;
use lexicon_core::lookup::{lookup_entries, lookup_inflections};
use lexicon_core::{compile_into, CompileOptions, Gender, PartOfSpeech};
use rusqlite::Connection;
use serde_json::{json, Value};

fn store() -> Connection {
    let records = [
        json!({
            "word": "Bank",
            "pos": "noun",
            "sounds": [{"ipa": "/baŋk/"}],
            "senses": [
                {"glosses": ["bench"], "tags": ["feminine"], "synonyms": [{"word": "Sitzbank"}]},
                {"glosses": ["bank"], "related": [{"word": "Geld"}], "antonyms": [{"word": "Stehplatz"}]}
            ],
            "forms": [
                {"form": "Bänke", "tags": ["plural", "nominative"]},
                {"form": "der Bank", "tags": ["genitive", "singular", "definite"]}
            ]
        }),
        json!({
            "word": "bank",
            "pos": "verb",
            "senses": [{"glosses": ["to bank"]}]
        }),
        json!({
            "word": "laufen",
            "pos": "verb",
            "senses": [{"glosses": ["to run"]}]
        }),
        json!({
            "word": "läuft",
            "pos": "verb",
            "senses": [{"form_of": [{"word": "laufen"}]}]
        }),
        json!({
            "word": "lief",
            "pos": "verb",
            "senses": [{"form_of": [{"word": "laufen"}]}]
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

#[test]
fn lookup_matches_headwords_case_insensitively_in_id_order() {
    let conn = store();

    let entries = lookup_entries(&conn, "BANK").unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].word.text, "Bank");
    assert_eq!(entries[0].word.pos, PartOfSpeech::Noun);
    assert_eq!(entries[1].word.text, "bank");
    assert_eq!(entries[1].word.pos, PartOfSpeech::Verb);
    assert!(entries[0].word.id < entries[1].word.id);
}

#[test]
fn lookup_returns_full_read_model() {
    let conn = store();

    let entries = lookup_entries(&conn, "Bank").unwrap();
    let noun = &entries[0];

    assert_eq!(noun.word.gender, Some(Gender::Feminine));
    assert_eq!(noun.word.phonetic, "/baŋk/");
    assert_eq!(noun.word.base_form, None);
    assert_eq!(noun.definitions, vec!["bench", "bank"]);
    assert_eq!(noun.forms.len(), 2);
    assert_eq!(noun.forms[0].text, "Bänke");
    assert_eq!(noun.forms[0].tags, vec!["nominative", "plural"]);
    assert_eq!(noun.forms[1].text, "der Bank");
    assert_eq!(noun.forms[1].tags, vec!["genitive", "singular"]);
    assert_eq!(noun.relations.synonyms, vec!["Sitzbank"]);
    assert_eq!(noun.relations.antonyms, vec!["Stehplatz"]);
    assert_eq!(noun.relations.related, vec!["Geld"]);

    let verb = &entries[1];
    assert_eq!(verb.word.gender, None);
    assert!(verb.forms.is_empty());
    assert!(verb.relations.is_empty());
}

#[test]
fn lookup_of_unknown_headword_is_empty() {
    let conn = store();

    assert!(lookup_entries(&conn, "Schiff").unwrap().is_empty());
}

#[test]
fn inflection_entries_link_back_to_their_base() {
    let conn = store();

    let entries = lookup_entries(&conn, "läuft").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].word.base_form.as_deref(), Some("laufen"));
    assert!(entries[0].definitions.is_empty());

    let inflections = lookup_inflections(&conn, "laufen").unwrap();
    let texts: Vec<&str> = inflections.iter().map(|word| word.text.as_str()).collect();
    assert_eq!(texts, vec!["läuft", "lief"]);
    assert!(lookup_inflections(&conn, "Bank").unwrap().is_empty());
}

#[test]
fn entries_serialize_with_flattened_word_fields() {
    let conn = store();

    let entries = lookup_entries(&conn, "Bank").unwrap();
    let value = serde_json::to_value(&entries[0]).unwrap();

    assert_eq!(value["text"], "Bank");
    assert_eq!(value["pos"], "noun");
    assert_eq!(value["gender"], "f");
    assert_eq!(value["definitions"], json!(["bench", "bank"]));
    assert_eq!(value["forms"][0]["tags"], json!(["nominative", "plural"]));
    assert_eq!(value["relations"]["synonyms"], json!(["Sitzbank"]));
}
