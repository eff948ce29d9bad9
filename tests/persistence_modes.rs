use wordlex::error::LexError;
use wordlex::lex::{Kind, Lex, LexConfig};
use wordlex::number::Number;

#[test]
fn in_memory_mode_allows_basic_operations() {
    let lex = Lex::new(LexConfig::default()).expect("lex");
    let me = lex.self_idn();
    let likes = lex.define(Kind::Verb, &me, "likes").expect("likes");
    let pie = lex.define(Kind::Noun, &me, "pie").expect("pie");
    lex.assert_sentence(&me, likes.idn(), pie.idn(), Number::one(), "")
        .expect("sentence");
    // No ledger head should exist (no persistence)
    assert!(lex.ledger_head().is_none());
}

#[test]
fn file_mode_persists_and_has_ledger() {
    // Use a temp path; reuse the same file to ensure ledger creation
    let path = "test_wordlex_ledger.db".to_string();
    // Ensure clean start
    let _ = std::fs::remove_file(&path);
    let lex = Lex::new(LexConfig::file("keeper", &path)).expect("lex");
    let me = lex.self_idn();
    let likes = lex.define(Kind::Verb, &me, "likes").expect("likes");
    let pie = lex.define(Kind::Noun, &me, "pie").expect("pie");
    lex.assert_sentence(&me, likes.idn(), pie.idn(), Number::from_i64(9), "a lot")
        .expect("sentence");
    let head = lex.ledger_head();
    assert!(
        head.is_some(),
        "expected ledger head after word insertion in file-backed mode"
    );
    // Clean up
    let _ = std::fs::remove_file(&path);
}

#[test]
fn a_restored_store_carries_on_where_it_stopped() {
    let path = "test_wordlex_restore.db".to_string();
    let _ = std::fs::remove_file(&path);
    let (word_count, sentence_idn, head) = {
        let lex = Lex::new(LexConfig::file("keeper", &path)).expect("first open");
        let me = lex.self_idn();
        let likes = lex.define(Kind::Verb, &me, "likes").expect("likes");
        let pie = lex.define(Kind::Noun, &me, "pie").expect("pie");
        let sentence = lex
            .assert_sentence(&me, likes.idn(), pie.idn(), Number::from_i64(9), "a lot")
            .expect("sentence");
        (lex.len(), sentence.idn().clone(), lex.ledger_head())
    };

    let lex = Lex::new(LexConfig::file("keeper", &path)).expect("second open");
    assert_eq!(word_count, lex.len(), "every word comes back");
    assert_eq!(
        head,
        lex.ledger_head(),
        "the recomputed ledger head matches the one we left"
    );
    let me = lex.self_idn();
    assert_eq!("keeper", lex.self_word().expect("self").txt());

    // The vocabulary index is restored: defining again finds, not appends.
    let pie = lex.define(Kind::Noun, &me, "pie").expect("pie again");
    assert!(pie.idn() < &sentence_idn);
    assert_eq!(word_count, lex.len());

    // The sequence continues gaplessly past the restored words.
    let more = lex.define(Kind::Noun, &me, "cake").expect("cake");
    assert_eq!(
        Some(word_count as i64),
        more.idn().to_i64(),
        "the next identifier follows the last restored one"
    );

    let sentence = lex.read_word(&sentence_idn).expect("sentence survived");
    assert_eq!(Some(9), sentence.num().to_i64());
    assert_eq!("a lot", sentence.txt());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn edited_history_is_refused() {
    let path = "test_wordlex_tamper.db".to_string();
    let _ = std::fs::remove_file(&path);
    {
        let lex = Lex::new(LexConfig::file("keeper", &path)).expect("first open");
        let me = lex.self_idn();
        let likes = lex.define(Kind::Verb, &me, "likes").expect("likes");
        let pie = lex.define(Kind::Noun, &me, "pie").expect("pie");
        lex.assert_sentence(&me, likes.idn(), pie.idn(), Number::one(), "honest")
            .expect("sentence");
    }
    // Rewrite history behind the store's back.
    {
        let conn = rusqlite::Connection::open(&path).expect("raw connection");
        conn.execute("update Word set Text = 'dishonest' where Text = 'honest'", [])
            .expect("tamper");
    }
    match Lex::new(LexConfig::file("keeper", &path)) {
        Err(LexError::DataCorruption { message }) => {
            assert!(
                message.contains("seal"),
                "the ledger catches the edit: {message}"
            );
        }
        Ok(_) => panic!("a tampered store must not open"),
        Err(other) => panic!("expected data corruption, got {other:?}"),
    }
    let _ = std::fs::remove_file(&path);
}

#[test]
fn the_stored_name_outlives_the_configured_one() {
    let path = "test_wordlex_rename.db".to_string();
    let _ = std::fs::remove_file(&path);
    {
        Lex::new(LexConfig::file("original", &path)).expect("first open");
    }
    let lex = Lex::new(LexConfig::file("pretender", &path)).expect("second open");
    assert_eq!(
        "original",
        lex.self_word().expect("self").txt(),
        "word zero is history too"
    );
    let _ = std::fs::remove_file(&path);
}

#[test]
fn config_files_select_the_mode() {
    let path = "test_wordlex_settings.toml";
    std::fs::write(
        path,
        "name = \"configured\"\ndatabase = \"\"\n",
    )
    .expect("write settings");
    let config = LexConfig::from_file("test_wordlex_settings").expect("parse settings");
    assert_eq!("configured", config.name);
    assert_eq!(wordlex::persist::PersistenceMode::InMemory, config.mode);
    let _ = std::fs::remove_file(path);
}
