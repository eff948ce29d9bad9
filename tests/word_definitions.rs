use wordlex::error::LexError;
use wordlex::lex::{IDN_LEX, IDN_NOUN, IDN_VERB, Kind, Lex, LexConfig};
use wordlex::number::Number;

fn fresh() -> Lex {
    Lex::new(LexConfig::default()).expect("in-memory lex")
}

#[test]
fn a_fresh_lex_knows_itself() {
    let lex = fresh();
    assert_eq!(3, lex.len(), "bootstrap seeds the self word and two relations");
    let me = lex.self_word().expect("self word");
    assert_eq!(&*IDN_LEX, me.idn());
    assert_eq!("lex", me.txt(), "the default store name");
    assert_eq!("noun", lex.read_word(&IDN_NOUN).expect("noun word").txt());
    assert_eq!("verb", lex.read_word(&IDN_VERB).expect("verb word").txt());
}

#[test]
fn define_is_idempotent_and_burns_no_identifier() {
    let lex = fresh();
    let me = lex.self_idn();
    let first = lex.define(Kind::Noun, &me, "world").expect("first define");
    let before = lex.last_idn().expect("sequence").expect("issued");
    let second = lex.define(Kind::Noun, &me, "world").expect("second define");
    let after = lex.last_idn().expect("sequence").expect("issued");
    assert_eq!(first.idn(), second.idn(), "same name, same kind, same word");
    assert_eq!(before, after, "the second call must not advance the sequencer");
    assert_eq!(4, lex.len());
}

#[test]
fn distinct_names_get_distinct_ascending_identifiers() {
    let lex = fresh();
    let me = lex.self_idn();
    let cat = lex.define(Kind::Noun, &me, "cat").expect("cat");
    let dog = lex.define(Kind::Noun, &me, "dog").expect("dog");
    assert_ne!(cat.idn(), dog.idn());
    assert!(cat.idn() < dog.idn(), "identifiers follow creation order");
}

#[test]
fn defining_across_kinds_is_a_conflict() {
    let lex = fresh();
    let me = lex.self_idn();
    lex.define(Kind::Noun, &me, "light").expect("noun first");
    match lex.define(Kind::Verb, &me, "light") {
        Err(LexError::DefinitionConflict(message)) => {
            assert!(message.contains("light"), "conflict names the word: {message}");
        }
        other => panic!("expected a definition conflict, got {other:?}"),
    }
    // The conflicting call must not have created anything.
    assert_eq!(4, lex.len());
}

#[test]
fn bootstrap_vocabulary_is_already_defined() {
    let lex = fresh();
    let me = lex.self_idn();
    let noun = lex.define(Kind::Noun, &me, "noun").expect("noun");
    assert_eq!(&*IDN_NOUN, noun.idn(), "defining 'noun' finds the seminal word");
    let verb = lex.define(Kind::Noun, &me, "verb").expect("verb");
    assert_eq!(&*IDN_VERB, verb.idn());
}

#[test]
fn definitions_need_a_resolvable_subject() {
    let lex = fresh();
    match lex.define(Kind::Noun, &Number::from_i64(99), "orphan") {
        Err(LexError::UndefinedWord(_)) => {}
        other => panic!("expected an undefined subject, got {other:?}"),
    }
}

#[test]
fn a_definition_looks_like_a_sentence_about_its_kind() {
    let lex = fresh();
    let me = lex.self_idn();
    let word = lex.define(Kind::Verb, &me, "likes").expect("likes");
    assert_eq!(&me, word.sbj());
    assert_eq!(&*IDN_VERB, word.vrb());
    assert_eq!(&*IDN_VERB, word.obj(), "the kind word doubles as category marker");
    assert_eq!(Some(1), word.num().to_i64());
    assert_eq!("likes", word.txt());
}
