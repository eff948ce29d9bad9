//! Wordlex – a federated, append-only store of self-describing facts.
//!
//! Wordlex centers on the *word* concept: an immutable seven-attribute
//! record `(idn, sbj, vrb, obj, num, txt, whn)`, where:
//! * An [`number::Number`] is a canonical, order-preserving byte encoding
//!   of a signed arbitrary-precision value. One type carries ratings,
//!   identifiers and timestamps alike, and unsigned byte comparison of two
//!   encodings orders them as the values they represent.
//! * A [`word::Word`] is a fact: subject, verb and object reference other
//!   words by identifier, `num` quantifies the assertion, `txt` names or
//!   explains it, `whn` records when it was made.
//! * A [`lex::Lex`] owns its words, hands out gapless ascending
//!   identifiers, deduplicates vocabulary definitions, and never edits or
//!   deletes anything: you can change anything but your history.
//! * The [`federate`] module tags a Number so one store's sentences can
//!   cite `identifier N in store F` with no registry in between.
//!
//! ## Modules
//! * [`number`] – the codec: zones, suffixes, conversions.
//! * [`sequence`] – identifier issue for one store.
//! * [`word`] – the immutable record.
//! * [`lex`] – the store: indexes, bootstrap vocabulary, the four
//!   operations (`define`, `assert_sentence`, `read_word`, `find`).
//! * [`federate`] – foreign-store references.
//! * [`persist`] – SQLite persistence with a blake3 tamper-evident ledger.
//!
//! ## Quick Start
//! ```
//! use wordlex::lex::{Kind, Lex, LexConfig};
//! use wordlex::number::Number;
//! let lex = Lex::new(LexConfig::default()).unwrap();
//! let me = lex.self_idn();
//! let hello = lex.define(Kind::Verb, &me, "hello").unwrap();
//! let world = lex.define(Kind::Noun, &me, "world").unwrap();
//! let said = lex
//!     .assert_sentence(&me, hello.idn(), world.idn(), Number::from_i64(42), "How are ya!")
//!     .unwrap();
//! assert_eq!("Word(sbj=lex,vrb=hello,obj=world)", lex.render(&said));
//! assert_eq!(Some(42), said.num().to_i64());
//! ```
//!
//! ## Persistence
//! [`lex::LexConfig`] selects between an in-memory store and a SQLite
//! file. File-backed stores restore their words, indexes and identifier
//! sequence on open, and verify a blake3 hash chain over the whole
//! history while doing so.

pub mod error;
pub mod federate;
pub mod lex;
pub mod number;
pub mod persist;
pub mod sequence;
pub mod word;
