//! The word store.
//!
//! A [`Lex`] owns an append-only set of words, a primary index from
//! identifier to word (a `BTreeMap` over the raw encoding, so iteration is
//! creation order), a secondary index from the `(sbj, vrb, obj)` triple to
//! the earliest word asserting it, and a vocabulary index that makes
//! definitions idempotent. A fresh lex seeds three self-referential words:
//! its own self word plus the two defining relations.
//!
//! Writers serialize on one write lock; readers share snapshots. A word is
//! never observable half-made: the identifier draw only commits after the
//! persistor has accepted the row, and the indexes fill while the write
//! lock is still held.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasherDefault;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use lazy_static::lazy_static;
use seahash::SeaHasher;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{LexError, Result};
use crate::federate;
use crate::number::Number;
use crate::persist::{PersistenceMode, Persistor};
use crate::sequence::Sequencer;
use crate::word::Word;

pub type KeyHasher = BuildHasherDefault<SeaHasher>;

lazy_static! {
    /// The store's self word.
    pub static ref IDN_LEX: Number = Number::from_u64(0);
    /// The defines-a-noun relation.
    pub static ref IDN_NOUN: Number = Number::from_u64(1);
    /// The defines-a-verb relation.
    pub static ref IDN_VERB: Number = Number::from_u64(2);
}

// ------------- Kind -------------

/// The two kinds of vocabulary a lex can define.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Noun,
    Verb,
}

impl Kind {
    /// The well-known word carrying this defining relation.
    pub fn word_idn(&self) -> Number {
        match self {
            Kind::Noun => IDN_NOUN.clone(),
            Kind::Verb => IDN_VERB.clone(),
        }
    }
    fn other(&self) -> Kind {
        match self {
            Kind::Noun => Kind::Verb,
            Kind::Verb => Kind::Noun,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Kind::Noun => write!(f, "noun"),
            Kind::Verb => write!(f, "verb"),
        }
    }
}

// ------------- Configuration -------------

#[derive(Debug, Clone)]
pub struct LexConfig {
    /// The txt of the store's self word.
    pub name: String,
    pub mode: PersistenceMode,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    name: Option<String>,
    database: Option<String>,
}

impl Default for LexConfig {
    fn default() -> Self {
        Self {
            name: String::from("lex"),
            mode: PersistenceMode::InMemory,
        }
    }
}

impl LexConfig {
    pub fn in_memory(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            mode: PersistenceMode::InMemory,
        }
    }
    pub fn file(name: &str, path: &str) -> Self {
        Self {
            name: name.to_owned(),
            mode: PersistenceMode::File(path.to_owned()),
        }
    }
    /// Read settings from a config file (`wordlex.toml` or any format the
    /// config crate recognizes). An absent or empty `database` key means
    /// an in-memory store.
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .map_err(|e| LexError::Config(e.to_string()))?;
        let raw: RawConfig = settings
            .try_deserialize()
            .map_err(|e| LexError::Config(e.to_string()))?;
        Ok(Self {
            name: raw.name.unwrap_or_else(|| String::from("lex")),
            mode: match raw.database {
                Some(path) if !path.is_empty() => PersistenceMode::File(path),
                _ => PersistenceMode::InMemory,
            },
        })
    }
}

// ------------- Lex -------------

struct Inner {
    sequencer: Sequencer,
    // primary index; BTreeMap over the raw encoding walks creation order
    words: BTreeMap<Number, Arc<Word>>,
    // earliest word per triple
    triples: HashMap<(Number, Number, Number), Number, KeyHasher>,
    // earliest definition per (sbj, defining relation, name)
    vocabulary: HashMap<(Number, Number, String), Number, KeyHasher>,
}

impl Inner {
    fn index_word(&mut self, word: Arc<Word>) {
        let idn = word.idn().clone();
        let triple = (
            word.sbj().clone(),
            word.vrb().clone(),
            word.obj().clone(),
        );
        self.triples.entry(triple).or_insert_with(|| idn.clone());
        if word.vrb() == &*IDN_NOUN || word.vrb() == &*IDN_VERB {
            let key = (
                word.sbj().clone(),
                word.vrb().clone(),
                word.txt().to_owned(),
            );
            self.vocabulary.entry(key).or_insert_with(|| idn.clone());
        }
        self.words.insert(idn, word);
    }
}

/// The store. Cheap to share behind an `Arc`; all methods take `&self`.
pub struct Lex {
    inner: RwLock<Inner>,
    persistor: Mutex<Persistor>,
    name: String,
}

impl Lex {
    /// Open a store: restore what the persistence mode has kept, or seed a
    /// fresh one with its three bootstrap words.
    pub fn new(config: LexConfig) -> Result<Lex> {
        let mut persistor = Persistor::new(&config.mode)?;
        let restored = persistor.restore_words()?;
        let mut inner = Inner {
            sequencer: Sequencer::new(),
            words: BTreeMap::new(),
            triples: HashMap::default(),
            vocabulary: HashMap::default(),
        };
        for word in restored {
            let draw = inner.sequencer.draw()?;
            if draw.idn() != word.idn() {
                return Err(LexError::DataCorruption {
                    message: format!(
                        "identifier sequence has a gap before {}",
                        word.idn()
                    ),
                });
            }
            inner.sequencer.commit(draw);
            inner.index_word(Arc::new(word));
        }
        let lex = Lex {
            inner: RwLock::new(inner),
            persistor: Mutex::new(persistor),
            name: config.name.clone(),
        };
        let fresh = { lex.read()?.words.is_empty() };
        if fresh {
            lex.bootstrap(&config.name)?;
            info!(name = %config.name, "seeded a fresh lex");
        } else {
            let inner = lex.read()?;
            for idn in [&*IDN_LEX, &*IDN_NOUN, &*IDN_VERB] {
                if !inner.words.contains_key(idn) {
                    return Err(LexError::DataCorruption {
                        message: format!("bootstrap word {idn} is missing"),
                    });
                }
            }
            let stored_name = inner.words[&*IDN_LEX].txt().to_owned();
            drop(inner);
            if stored_name != config.name {
                info!(
                    configured = %config.name,
                    stored = %stored_name,
                    "store keeps the name it was created with"
                );
            }
            debug!(words = lex.len(), "restored lex");
        }
        Ok(lex)
    }

    // The seminal words refer to each other before all of them exist, so
    // they bypass reference resolution; everything after them cannot.
    fn bootstrap(&self, name: &str) -> Result<()> {
        let mut inner = self.write()?;
        for txt in [name, "noun", "verb"] {
            self.append(
                &mut inner,
                IDN_LEX.clone(),
                IDN_NOUN.clone(),
                IDN_NOUN.clone(),
                Number::one(),
                txt.to_owned(),
            )?;
        }
        Ok(())
    }

    /// Idempotent creation of a vocabulary word.
    ///
    /// The first call appends a definition; later calls with the same
    /// subject, kind and name return that same word without drawing an
    /// identifier. Defining a name that the subject already defined as the
    /// other kind is a conflict, not a new word.
    pub fn define(&self, kind: Kind, sbj: &Number, txt: &str) -> Result<Arc<Word>> {
        let vrb = kind.word_idn();
        let mut inner = self.write()?;
        resolve_reference(&inner, sbj, "subject", true)?;
        let key = (sbj.clone(), vrb.clone(), txt.to_owned());
        if let Some(idn) = inner.vocabulary.get(&key) {
            let word = Arc::clone(&inner.words[idn]);
            debug!(%txt, idn = %word.idn(), "definition already present");
            return Ok(word);
        }
        let other = kind.other();
        if inner
            .vocabulary
            .contains_key(&(sbj.clone(), other.word_idn(), txt.to_owned()))
        {
            return Err(LexError::DefinitionConflict(format!(
                "'{txt}' is already defined as a {other}, not a {kind}"
            )));
        }
        let word = self.append(
            &mut inner,
            sbj.clone(),
            vrb.clone(),
            vrb,
            Number::one(),
            txt.to_owned(),
        )?;
        info!(%txt, %kind, idn = %word.idn(), "defined");
        Ok(word)
    }

    /// Assert a sentence. Sentences are never deduplicated; saying the
    /// same thing twice is two events with two identifiers.
    pub fn assert_sentence(
        &self,
        sbj: &Number,
        vrb: &Number,
        obj: &Number,
        num: Number,
        txt: &str,
    ) -> Result<Arc<Word>> {
        let mut inner = self.write()?;
        resolve_reference(&inner, sbj, "subject", true)?;
        resolve_reference(&inner, vrb, "verb", false)?;
        resolve_reference(&inner, obj, "object", true)?;
        let word = self.append(
            &mut inner,
            sbj.clone(),
            vrb.clone(),
            obj.clone(),
            num,
            txt.to_owned(),
        )?;
        debug!(idn = %word.idn(), "asserted");
        Ok(word)
    }

    /// Point lookup by identifier.
    pub fn read_word(&self, idn: &Number) -> Result<Arc<Word>> {
        let inner = self.read()?;
        inner.words.get(idn).map(Arc::clone).ok_or_else(|| {
            LexError::UndefinedWord(format!("no word {idn} in this lex"))
        })
    }

    /// The earliest word asserting the triple, if any.
    pub fn find(&self, sbj: &Number, vrb: &Number, obj: &Number) -> Result<Option<Arc<Word>>> {
        let inner = self.read()?;
        let key = (sbj.clone(), vrb.clone(), obj.clone());
        Ok(inner
            .triples
            .get(&key)
            .and_then(|idn| inner.words.get(idn))
            .map(Arc::clone))
    }

    /// The store's own word.
    pub fn self_word(&self) -> Result<Arc<Word>> {
        self.read_word(&IDN_LEX)
    }
    /// The store's own identifier, usable as a sentence subject.
    pub fn self_idn(&self) -> Number {
        IDN_LEX.clone()
    }
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Diagnostic rendering: `Word(sbj=<name>,vrb=<name>,obj=<name>)`,
    /// naming each reference by the txt of the referenced word when one is
    /// available, by `store:idn` for foreign references, and by the bare
    /// identifier otherwise.
    pub fn render(&self, word: &Word) -> String {
        match self.inner.read() {
            Ok(inner) => format!(
                "Word(sbj={},vrb={},obj={})",
                reference_name(&inner, word.sbj()),
                reference_name(&inner, word.vrb()),
                reference_name(&inner, word.obj()),
            ),
            Err(_) => format!(
                "Word(sbj={},vrb={},obj={})",
                word.sbj(),
                word.vrb(),
                word.obj()
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.words.len()).unwrap_or(0)
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every word in creation order.
    pub fn words(&self) -> Result<Vec<Arc<Word>>> {
        let inner = self.read()?;
        Ok(inner.words.values().map(Arc::clone).collect())
    }

    /// The most recently issued identifier.
    pub fn last_idn(&self) -> Result<Option<Number>> {
        Ok(self.read()?.sequencer.last_issued())
    }

    /// Tip of the persistence ledger; None for in-memory stores.
    pub fn ledger_head(&self) -> Option<String> {
        self.persistor.lock().ok()?.ledger_head()
    }

    // Append under the held write lock. The identifier draw commits only
    // after the persistor accepts the row, so a failed append leaves both
    // the sequence and the indexes exactly as they were.
    fn append(
        &self,
        inner: &mut RwLockWriteGuard<'_, Inner>,
        sbj: Number,
        vrb: Number,
        obj: Number,
        num: Number,
        txt: String,
    ) -> Result<Arc<Word>> {
        let draw = inner.sequencer.draw()?;
        let whn = now_number()?;
        let word = Arc::new(Word::new(
            draw.idn().clone(),
            sbj,
            vrb,
            obj,
            num,
            txt,
            whn,
        ));
        self.persistor
            .lock()
            .map_err(|e| LexError::Lock(e.to_string()))?
            .persist_word(&word)?;
        inner.sequencer.commit(draw);
        inner.index_word(Arc::clone(&word));
        Ok(word)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|e| LexError::Lock(e.to_string()))
    }
    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|e| LexError::Lock(e.to_string()))
    }
}

/// A reference resolves when it names a word of this lex, or (where
/// foreign references are admissible) when it is a well-formed tagged
/// reference into a named foreign store.
fn resolve_reference(
    inner: &Inner,
    number: &Number,
    role: &str,
    allow_foreign: bool,
) -> Result<()> {
    if number.is_suffixed() {
        if allow_foreign && federate::is_foreign(number) {
            Ok(())
        } else {
            Err(LexError::UndefinedWord(format!(
                "{role} {number:?} is not a resolvable reference"
            )))
        }
    } else if inner.words.contains_key(number) {
        Ok(())
    } else {
        Err(LexError::UndefinedWord(format!(
            "{role} {number} is not a word in this lex"
        )))
    }
}

fn reference_name(inner: &Inner, number: &Number) -> String {
    if number.is_suffixed() {
        if let Ok((namespace, idn)) = federate::untag(number) {
            return format!("{namespace}:{idn}");
        }
        return number.to_string();
    }
    match inner.words.get(number) {
        Some(word) if !word.txt().is_empty() => word.txt().to_owned(),
        _ => number.to_string(),
    }
}

/// The present moment as a Number of epoch seconds, with sub-second
/// precision from the default significand width.
fn now_number() -> Result<Number> {
    let now = Utc::now();
    let seconds = now.timestamp() as f64 + f64::from(now.timestamp_subsec_nanos()) / 1e9;
    Number::from_f64(seconds)
}
