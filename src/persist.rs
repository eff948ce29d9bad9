//! SQLite persistence and restoration.
//!
//! One table holds the words, keyed by the raw `idn` encoding. SQLite
//! compares BLOBs with memcmp, and the codec is order-preserving, so the
//! primary key walks words in creation order with no extra bookkeeping.
//! Every appended row also extends a blake3 hash chain over the full word
//! content; restoration recomputes the chain and refuses a store whose
//! history has been edited.

use rusqlite::{Connection, params};
use tracing::debug;

use crate::error::{LexError, Result};
use crate::number::Number;
use crate::word::Word;

/// Where a lex keeps its words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceMode {
    /// No durability; the store lives and dies with the process.
    InMemory,
    /// A SQLite database file, created on first use.
    File(String),
}

type Seal = [u8; 32];

const GENESIS_SEAL: Seal = [0u8; 32];

// ------------- Persistence -------------
pub struct Persistor {
    conn: Option<Connection>,
    head: Option<Seal>,
}

impl Persistor {
    pub fn new(mode: &PersistenceMode) -> Result<Persistor> {
        let conn = match mode {
            PersistenceMode::InMemory => None,
            PersistenceMode::File(path) => {
                let connection = Connection::open(path)?;
                connection.execute_batch(
                    "
                create table if not exists Word (
                    Word_Identity blob not null,
                    Subject blob not null,
                    Verb blob not null,
                    Object blob not null,
                    Amount blob not null,
                    Text text not null,
                    Moment blob not null,
                    Seal blob not null,
                    constraint unique_and_referenceable_Word_Identity primary key (
                        Word_Identity
                    )
                );
                ",
                )?;
                Some(connection)
            }
        };
        Ok(Persistor { conn, head: None })
    }

    /// Durably append one word and extend the ledger. A word either lands
    /// whole (row plus seal in a single insert) or not at all.
    pub fn persist_word(&mut self, word: &Word) -> Result<()> {
        let Some(conn) = &self.conn else {
            return Ok(());
        };
        let seal = seal_word(self.head.as_ref().unwrap_or(&GENESIS_SEAL), word);
        conn.execute(
            "
            insert into Word (
                Word_Identity,
                Subject,
                Verb,
                Object,
                Amount,
                Text,
                Moment,
                Seal
            ) values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ",
            params![
                word.idn().as_raw(),
                word.sbj().as_raw(),
                word.vrb().as_raw(),
                word.obj().as_raw(),
                word.num().as_raw(),
                word.txt(),
                word.whn().as_raw(),
                &seal[..],
            ],
        )?;
        self.head = Some(seal);
        Ok(())
    }

    /// Read back every word in creation order, verifying the hash chain
    /// and the canonicality of every stored number along the way.
    pub fn restore_words(&mut self) -> Result<Vec<Word>> {
        let Some(conn) = &self.conn else {
            return Ok(Vec::new());
        };
        let mut statement = conn.prepare(
            "
            select Word_Identity,
                   Subject,
                   Verb,
                   Object,
                   Amount,
                   Text,
                   Moment,
                   Seal
                from Word
                order by Word_Identity
        ",
        )?;
        let mut rows = statement.query([])?;
        let mut words = Vec::new();
        let mut head = GENESIS_SEAL;
        while let Some(row) = rows.next()? {
            let idn = restore_number(row.get::<_, Vec<u8>>(0)?, "idn")?;
            let sbj = restore_number(row.get::<_, Vec<u8>>(1)?, "sbj")?;
            let vrb = restore_number(row.get::<_, Vec<u8>>(2)?, "vrb")?;
            let obj = restore_number(row.get::<_, Vec<u8>>(3)?, "obj")?;
            let num = restore_number(row.get::<_, Vec<u8>>(4)?, "num")?;
            let txt: String = row.get(5)?;
            let whn = restore_number(row.get::<_, Vec<u8>>(6)?, "whn")?;
            let stored_seal: Vec<u8> = row.get(7)?;
            let word = Word::new(idn, sbj, vrb, obj, num, txt, whn);
            let seal = seal_word(&head, &word);
            if stored_seal != seal {
                return Err(LexError::DataCorruption {
                    message: format!("ledger seal mismatch at word {}", word.idn()),
                });
            }
            head = seal;
            words.push(word);
        }
        if !words.is_empty() {
            self.head = Some(head);
        }
        debug!(count = words.len(), "restored words from durable storage");
        Ok(words)
    }

    /// The tip of the hash chain, or None for a store without durability
    /// (or with nothing appended yet).
    pub fn ledger_head(&self) -> Option<String> {
        self.head
            .as_ref()
            .map(|seal| seal.iter().map(|b| format!("{b:02x}")).collect())
    }
}

fn restore_number(bytes: Vec<u8>, field: &str) -> Result<Number> {
    Number::from_raw(&bytes).map_err(|e| LexError::DataCorruption {
        message: format!("stored {field} is not canonical: {e}"),
    })
}

/// Chain digest: previous seal, then every attribute with a length prefix.
fn seal_word(previous: &Seal, word: &Word) -> Seal {
    let mut hasher = blake3::Hasher::new();
    hasher.update(previous);
    for number in [word.idn(), word.sbj(), word.vrb(), word.obj(), word.num()] {
        hasher.update(&(number.as_raw().len() as u32).to_le_bytes());
        hasher.update(number.as_raw());
    }
    hasher.update(&(word.txt().len() as u32).to_le_bytes());
    hasher.update(word.txt().as_bytes());
    hasher.update(&(word.whn().as_raw().len() as u32).to_le_bytes());
    hasher.update(word.whn().as_raw());
    *hasher.finalize().as_bytes()
}
