
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LexError {
    #[error("Malformed number: {0}")]
    MalformedNumber(String),
    #[error("Undefined word: {0}")]
    UndefinedWord(String),
    #[error("Definition conflict: {0}")]
    DefinitionConflict(String),
    #[error("Sequence exhausted: {0}")]
    SequenceExhaustion(String),
    #[error("Unsupported value: {0}")]
    Unsupported(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Data corruption: {message}")]
    DataCorruption { message: String },
    #[error("Config error: {0}")]
    Config(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, LexError>;

// Helper conversions
impl From<rusqlite::Error> for LexError {
    fn from(e: rusqlite::Error) -> Self { Self::Persistence(e.to_string()) }
}
