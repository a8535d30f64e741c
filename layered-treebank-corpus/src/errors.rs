//! Error types for corpus I/O and the batch driver.

use std::path::PathBuf;

use layered_treebank::TreebankError;
use thiserror::Error;

/// Errors that can occur while reading corpora or running a batch.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// An error from the alignment engine.
    #[error(transparent)]
    Treebank(#[from] TreebankError),

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A corpus file could not be parsed.
    #[error("parse error in {}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The run configuration could not be loaded.
    #[error("invalid configuration {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// A UD sentence id does not end in a sentence number.
    #[error("unexpected sent_id {sent_id:?} (matched {file})")]
    InvalidSentId { sent_id: String, file: String },

    /// A UD sentence number is outside of its source file.
    #[error("sent_id {sent_id:?} refers to sentence {number}, but {file} holds {available}")]
    SentenceOutOfRange {
        sent_id: String,
        file: String,
        number: usize,
        available: usize,
    },

    /// The two corpora disagree on the text of a sentence (strict mode only).
    #[error("mismatching sentences in {file}: source {source_text:?}, UD {ud_text:?}")]
    SentenceMismatch {
        file: String,
        source_text: String,
        ud_text: String,
    },

    /// Missing or unusable input paths.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CorpusError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CorpusError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for corpus operations.
pub type CorpusResult<T> = Result<T, CorpusError>;
