//! Error types for the treebank engine.
//!
//! Every variant names the sentence (by id) and the token or row index that
//! caused it, so a batch run can report exactly where it stopped.

use thiserror::Error;

/// Errors that can occur while repairing, exporting, remapping or aligning.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreebankError {
    /// A table row did not have exactly ten tab-separated columns.
    #[error("malformed row at line {line}: expected 10 columns, found {columns}: {content:?}")]
    MalformedRow {
        line: usize,
        columns: usize,
        content: String,
    },

    /// A table column held a value that could not be decoded.
    #[error("invalid {field} value at line {line}: {value:?}")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// A token was built without any morphological analysis.
    #[error("token {token} of sentence {sentence:?} has no analyses")]
    MissingAnalysis { sentence: String, token: usize },

    /// A stored token was read back without any morphological analysis.
    #[error("token {text:?} has no analyses")]
    EmptyToken { text: String },

    /// Clause indices were supplied for the wrong number of tokens.
    #[error("sentence {sentence:?} has {expected} tokens but {found} clause indices")]
    ClauseIndexCount {
        sentence: String,
        expected: usize,
        found: usize,
    },

    /// A head index points outside of its sentence.
    #[error("token {token} of sentence {sentence:?} points to head {head} outside the sentence")]
    HeadOutOfBounds {
        sentence: String,
        token: usize,
        head: usize,
    },

    /// The clause-relative position of a head could not be resolved.
    #[error("head {head} of token {token} not found inside its clause in sentence {sentence:?}")]
    ClauseHeadNotFound {
        sentence: String,
        token: usize,
        head: usize,
    },

    /// The parser output holds a different number of chunks than expected.
    #[error("expected {expected} output chunks, found {found}")]
    ChunkCountMismatch { expected: usize, found: usize },

    /// A sentence-scoped chunk has a different length than its sentence.
    #[error("sentence {sentence:?} has {expected} tokens, but its output chunk has {found} rows")]
    ChunkLengthMismatch {
        sentence: String,
        expected: usize,
        found: usize,
    },

    /// The chunks collected for a sentence overrun its token count.
    #[error("output chunks overrun sentence {sentence:?}: {expected} tokens, {found} rows")]
    ChunkOverrun {
        sentence: String,
        expected: usize,
        found: usize,
    },

    /// An output row carries a different surface form than its token.
    #[error("sentence {sentence:?}, token {position}: expected {expected:?}, parser wrote {found:?}")]
    TokenMismatch {
        sentence: String,
        position: usize,
        expected: String,
        found: String,
    },

    /// A clause-scoped chunk could not be bound to any clause.
    #[error("chunk {chunk} ({len} rows, starting with {first_form:?}) matches no clause of sentence {sentence:?}")]
    UnboundChunk {
        sentence: String,
        chunk: usize,
        first_form: String,
        len: usize,
    },

    /// A clause-relative head in the parser output points outside its clause.
    #[error("chunk {chunk} of sentence {sentence:?}: clause head {head} outside a clause of {len} tokens")]
    ClauseHeadOutOfBounds {
        sentence: String,
        chunk: usize,
        head: usize,
        len: usize,
    },

    /// After alignment, not every token received exactly one output row.
    #[error("sentence {sentence:?}: {bound} of {expected} tokens bound to output rows")]
    AlignmentCountMismatch {
        sentence: String,
        expected: usize,
        bound: usize,
    },

    /// An aligned record refers to a token that is not in the document.
    #[error("aligned record for sentence {sentence:?} at token {position} has no counterpart")]
    UnknownAlignedToken { sentence: String, position: usize },
}

/// Result type for treebank operations.
pub type TreebankResult<T> = Result<T, TreebankError>;
