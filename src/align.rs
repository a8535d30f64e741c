//! Aligning dependency-parser output back onto a document.
//!
//! The parser is fed tables exported by [`crate::table::TableExporter`] and
//! answers with the same blocks, in the same order, with HEAD and DEPREL
//! filled in. In sentence granularity each block is one sentence. In clause
//! granularity each block is one clause, and a block is bound to its clause
//! by its first word and length.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::Document;
use crate::errors::{TreebankError, TreebankResult};
use crate::remap::sentence_relative_head;
use crate::sentence::{Clause, Sentence};
use crate::table::{read_chunks, Granularity, TableRow};
use crate::token::{Head, Token};

/// Options for [`align_parser_output`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignOptions {
    pub granularity: Granularity,
    /// Fail when a row's FORM differs from its token
    pub check_tokens: bool,
    /// Fill [`AlignedToken::text_word_id`] and [`AlignedToken::sent_word_id`]
    pub add_word_ids: bool,
}

/// One parser output row anchored to a document token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedToken {
    pub start: usize,
    pub end: usize,
    pub sent_id: String,
    /// The output row; in clause granularity its HEAD is already
    /// sentence-relative
    pub row: TableRow,
    /// 0-based position within the document
    pub text_word_id: Option<usize>,
    /// 0-based position within the sentence
    pub sent_word_id: Option<usize>,
}

/// Align parser output lines to the tokens of `document`.
///
/// Records come back in document order.
pub fn align_parser_output<S: AsRef<str>>(
    document: &Document,
    lines: &[S],
    options: &AlignOptions,
) -> TreebankResult<Vec<AlignedToken>> {
    let chunks = read_chunks(lines)?;
    debug!(
        chunks = chunks.len(),
        sentences = document.sentence_count(),
        granularity = ?options.granularity,
        "aligning parser output"
    );
    match options.granularity {
        Granularity::Sentences => align_sentences(document, chunks, options),
        Granularity::Clauses => align_clauses(document, chunks, options),
    }
}

fn align_sentences(
    document: &Document,
    chunks: Vec<Vec<TableRow>>,
    options: &AlignOptions,
) -> TreebankResult<Vec<AlignedToken>> {
    if chunks.len() != document.sentence_count() {
        return Err(TreebankError::ChunkCountMismatch {
            expected: document.sentence_count(),
            found: chunks.len(),
        });
    }

    let mut aligned = Vec::with_capacity(document.word_count());
    let mut word_offset = 0;
    for (sentence, chunk) in document.sentences().iter().zip(chunks) {
        if chunk.len() != sentence.len() {
            return Err(TreebankError::ChunkLengthMismatch {
                sentence: sentence.id.clone(),
                expected: sentence.len(),
                found: chunk.len(),
            });
        }
        for (position, row) in chunk.into_iter().enumerate() {
            check_form(sentence, position, &row, options)?;
            aligned.push(record(sentence, position, word_offset, row, options));
        }
        word_offset += sentence.len();
    }
    Ok(aligned)
}

fn align_clauses(
    document: &Document,
    chunks: Vec<Vec<TableRow>>,
    options: &AlignOptions,
) -> TreebankResult<Vec<AlignedToken>> {
    let total_chunks = chunks.len();
    let mut chunks = chunks.into_iter().enumerate();
    let mut consumed = 0;
    let mut aligned = Vec::with_capacity(document.word_count());
    let mut word_offset = 0;

    for sentence in document.sentences() {
        let mut taken = Vec::new();
        let mut rows = 0;
        while rows < sentence.len() {
            let Some((chunk_idx, chunk)) = chunks.next() else {
                break;
            };
            rows += chunk.len();
            consumed += 1;
            taken.push((chunk_idx, chunk));
        }
        if rows > sentence.len() {
            return Err(TreebankError::ChunkOverrun {
                sentence: sentence.id.clone(),
                expected: sentence.len(),
                found: rows,
            });
        }
        if rows < sentence.len() {
            return Err(TreebankError::AlignmentCountMismatch {
                sentence: sentence.id.clone(),
                expected: sentence.len(),
                bound: rows,
            });
        }

        let bound = bind_clause_chunks(sentence, taken, options)?;
        for (position, row) in bound.into_iter().enumerate() {
            aligned.push(record(sentence, position, word_offset, row, options));
        }
        word_offset += sentence.len();
    }

    if consumed != total_chunks {
        return Err(TreebankError::ChunkCountMismatch {
            expected: consumed,
            found: total_chunks,
        });
    }
    Ok(aligned)
}

/// Bind the clause chunks of one sentence and translate their heads.
///
/// Returns one row per sentence token.
fn bind_clause_chunks(
    sentence: &Sentence,
    chunks: Vec<(usize, Vec<TableRow>)>,
    options: &AlignOptions,
) -> TreebankResult<Vec<TableRow>> {
    let mut index = ClauseSpanIndex::new(sentence);
    let mut slots: Vec<Option<TableRow>> = vec![None; sentence.len()];
    let mut bindings = 0;

    for (chunk_idx, chunk) in chunks {
        let Some(first) = chunk.first() else {
            continue;
        };
        let members = index
            .take(&first.form, chunk.len())
            .ok_or_else(|| TreebankError::UnboundChunk {
                sentence: sentence.id.clone(),
                chunk: chunk_idx,
                first_form: first.form.clone(),
                len: chunk.len(),
            })?;
        debug!(
            sentence = %sentence.id,
            chunk = chunk_idx,
            start = members[0],
            len = members.len(),
            "bound clause chunk"
        );

        for (offset, mut row) in chunk.into_iter().enumerate() {
            let position = members[offset];
            check_form(sentence, position, &row, options)?;
            if let Some(head) = row.head {
                let translated = sentence_relative_head(&members, Head::from_one_based(head))
                    .ok_or_else(|| TreebankError::ClauseHeadOutOfBounds {
                        sentence: sentence.id.clone(),
                        chunk: chunk_idx,
                        head,
                        len: members.len(),
                    })?;
                row.head = Some(translated.to_one_based());
            }
            row.id = position + 1;
            bindings += 1;
            if slots[position].is_none() {
                slots[position] = Some(row);
            }
        }
    }

    let filled = slots.iter().filter(|slot| slot.is_some()).count();
    if bindings != sentence.len() || filled != sentence.len() {
        return Err(TreebankError::AlignmentCountMismatch {
            sentence: sentence.id.clone(),
            expected: sentence.len(),
            bound: filled,
        });
    }
    Ok(slots.into_iter().flatten().collect())
}

/// Candidate clause spans of one sentence, keyed by their first surface form.
///
/// Every token starts a candidate span reaching to the end of its clause.
/// Clause starts are preferred over spans starting inside a clause. Once a
/// chunk binds to a clause, no span of that clause is a candidate again.
#[derive(Debug)]
struct ClauseSpanIndex {
    clauses: Vec<Clause>,
    by_form: HashMap<String, Vec<Candidate>>,
    /// Slots of clauses already bound to a chunk
    bound: HashSet<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    /// Index into `clauses`
    slot: usize,
    /// Offset into the clause members where the span starts
    offset: usize,
}

impl ClauseSpanIndex {
    fn new(sentence: &Sentence) -> Self {
        let clauses = sentence.clauses();
        let mut starts: Vec<(usize, Candidate)> = clauses
            .iter()
            .enumerate()
            .flat_map(|(slot, clause)| {
                clause
                    .members
                    .iter()
                    .enumerate()
                    .map(move |(offset, &position)| (position, Candidate { slot, offset }))
            })
            .collect();
        starts.sort_by_key(|(position, _)| *position);

        let mut by_form: HashMap<String, Vec<Candidate>> = HashMap::new();
        for (position, candidate) in starts {
            by_form
                .entry(exported_form(&sentence.tokens[position].text))
                .or_default()
                .push(candidate);
        }
        Self {
            clauses,
            by_form,
            bound: HashSet::new(),
        }
    }

    /// Sentence positions of the first span of an unbound clause starting with `form`
    /// (as written to the table) and holding exactly `len` tokens.
    fn take(&mut self, form: &str, len: usize) -> Option<Vec<usize>> {
        let candidates = self.by_form.get(form)?;
        let fits = |candidate: &&Candidate| {
            !self.bound.contains(&candidate.slot) && self.clauses[candidate.slot].len() - candidate.offset == len
        };
        let found = *candidates
            .iter()
            .filter(|candidate| candidate.offset == 0)
            .find(&fits)
            .or_else(|| candidates.iter().find(&fits))?;
        self.bound.insert(found.slot);
        Some(self.clauses[found.slot].members[found.offset..].to_vec())
    }
}

fn check_form(
    sentence: &Sentence,
    position: usize,
    row: &TableRow,
    options: &AlignOptions,
) -> TreebankResult<()> {
    if !options.check_tokens {
        return Ok(());
    }
    let token: &Token = &sentence.tokens[position];
    if exported_form(&token.text) != row.form {
        return Err(TreebankError::TokenMismatch {
            sentence: sentence.id.clone(),
            position,
            expected: token.text.clone(),
            found: row.form.clone(),
        });
    }
    Ok(())
}

/// Table rows carry forms with spaces replaced by underscores.
fn exported_form(text: &str) -> String {
    text.replace(' ', "_")
}

fn record(
    sentence: &Sentence,
    position: usize,
    word_offset: usize,
    row: TableRow,
    options: &AlignOptions,
) -> AlignedToken {
    let token = &sentence.tokens[position];
    AlignedToken {
        start: token.start,
        end: token.end,
        sent_id: sentence.id.clone(),
        row,
        text_word_id: options.add_word_ids.then_some(word_offset + position),
        sent_word_id: options.add_word_ids.then_some(position),
    }
}
