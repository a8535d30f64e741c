//! Sentences and their clause partition.

use serde::{Deserialize, Serialize};

use crate::errors::{TreebankError, TreebankResult};
use crate::token::{ClauseAnnotation, Head, Token};

/// An ordered sequence of tokens with a corpus-specific id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Sentence id, e.g. `aja_ee199920_12` or `file.inforem__3`
    pub id: String,
    pub tokens: Vec<Token>,
    /// Clause index per token
    clause_indices: Vec<usize>,
}

/// A view of the tokens of one clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// Clause index within the sentence
    pub index: usize,
    /// Sentence positions of the clause tokens, ascending
    pub members: Vec<usize>,
    /// The first token of the clause opens an embedded clause
    pub embedded: bool,
}

impl Clause {
    /// Sentence position of the first clause token.
    pub fn start(&self) -> usize {
        self.members[0]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Clause-relative position of a sentence position.
    pub fn position_of(&self, sentence_position: usize) -> Option<usize> {
        self.members.binary_search(&sentence_position).ok()
    }
}

impl Sentence {
    /// Create a sentence; clause indices are derived from the tokens' clause marks.
    pub fn new(id: impl Into<String>, tokens: Vec<Token>) -> Self {
        let clause_indices = derive_clause_indices(&tokens);
        Self {
            id: id.into(),
            tokens,
            clause_indices,
        }
    }

    /// Override the clause partition with explicit per-token clause indices.
    pub fn with_clause_indices(mut self, indices: Vec<usize>) -> TreebankResult<Self> {
        if indices.len() != self.tokens.len() {
            return Err(TreebankError::ClauseIndexCount {
                sentence: self.id,
                expected: self.tokens.len(),
                found: indices.len(),
            });
        }
        self.clause_indices = indices;
        Ok(self)
    }

    /// Recompute clause indices after the tokens' clause marks changed.
    pub fn refresh_clause_indices(&mut self) {
        self.clause_indices = derive_clause_indices(&self.tokens);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Canonical surface text: token texts joined by single spaces.
    pub fn text(&self) -> String {
        self.forms().collect::<Vec<_>>().join(" ")
    }

    pub fn forms(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|token| token.text.as_str())
    }

    pub fn clause_indices(&self) -> &[usize] {
        &self.clause_indices
    }

    pub fn clause_index(&self, position: usize) -> Option<usize> {
        self.clause_indices.get(position).copied()
    }

    /// Clauses ordered by clause index.
    pub fn clauses(&self) -> Vec<Clause> {
        let mut clauses: Vec<Clause> = Vec::new();
        let mut order: Vec<usize> = self.clause_indices.clone();
        order.sort_unstable();
        order.dedup();
        for index in order {
            let members: Vec<usize> = self
                .clause_indices
                .iter()
                .enumerate()
                .filter(|(_, clause)| **clause == index)
                .map(|(position, _)| position)
                .collect();
            let embedded = self.tokens[members[0]].has_mark(ClauseAnnotation::EmbeddedStart);
            clauses.push(Clause {
                index,
                members,
                embedded,
            });
        }
        clauses
    }

    /// True when every token carries at least one dependency edge.
    pub fn has_syntax(&self) -> bool {
        !self.tokens.is_empty() && self.tokens.iter().all(|token| !token.edges.is_empty())
    }

    /// Authoritative heads of all tokens (`None` for tokens without syntax).
    pub fn heads(&self) -> Vec<Option<Head>> {
        self.tokens.iter().map(Token::head).collect()
    }

    /// Put every token's readings into their deterministic export order.
    pub fn sort_analyses(&mut self) {
        for token in &mut self.tokens {
            token.sort_analyses();
        }
    }
}

/// Derive per-token clause indices from clause marks.
///
/// An embedded start opens a fresh clause that the token itself belongs to;
/// a boundary starts a fresh clause after the token; an embedded end returns
/// to the enclosing clause after the token.
pub fn derive_clause_indices(tokens: &[Token]) -> Vec<usize> {
    let mut indices = Vec::with_capacity(tokens.len());
    let mut max_index = 0;
    let mut stack = vec![0];

    for token in tokens {
        for _ in token
            .clause_marks
            .iter()
            .filter(|mark| **mark == ClauseAnnotation::EmbeddedStart)
        {
            max_index += 1;
            stack.push(max_index);
        }

        indices.push(stack.last().copied().unwrap_or(0));

        for mark in &token.clause_marks {
            match mark {
                ClauseAnnotation::Boundary => {
                    max_index += 1;
                    if let Some(top) = stack.last_mut() {
                        *top = max_index;
                    }
                }
                ClauseAnnotation::EmbeddedEnd => {
                    if stack.len() > 1 {
                        stack.pop();
                    }
                }
                ClauseAnnotation::EmbeddedStart => {}
            }
        }
    }

    indices
}
