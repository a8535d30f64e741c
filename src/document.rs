//! Multi-sentence documents.
//!
//! A [`Document`] owns its sentences and assigns every token character
//! offsets in a reconstructed text (tokens joined by a space, sentences by a
//! newline). Aligned parser output is attached back through those offsets.

use crate::align::AlignedToken;
use crate::errors::{TreebankError, TreebankResult};
use crate::sentence::Sentence;
use crate::token::{DependencyEdge, Head};

/// An ordered collection of sentences from one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    sentences: Vec<Sentence>,
    text: String,
}

impl Document {
    /// Build a document and compute token offsets.
    pub fn from_sentences(mut sentences: Vec<Sentence>) -> Self {
        let mut text = String::new();
        let mut offset = 0;

        for (sentence_idx, sentence) in sentences.iter_mut().enumerate() {
            if sentence_idx > 0 {
                text.push('\n');
                offset += 1;
            }
            for (token_idx, token) in sentence.tokens.iter_mut().enumerate() {
                if token_idx > 0 {
                    text.push(' ');
                    offset += 1;
                }
                token.start = offset;
                offset += token.text.chars().count();
                token.end = offset;
                text.push_str(&token.text);
            }
        }

        Self { sentences, text }
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn sentences_mut(&mut self) -> &mut [Sentence] {
        &mut self.sentences
    }

    pub fn into_sentences(self) -> Vec<Sentence> {
        self.sentences
    }

    /// The reconstructed document text the token offsets refer to.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn word_count(&self) -> usize {
        self.sentences.iter().map(Sentence::len).sum()
    }

    pub fn sentence(&self, id: &str) -> Option<&Sentence> {
        self.sentences.iter().find(|sentence| sentence.id == id)
    }

    /// Replace token edges with aligned parser output.
    ///
    /// Every record must carry a sentence-relative head; records are matched
    /// to tokens by sentence id and start offset.
    pub fn attach_parses(&mut self, aligned: &[AlignedToken]) -> TreebankResult<()> {
        for record in aligned {
            let sentence = self
                .sentences
                .iter_mut()
                .find(|sentence| sentence.id == record.sent_id)
                .ok_or_else(|| TreebankError::UnknownAlignedToken {
                    sentence: record.sent_id.clone(),
                    position: record.start,
                })?;
            let len = sentence.tokens.len();
            let position = sentence
                .tokens
                .binary_search_by_key(&record.start, |token| token.start)
                .map_err(|_| TreebankError::UnknownAlignedToken {
                    sentence: record.sent_id.clone(),
                    position: record.start,
                })?;

            let Some(one_based) = record.row.head else {
                continue;
            };
            let head = Head::from_one_based(one_based);
            if let Head::Index(idx) = head {
                if idx >= len {
                    return Err(TreebankError::HeadOutOfBounds {
                        sentence: record.sent_id.clone(),
                        token: position,
                        head: idx,
                    });
                }
            }
            sentence.tokens[position]
                .edges
                .replace(vec![DependencyEdge::new(head, record.row.deprel.clone())]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Analysis, Token};

    fn sentence(id: &str, words: &[&str]) -> Sentence {
        let tokens = words
            .iter()
            .enumerate()
            .map(|(idx, word)| Token::new(id, idx, *word, vec![Analysis::new(*word, "S", "")]).unwrap())
            .collect();
        Sentence::new(id, tokens)
    }

    #[test]
    fn offsets_follow_reconstructed_text() {
        let doc = Document::from_sentences(vec![
            sentence("a_1", &["Öö", "oli", "."]),
            sentence("a_2", &["Jah", "."]),
        ]);
        assert_eq!(doc.text(), "Öö oli .\nJah .");
        let offsets: Vec<_> = doc
            .sentences()
            .iter()
            .flat_map(|s| s.tokens.iter().map(|t| (t.start, t.end)))
            .collect();
        assert_eq!(offsets, vec![(0, 2), (3, 6), (7, 8), (9, 12), (13, 14)]);
        assert_eq!(doc.word_count(), 5);
    }
}
