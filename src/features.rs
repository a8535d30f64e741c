//! Per-token feature generation for the ID..FEATS columns of a table row.
//!
//! [`FeatureGenerator`] derives the fixed columns from a token's
//! authoritative analysis. Extra FEATS come from pluggable [`FeatureRule`]s
//! that see the whole sentence at once.

use std::fmt::Debug;

use crate::sentence::Sentence;
use crate::token::ClauseAnnotation;

/// Replaces an empty lemma in exported rows.
pub const EMPTY_LEMMA: &str = "??";

/// The ID, FORM, LEMMA, CPOSTAG, POSTAG and FEATS columns of one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFeatures {
    /// 1-based position within the sentence
    pub id: usize,
    pub form: String,
    pub lemma: String,
    pub cpostag: String,
    pub postag: String,
    pub feats: Vec<String>,
}

/// Adds FEATS entries to the tokens of a sentence.
pub trait FeatureRule: Debug + Send + Sync {
    /// Extra features, one list per token of `sentence`.
    fn token_features(&self, sentence: &Sentence) -> Vec<Vec<String>>;
}

/// Marks clause boundaries: `emb_cl_start`, `emb_cl_end` and `clb`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClauseBoundaryFeatures;

impl FeatureRule for ClauseBoundaryFeatures {
    fn token_features(&self, sentence: &Sentence) -> Vec<Vec<String>> {
        sentence
            .tokens
            .iter()
            .map(|token| {
                token
                    .clause_marks
                    .iter()
                    .map(|mark| {
                        match mark {
                            ClauseAnnotation::EmbeddedStart => "emb_cl_start",
                            ClauseAnnotation::EmbeddedEnd => "emb_cl_end",
                            ClauseAnnotation::Boundary => "clb",
                        }
                        .to_string()
                    })
                    .collect()
            })
            .collect()
    }
}

/// Generates the leading six columns of every token of a sentence.
#[derive(Debug, Default)]
pub struct FeatureGenerator {
    ambiguous_pos: bool,
    rules: Vec<Box<dyn FeatureRule>>,
}

impl FeatureGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widen POSTAG to all tags of an ambiguous token.
    pub fn with_ambiguous_pos(mut self, enabled: bool) -> Self {
        self.ambiguous_pos = enabled;
        self
    }

    pub fn with_rule(mut self, rule: impl FeatureRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn ambiguous_pos(&self) -> bool {
        self.ambiguous_pos
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn generate(&self, sentence: &Sentence) -> Vec<TokenFeatures> {
        let extra: Vec<Vec<Vec<String>>> = self
            .rules
            .iter()
            .map(|rule| rule.token_features(sentence))
            .collect();

        sentence
            .tokens
            .iter()
            .enumerate()
            .map(|(wid, token)| {
                let analysis = token.analysis();

                let mut lemma = analysis.lemma.replace(' ', "_");
                if lemma.is_empty() {
                    lemma = EMPTY_LEMMA.to_string();
                }

                let postag = match &token.fine_pos {
                    Some(fine) => fine.clone(),
                    None if self.ambiguous_pos && token.analyses().len() > 1 => {
                        let mut tags: Vec<&str> =
                            token.analyses().iter().map(|a| a.pos.as_str()).collect();
                        tags.sort_unstable();
                        tags.dedup();
                        tags.join("_")
                    }
                    None => analysis.pos.clone(),
                };

                let mut feats: Vec<String> = analysis.categories().map(str::to_string).collect();
                for per_rule in &extra {
                    if let Some(features) = per_rule.get(wid) {
                        feats.extend(features.iter().cloned());
                    }
                }

                TokenFeatures {
                    id: wid + 1,
                    form: token.text.replace(' ', "_"),
                    lemma,
                    cpostag: analysis.pos.clone(),
                    postag,
                    feats,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Analysis, Token};

    fn sentence() -> Sentence {
        let tokens = vec![
            Token::new("s", 0, "New York", vec![Analysis::new("New York", "H", "sg nom")]).unwrap(),
            Token::new(
                "s",
                1,
                "tee",
                vec![Analysis::new("tee", "S", "sg nom"), Analysis::new("tegema", "V", "o")],
            )
            .unwrap()
            .with_clause_mark(ClauseAnnotation::Boundary),
            Token::new("s", 2, "?", vec![Analysis::new("", "Z", "")]).unwrap(),
        ];
        Sentence::new("s", tokens)
    }

    #[test]
    fn spaces_become_underscores_and_empty_lemma_is_marked() {
        let features = FeatureGenerator::new().generate(&sentence());
        assert_eq!(features[0].form, "New_York");
        assert_eq!(features[0].lemma, "New_York");
        assert_eq!(features[2].lemma, EMPTY_LEMMA);
        assert!(features[2].feats.is_empty());
    }

    #[test]
    fn ambiguous_pos_joins_sorted_tags() {
        let plain = FeatureGenerator::new().generate(&sentence());
        assert_eq!(plain[1].postag, "S");

        let widened = FeatureGenerator::new()
            .with_ambiguous_pos(true)
            .generate(&sentence());
        assert_eq!(widened[1].cpostag, "S");
        assert_eq!(widened[1].postag, "S_V");
        assert_eq!(widened[0].postag, "H");
    }

    #[test]
    fn clause_boundary_rule_extends_feats() {
        let features = FeatureGenerator::new()
            .with_rule(ClauseBoundaryFeatures)
            .generate(&sentence());
        assert_eq!(features[1].feats, vec!["sg", "nom", "clb"]);
        assert_eq!(features[0].feats, vec!["sg", "nom"]);
    }
}
