use crate::{Analysis, ClauseAnnotation, DependencyEdge, Head, Sentence, Token};

/// A token with a single analysis and no syntax.
pub fn word(form: &str, lemma: &str, pos: &str, categories: &str) -> Token {
    Token::new("fixture", 0, form, vec![Analysis::new(lemma, pos, categories)]).unwrap()
}

/// A token whose lemma equals its form, linked to a 0-based head (`None` for root).
pub fn linked(form: &str, head: Option<usize>, label: &str) -> Token {
    let head = head.map(Head::Index).unwrap_or(Head::Root);
    word(form, form, "S", "").with_edge(DependencyEdge::new(head, label))
}

pub fn marked(token: Token, mark: ClauseAnnotation) -> Token {
    token.with_clause_mark(mark)
}

/// "Öö oli täiesti tuuletu ." with optional syntax.
pub fn windless_night(with_syntax: bool) -> Sentence {
    let edges: [(Option<usize>, &str); 5] = [
        (Some(1), "@SUBJ"),
        (None, "@FMV"),
        (Some(3), "@ADVL"),
        (Some(1), "@PRD"),
        (Some(1), "@Punc"),
    ];
    let words = [
        word("Öö", "öö", "S", "sg nom"),
        word("oli", "olema", "V", "indic impf ps3 sg ps af"),
        word("täiesti", "täiesti", "D", ""),
        word("tuuletu", "tuuletu", "A", "pos sg nom"),
        word(".", ".", "Z", "Fst"),
    ];
    let tokens = words
        .into_iter()
        .zip(edges)
        .map(|(token, (head, label))| {
            if with_syntax {
                let head = head.map(Head::Index).unwrap_or(Head::Root);
                token.with_edge(DependencyEdge::new(head, label))
            } else {
                token
            }
        })
        .collect();
    Sentence::new("aja_ee199920_12", tokens)
}

/// "Mees , kes tuli , istus ." with an embedded relative clause.
///
/// Clause indices are `[0, 1, 1, 1, 1, 0, 0]`.
pub fn embedded_relative() -> Sentence {
    use ClauseAnnotation::*;
    Sentence::new(
        "ilu_kevade_3",
        vec![
            linked("Mees", Some(5), "@SUBJ"),
            marked(linked(",", Some(3), "@Punc"), EmbeddedStart),
            linked("kes", Some(3), "@SUBJ"),
            linked("tuli", Some(0), "@AN>"),
            marked(linked(",", Some(3), "@Punc"), EmbeddedEnd),
            linked("istus", None, "@FMV"),
            linked(".", Some(5), "@Punc"),
        ],
    )
}

/// "ta tuli , ta läks koju ." where both clauses start with "ta".
///
/// Clause indices are `[0, 0, 0, 1, 1, 1, 1]`.
pub fn repeated_opening() -> Sentence {
    use ClauseAnnotation::*;
    Sentence::new(
        "tea_akp_7",
        vec![
            linked("ta", Some(1), "@SUBJ"),
            linked("tuli", None, "@FMV"),
            marked(linked(",", Some(1), "@Punc"), Boundary),
            linked("ta", Some(4), "@SUBJ"),
            linked("läks", None, "@FMV"),
            linked("koju", Some(4), "@ADVL"),
            linked(".", Some(4), "@Punc"),
        ],
    )
}

pub fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}
