use super::fixtures::*;
use crate::*;

#[test]
fn links_inside_a_clause_become_clause_relative() {
    let sentence = embedded_relative();
    let heads = clause_relative_heads(&sentence).unwrap();
    assert_eq!(
        heads,
        vec![
            Some(Head::Index(1)),
            Some(Head::Index(2)),
            Some(Head::Index(2)),
            Some(Head::Root),
            Some(Head::Index(2)),
            Some(Head::Root),
            Some(Head::Index(1)),
        ]
    );
}

#[test]
fn remapped_heads_point_back_at_the_same_tokens() {
    for sentence in [embedded_relative(), repeated_opening(), windless_night(true)] {
        let original = sentence.heads();
        let mapped = clause_relative_heads(&sentence).unwrap();
        let clauses = sentence.clauses();

        for (position, (before, after)) in original.iter().zip(&mapped).enumerate() {
            let clause = clauses
                .iter()
                .find(|clause| clause.members.contains(&position))
                .unwrap();
            let restored = after.and_then(|head| sentence_relative_head(&clause.members, head));

            match before {
                Some(Head::Index(head)) if clause.members.contains(head) => {
                    assert_eq!(restored, Some(Head::Index(*head)), "{} token {position}", sentence.id)
                }
                Some(_) => assert_eq!(restored, Some(Head::Root), "{} token {position}", sentence.id),
                None => assert_eq!(restored, None),
            }
        }
    }
}

#[test]
fn clause_scoped_links_rewrite_all_candidates() {
    let mut sentence = embedded_relative();
    sentence.tokens[0]
        .edges
        .push(DependencyEdge::new(Head::Index(2), "@OBJ"));

    clause_scoped_links(&mut sentence).unwrap();

    let heads: Vec<Head> = sentence.tokens[0].edges.iter().map(|edge| edge.head).collect();
    assert_eq!(heads, vec![Head::Index(1), Head::Index(1)]);
    assert_eq!(sentence.tokens[3].head(), Some(Head::Root));
}

#[test]
fn tokens_without_syntax_are_left_alone() {
    let mut sentence = windless_night(false);
    clause_scoped_links(&mut sentence).unwrap();
    assert!(sentence.heads().iter().all(Option::is_none));
}

#[test]
fn head_outside_the_sentence_is_an_error() {
    let sentence = Sentence::new(
        "broken",
        vec![linked("a", None, "@FMV"), linked("b", Some(9), "@OBJ")],
    );
    let err = clause_relative_heads(&sentence).unwrap_err();
    assert_eq!(
        err,
        TreebankError::HeadOutOfBounds {
            sentence: "broken".into(),
            token: 1,
            head: 9,
        }
    );
}
