use super::fixtures::*;
use crate::*;

fn chain(heads: &[Option<usize>]) -> Sentence {
    let tokens = heads
        .iter()
        .enumerate()
        .map(|(idx, head)| linked(&format!("w{idx}"), *head, "@X"))
        .collect();
    Sentence::new("chain", tokens)
}

#[test]
fn consecutive_cycle_redirects_the_later_token() {
    let mut sentence = chain(&[Some(1), None, Some(3), Some(2), Some(1), Some(1)]);
    let reference: Vec<String> = sentence.forms().map(str::to_string).collect();

    let actions = CycleRepair::new().repair(&mut sentence, &reference);

    assert_eq!(
        actions,
        vec![RepairAction::ConsecutiveCycle {
            position: 3,
            new_head: Head::Index(4),
        }]
    );
    assert_eq!(sentence.tokens[2].head(), Some(Head::Index(3)));
    assert_eq!(sentence.tokens[3].head(), Some(Head::Index(4)));
    assert!(mutual_cycles(&sentence).is_empty());
}

#[test]
fn consecutive_cycle_at_sentence_end_becomes_root() {
    let mut sentence = chain(&[None, Some(2), Some(1)]);
    let actions = CycleRepair::generic_only().repair(&mut sentence, &["w0", "w1", "w2"]);

    assert_eq!(
        actions,
        vec![RepairAction::ConsecutiveCycle {
            position: 2,
            new_head: Head::Root,
        }]
    );
    assert_eq!(sentence.heads(), vec![Some(Head::Root), Some(Head::Index(2)), Some(Head::Root)]);
    assert_eq!(detect_cycle(&sentence), None);
}

#[test]
fn repair_updates_every_candidate_edge() {
    let mut sentence = chain(&[None, Some(2), Some(1), Some(0)]);
    sentence.tokens[2]
        .edges
        .push(DependencyEdge::new(Head::Index(1), "@OBJ"));

    CycleRepair::new().repair(&mut sentence, &["w0", "w1", "w2", "w3"]);

    let heads: Vec<Head> = sentence.tokens[2].edges.iter().map(|edge| edge.head).collect();
    assert_eq!(heads, vec![Head::Index(3), Head::Index(3)]);
}

fn calibrate_sentence() -> (Sentence, Vec<&'static str>) {
    let reference = vec![
        "Ta",
        "oli",
        "Teadusministeeriumi",
        "esindajaks",
        "CALIBRATE",
        "projektis",
        ",",
        "mis",
        "kestis",
        "aastatel",
        "2004",
        "kuni",
        "2007",
        ".",
    ];
    let mut heads = vec![Some(10); 14];
    heads[10] = None;
    heads[1] = Some(4);
    heads[3] = Some(1);
    heads[4] = Some(5);
    (chain(&heads), reference)
}

#[test]
fn known_cycles_apply_by_phrase_and_length() {
    let (mut sentence, reference) = calibrate_sentence();

    let actions = CycleRepair::new().repair(&mut sentence, &reference);

    assert_eq!(
        actions,
        vec![
            RepairAction::KnownCycle {
                position: 1,
                old_head: 4,
                new_head: 3,
            },
            RepairAction::KnownCycle {
                position: 3,
                old_head: 1,
                new_head: 4,
            },
            RepairAction::KnownCycle {
                position: 4,
                old_head: 5,
                new_head: 10,
            },
        ]
    );
    assert_eq!(detect_cycle(&sentence), None);
}

#[test]
fn known_cycles_can_be_disabled() {
    let (mut sentence, reference) = calibrate_sentence();
    let before = sentence.heads();

    let actions = CycleRepair::generic_only().repair(&mut sentence, &reference);

    assert!(actions.is_empty());
    assert_eq!(sentence.heads(), before);
}

#[test]
fn known_cycles_need_the_exact_token_count() {
    let (mut sentence, mut reference) = calibrate_sentence();
    reference.push("!");

    let actions = CycleRepair::new().repair(&mut sentence, &reference);
    assert!(actions.is_empty());
}

#[test]
fn extra_known_cycles_extend_the_table() {
    let mut sentence = chain(&[Some(2), Some(0), Some(1), None]);
    assert_eq!(detect_cycle(&sentence), Some(vec![0, 2, 1]));

    let repair = CycleRepair::generic_only().with_known_cycle(KnownCycle::new("w0 w1 w2", 4, 1, 0, 3));
    let actions = repair.repair(&mut sentence, &["w0", "w1", "w2", "w3"]);

    assert_eq!(actions.len(), 1);
    assert_eq!(detect_cycle(&sentence), None);
    assert_eq!(repair.known_cycles().len(), 1);
}

#[test]
fn detect_cycle_reports_longer_loops() {
    let sentence = chain(&[Some(1), Some(2), Some(0), None]);
    assert_eq!(detect_cycle(&sentence), Some(vec![0, 1, 2]));
    assert!(mutual_cycles(&sentence).is_empty());

    let pair = chain(&[Some(1), Some(0)]);
    assert_eq!(mutual_cycles(&pair), vec![(0, 1)]);
}
