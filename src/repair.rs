//! Cheap, local repair of cyclic dependency annotations.
//!
//! Two rules are applied token by token, in sentence order:
//!
//! 1. **Consecutive mutual cycle**: when token `i` points at `i - 1` and
//!    token `i - 1` points at `i`, every candidate edge of token `i` is
//!    redirected to `i + 1` (or to the root when `i` is the last token).
//!    Token `i - 1` is never touched.
//! 2. **Known cycles**: a closed table of corpus sentences that contain
//!    longer cycles. An entry applies only when the reference sentence text
//!    contains its phrase, the token count matches, and the token at the
//!    given position still points at the offending head.
//!
//! Repair never fails. Cycles that neither rule covers are left in place;
//! [`detect_cycle`] reports them.

use std::borrow::Cow;

use tracing::{info, warn};

use crate::sentence::Sentence;
use crate::token::Head;

/// A catalogued fix for one edge of a sentence known to contain a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownCycle {
    /// Phrase the reference sentence text must contain
    pub phrase: Cow<'static, str>,
    /// Exact number of tokens of the reference sentence
    pub token_count: usize,
    /// 0-based position of the token to fix
    pub position: usize,
    /// 0-based head the token must currently point at
    pub offending_head: usize,
    /// 0-based head to point at instead
    pub replacement: usize,
}

impl KnownCycle {
    pub const fn new(
        phrase: &'static str,
        token_count: usize,
        position: usize,
        offending_head: usize,
        replacement: usize,
    ) -> Self {
        Self {
            phrase: Cow::Borrowed(phrase),
            token_count,
            position,
            offending_head,
            replacement,
        }
    }

    fn applies_to(&self, reference_text: &str, reference_len: usize) -> bool {
        reference_len == self.token_count && reference_text.contains(self.phrase.as_ref())
    }
}

/// Cycles found in the Estonian Dependency Treebank that the consecutive
/// rule cannot resolve.
pub const KNOWN_CYCLES: &[KnownCycle] = &[
    KnownCycle::new("Su nimi sai kuulsaks paganate hulgas", 29, 24, 28, 25),
    KnownCycle::new("Gradstein ja Milanovic , 2002", 47, 42, 43, 40),
    KnownCycle::new("Teadusministeeriumi esindajaks CALIBRATE projektis", 14, 1, 4, 3),
    KnownCycle::new("Teadusministeeriumi esindajaks CALIBRATE projektis", 14, 3, 1, 4),
    KnownCycle::new("Teadusministeeriumi esindajaks CALIBRATE projektis", 14, 4, 5, 10),
];

/// A change made by [`CycleRepair::repair`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairAction {
    /// Token `position` and its predecessor pointed at each other.
    ConsecutiveCycle { position: usize, new_head: Head },
    /// A catalogued fix was applied.
    KnownCycle {
        position: usize,
        old_head: usize,
        new_head: usize,
    },
}

/// Applies the consecutive-cycle rule and a table of known fixes.
#[derive(Debug, Clone)]
pub struct CycleRepair {
    known: Vec<KnownCycle>,
}

impl Default for CycleRepair {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleRepair {
    /// Repair with the built-in [`KNOWN_CYCLES`] table.
    pub fn new() -> Self {
        Self {
            known: KNOWN_CYCLES.to_vec(),
        }
    }

    /// Repair with the consecutive rule only.
    pub fn generic_only() -> Self {
        Self { known: Vec::new() }
    }

    /// Add an entry to the known-cycle table.
    pub fn with_known_cycle(mut self, cycle: KnownCycle) -> Self {
        self.known.push(cycle);
        self
    }

    pub fn known_cycles(&self) -> &[KnownCycle] {
        &self.known
    }

    /// Repair `sentence` in place.
    ///
    /// `reference` holds the tokens of the counterpart sentence and is only
    /// used to decide which known-cycle entries apply.
    pub fn repair<S: AsRef<str>>(&self, sentence: &mut Sentence, reference: &[S]) -> Vec<RepairAction> {
        let reference_text = reference
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        let applicable: Vec<&KnownCycle> = self
            .known
            .iter()
            .filter(|cycle| cycle.applies_to(&reference_text, reference.len()))
            .collect();

        let mut actions = Vec::new();
        let len = sentence.len();

        for wid in 0..len {
            if wid > 0 {
                let this_head = sentence.tokens[wid].head();
                let last_head = sentence.tokens[wid - 1].head();
                if this_head == Some(Head::Index(wid - 1)) && last_head == Some(Head::Index(wid)) {
                    let new_head = if wid + 1 < len {
                        Head::Index(wid + 1)
                    } else {
                        Head::Root
                    };
                    warn!(
                        sentence = %sentence.id,
                        position = wid,
                        previous = %sentence.tokens[wid - 1].text,
                        token = %sentence.tokens[wid].text,
                        ?new_head,
                        "cycle detected in consecutive tokens"
                    );
                    sentence.tokens[wid].edges.set_head(new_head);
                    actions.push(RepairAction::ConsecutiveCycle {
                        position: wid,
                        new_head,
                    });
                }
            }

            for cycle in applicable.iter().filter(|cycle| cycle.position == wid) {
                if sentence.tokens[wid].head() == Some(Head::Index(cycle.offending_head)) {
                    info!(
                        sentence = %sentence.id,
                        position = wid,
                        token = %sentence.tokens[wid].text,
                        phrase = %cycle.phrase,
                        "addressing a known cycle"
                    );
                    sentence.tokens[wid]
                        .edges
                        .set_head(Head::Index(cycle.replacement));
                    actions.push(RepairAction::KnownCycle {
                        position: wid,
                        old_head: cycle.offending_head,
                        new_head: cycle.replacement,
                    });
                }
            }
        }

        actions
    }
}

/// Pairs `(i, j)`, `i < j`, of tokens whose heads point at each other.
pub fn mutual_cycles(sentence: &Sentence) -> Vec<(usize, usize)> {
    let heads = sentence.heads();
    let mut pairs = Vec::new();
    for (i, head) in heads.iter().enumerate() {
        if let Some(Head::Index(j)) = head {
            if *j > i && heads.get(*j).copied().flatten() == Some(Head::Index(i)) {
                pairs.push((i, *j));
            }
        }
    }
    pairs
}

/// Find a cycle among the authoritative heads.
///
/// Returns the positions on the first cycle found, starting from the token
/// where the walk re-entered its own path. Heads outside the sentence end a
/// walk without a cycle.
pub fn detect_cycle(sentence: &Sentence) -> Option<Vec<usize>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    let heads = sentence.heads();
    let mut marks = vec![Mark::Unvisited; heads.len()];

    for start in 0..heads.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        let mut path = Vec::new();
        let mut current = start;
        loop {
            match marks[current] {
                Mark::OnPath => {
                    let entry = path.iter().position(|&p| p == current).unwrap_or(0);
                    return Some(path[entry..].to_vec());
                }
                Mark::Done => break,
                Mark::Unvisited => {}
            }
            marks[current] = Mark::OnPath;
            path.push(current);
            match heads[current] {
                Some(Head::Index(next)) if next < heads.len() => current = next,
                _ => break,
            }
        }
        for position in path {
            marks[position] = Mark::Done;
        }
    }

    None
}
