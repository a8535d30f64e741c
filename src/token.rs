//! Tokens, their morphological analyses and their candidate dependency edges.

use serde::{Deserialize, Serialize};

use crate::errors::{TreebankError, TreebankResult};

/// One morphological reading of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// Lemma (root form); may be empty for unknown words
    pub lemma: String,
    /// Part-of-speech tag, e.g. `S`, `V`, `Z`
    pub pos: String,
    /// Space-separated grammatical categories, e.g. `sg nom`
    pub form: String,
    /// Clitic marker (`ki`, `gi`) or empty
    pub clitic: String,
}

impl Analysis {
    pub fn new(lemma: impl Into<String>, pos: impl Into<String>, form: impl Into<String>) -> Self {
        Self {
            lemma: lemma.into(),
            pos: pos.into(),
            form: form.into(),
            clitic: String::new(),
        }
    }

    pub fn with_clitic(mut self, clitic: impl Into<String>) -> Self {
        self.clitic = clitic.into();
        self
    }

    /// Grammatical categories of this reading, in their original order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.form.split_whitespace()
    }

    /// Key used to put ambiguous readings into a deterministic order.
    pub fn sort_key(&self) -> String {
        [
            self.lemma.as_str(),
            self.pos.as_str(),
            self.form.as_str(),
            self.clitic.as_str(),
        ]
        .join("_")
    }
}

/// Where a dependency edge points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Head {
    /// The dependent has no head within its processing unit
    Root,
    /// 0-based position of the head within the same unit
    Index(usize),
}

impl Head {
    /// Decode a 1-based table head (`0` is root).
    pub fn from_one_based(value: usize) -> Self {
        match value {
            0 => Head::Root,
            n => Head::Index(n - 1),
        }
    }

    /// Encode as a 1-based table head (`0` is root).
    pub fn to_one_based(self) -> usize {
        match self {
            Head::Root => 0,
            Head::Index(idx) => idx + 1,
        }
    }

    pub fn index(self) -> Option<usize> {
        match self {
            Head::Root => None,
            Head::Index(idx) => Some(idx),
        }
    }

    pub fn is_root(self) -> bool {
        self == Head::Root
    }
}

/// A labelled link from a dependent token to its head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub head: Head,
    pub label: String,
}

impl DependencyEdge {
    pub fn new(head: Head, label: impl Into<String>) -> Self {
        Self {
            head,
            label: label.into(),
        }
    }

    pub fn root(label: impl Into<String>) -> Self {
        Self::new(Head::Root, label)
    }
}

/// Ordered candidate edges of one token.
///
/// The first candidate is authoritative for export. Repairs go through
/// [`EdgeCandidates::set_head`] so that every candidate stays in sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeCandidates(Vec<DependencyEdge>);

impl EdgeCandidates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(edge: DependencyEdge) -> Self {
        Self(vec![edge])
    }

    pub fn push(&mut self, edge: DependencyEdge) {
        self.0.push(edge);
    }

    pub fn first(&self) -> Option<&DependencyEdge> {
        self.0.first()
    }

    /// Head of the authoritative candidate.
    pub fn head(&self) -> Option<Head> {
        self.0.first().map(|edge| edge.head)
    }

    /// Point every candidate at `head`.
    pub fn set_head(&mut self, head: Head) {
        for edge in &mut self.0 {
            edge.head = head;
        }
    }

    /// Replace all candidates.
    pub fn replace(&mut self, edges: Vec<DependencyEdge>) {
        self.0 = edges;
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<DependencyEdge>> for EdgeCandidates {
    fn from(edges: Vec<DependencyEdge>) -> Self {
        Self(edges)
    }
}

/// Clause segmentation marks carried by a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClauseAnnotation {
    /// A new clause starts after this token
    Boundary,
    /// This token opens an embedded clause
    EmbeddedStart,
    /// The embedded clause closes after this token
    EmbeddedEnd,
}

/// A token of a sentence.
///
/// Deserialized tokens go through the same analysis check as [`Token::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TokenRecord")]
pub struct Token {
    /// Surface text
    pub text: String,
    /// Morphological readings; never empty, the first one is authoritative
    analyses: Vec<Analysis>,
    /// Explicit fine part-of-speech; derived from the analyses when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine_pos: Option<String>,
    /// Candidate dependency edges; empty when no syntax is attached
    pub edges: EdgeCandidates,
    /// Clause segmentation marks
    pub clause_marks: Vec<ClauseAnnotation>,
    /// Character offset of the first character in the document text
    pub start: usize,
    /// Character offset one past the last character in the document text
    pub end: usize,
}

/// Serialized shape of a [`Token`], checked before it becomes one.
#[derive(Debug, Deserialize)]
struct TokenRecord {
    text: String,
    analyses: Vec<Analysis>,
    #[serde(default)]
    fine_pos: Option<String>,
    #[serde(default)]
    edges: EdgeCandidates,
    #[serde(default)]
    clause_marks: Vec<ClauseAnnotation>,
    #[serde(default)]
    start: usize,
    #[serde(default)]
    end: usize,
}

impl TryFrom<TokenRecord> for Token {
    type Error = TreebankError;

    fn try_from(record: TokenRecord) -> TreebankResult<Self> {
        if record.analyses.is_empty() {
            return Err(TreebankError::EmptyToken { text: record.text });
        }
        Ok(Self {
            text: record.text,
            analyses: record.analyses,
            fine_pos: record.fine_pos,
            edges: record.edges,
            clause_marks: record.clause_marks,
            start: record.start,
            end: record.end,
        })
    }
}

impl Token {
    /// Create a token; fails when `analyses` is empty.
    pub fn new(
        sentence: &str,
        position: usize,
        text: impl Into<String>,
        analyses: Vec<Analysis>,
    ) -> TreebankResult<Self> {
        if analyses.is_empty() {
            return Err(TreebankError::MissingAnalysis {
                sentence: sentence.to_string(),
                token: position,
            });
        }
        Ok(Self {
            text: text.into(),
            analyses,
            fine_pos: None,
            edges: EdgeCandidates::new(),
            clause_marks: Vec::new(),
            start: 0,
            end: 0,
        })
    }

    pub fn with_edge(mut self, edge: DependencyEdge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn with_fine_pos(mut self, fine_pos: impl Into<String>) -> Self {
        self.fine_pos = Some(fine_pos.into());
        self
    }

    pub fn with_clause_mark(mut self, mark: ClauseAnnotation) -> Self {
        self.clause_marks.push(mark);
        self
    }

    /// The authoritative analysis.
    pub fn analysis(&self) -> &Analysis {
        &self.analyses[0]
    }

    pub fn analyses(&self) -> &[Analysis] {
        &self.analyses
    }

    pub fn lemma(&self) -> &str {
        &self.analysis().lemma
    }

    pub fn pos(&self) -> &str {
        &self.analysis().pos
    }

    /// Put the readings into their deterministic export order.
    pub fn sort_analyses(&mut self) {
        self.analyses.sort_by_key(Analysis::sort_key);
    }

    /// Head of the authoritative edge, if any syntax is attached.
    pub fn head(&self) -> Option<Head> {
        self.edges.head()
    }

    pub fn has_mark(&self, mark: ClauseAnnotation) -> bool {
        self.clause_marks.contains(&mark)
    }
}
