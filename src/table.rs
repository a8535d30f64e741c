//! The 10-column dependency table.
//!
//! Columns: `ID FORM LEMMA CPOSTAG POSTAG FEATS HEAD DEPREL PHEAD PDEPREL`,
//! tab-separated, one token per line, processing units separated by a blank
//! line. PHEAD and PDEPREL are always written as `_`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{TreebankError, TreebankResult};
use crate::features::{FeatureGenerator, TokenFeatures};
use crate::remap;
use crate::sentence::Sentence;
use crate::token::{Analysis, DependencyEdge, Head, Token};

/// Placeholder for empty columns.
pub const PLACEHOLDER: &str = "_";
/// DEPREL written when no syntax is exported.
pub const NO_RELATION: &str = "xxx";
/// DEPREL written for root tokens.
pub const ROOT_LABEL: &str = "ROOT";

const COLUMNS: usize = 10;

/// Processing unit of an exported table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One table block per sentence
    #[default]
    Sentences,
    /// One table block per clause, IDs and heads relative to the clause
    Clauses,
}

/// One row of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// 1-based position within the processing unit
    pub id: usize,
    pub form: String,
    pub lemma: String,
    pub cpostag: String,
    pub postag: String,
    pub feats: Vec<String>,
    /// 1-based head, `0` for root, `None` when not given
    pub head: Option<usize>,
    pub deprel: String,
}

impl TableRow {
    /// A row without syntax: HEAD `_`, DEPREL `xxx`.
    pub fn from_features(features: TokenFeatures) -> Self {
        Self {
            id: features.id,
            form: features.form,
            lemma: features.lemma,
            cpostag: features.cpostag,
            postag: features.postag,
            feats: features.feats,
            head: None,
            deprel: NO_RELATION.to_string(),
        }
    }

    /// Set HEAD and DEPREL from an edge; root edges get the `ROOT` label.
    pub fn with_edge(mut self, edge: &DependencyEdge) -> Self {
        self.head = Some(edge.head.to_one_based());
        self.deprel = if edge.head.is_root() {
            ROOT_LABEL.to_string()
        } else {
            edge.label.clone()
        };
        self
    }

    /// Decode a table line; `line` is the 1-based line number used in errors.
    pub fn parse(content: &str, line: usize) -> TreebankResult<Self> {
        let content = content.trim_end_matches(['\r', '\n']);
        let columns: Vec<&str> = content.split('\t').collect();
        if columns.len() != COLUMNS {
            return Err(TreebankError::MalformedRow {
                line,
                columns: columns.len(),
                content: content.to_string(),
            });
        }

        let id = columns[0]
            .parse::<usize>()
            .map_err(|_| TreebankError::InvalidField {
                line,
                field: "ID",
                value: columns[0].to_string(),
            })?;

        let head = match columns[6] {
            PLACEHOLDER => None,
            value => Some(value.parse::<usize>().map_err(|_| TreebankError::InvalidField {
                line,
                field: "HEAD",
                value: value.to_string(),
            })?),
        };

        let feats = match columns[5] {
            PLACEHOLDER | "" => Vec::new(),
            value => value.split('|').map(str::to_string).collect(),
        };

        Ok(Self {
            id,
            form: columns[1].to_string(),
            lemma: columns[2].to_string(),
            cpostag: columns[3].to_string(),
            postag: columns[4].to_string(),
            feats,
            head,
            deprel: columns[7].to_string(),
        })
    }
}

impl fmt::Display for TableRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let feats = if self.feats.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            self.feats.join("|")
        };
        let head = match self.head {
            Some(head) => head.to_string(),
            None => PLACEHOLDER.to_string(),
        };
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.id,
            self.form,
            self.lemma,
            self.cpostag,
            self.postag,
            feats,
            head,
            self.deprel,
            PLACEHOLDER,
            PLACEHOLDER
        )
    }
}

impl FromStr for TableRow {
    type Err = TreebankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, 0)
    }
}

/// Renders sentences as table blocks.
#[derive(Debug)]
pub struct TableExporter<'g> {
    generator: &'g FeatureGenerator,
    granularity: Granularity,
}

impl<'g> TableExporter<'g> {
    pub fn new(generator: &'g FeatureGenerator, granularity: Granularity) -> Self {
        Self {
            generator,
            granularity,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Rows of every processing unit, without syntax.
    pub fn rows(&self, sentence: &mut Sentence) -> Vec<Vec<TableRow>> {
        sentence.sort_analyses();
        let features = self.generator.generate(sentence);
        match self.granularity {
            Granularity::Sentences => {
                vec![features.into_iter().map(TableRow::from_features).collect()]
            }
            Granularity::Clauses => clause_blocks(sentence, features, |_, row| row),
        }
    }

    /// Rows of every processing unit, with HEAD and DEPREL from the
    /// authoritative edges.
    ///
    /// In clause granularity the sentence's heads are rewritten to be
    /// clause-relative first.
    pub fn rows_with_syntax(&self, sentence: &mut Sentence) -> TreebankResult<Vec<Vec<TableRow>>> {
        sentence.sort_analyses();
        if self.granularity == Granularity::Clauses {
            remap::clause_scoped_links(sentence)?;
        }
        let features = self.generator.generate(sentence);
        let tokens = &sentence.tokens;
        let with_edge = |position: usize, row: TableRow| match tokens[position].edges.first() {
            Some(edge) => row.with_edge(edge),
            None => row,
        };

        Ok(match self.granularity {
            Granularity::Sentences => vec![features
                .into_iter()
                .enumerate()
                .map(|(position, features)| with_edge(position, TableRow::from_features(features)))
                .collect()],
            Granularity::Clauses => clause_blocks(sentence, features, with_edge),
        })
    }

    /// Export without syntax as table text.
    pub fn export(&self, sentence: &mut Sentence) -> String {
        render_blocks(&self.rows(sentence))
    }

    /// Export with syntax as table text.
    pub fn export_with_syntax(&self, sentence: &mut Sentence) -> TreebankResult<String> {
        Ok(render_blocks(&self.rows_with_syntax(sentence)?))
    }
}

fn clause_blocks(
    sentence: &Sentence,
    features: Vec<TokenFeatures>,
    finish: impl Fn(usize, TableRow) -> TableRow,
) -> Vec<Vec<TableRow>> {
    let mut features: Vec<Option<TokenFeatures>> = features.into_iter().map(Some).collect();
    sentence
        .clauses()
        .iter()
        .map(|clause| {
            clause
                .members
                .iter()
                .enumerate()
                .filter_map(|(offset, &position)| {
                    let mut row = TableRow::from_features(features[position].take()?);
                    row.id = offset + 1;
                    Some(finish(position, row))
                })
                .collect()
        })
        .collect()
}

/// Render blocks of rows; blocks are separated by a blank line.
pub fn render_blocks(blocks: &[Vec<TableRow>]) -> String {
    let mut out = String::new();
    for (idx, block) in blocks.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        for row in block {
            out.push_str(&row.to_string());
            out.push('\n');
        }
    }
    out
}

/// Split table lines into blank-line-separated chunks of rows.
///
/// Consecutive blank lines count as one separator; a trailing chunk without
/// a closing blank line is kept.
pub fn read_chunks<S: AsRef<str>>(lines: &[S]) -> TreebankResult<Vec<Vec<TableRow>>> {
    let mut chunks = Vec::new();
    let mut current = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if line.trim().is_empty() {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(TableRow::parse(line, idx + 1)?);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    Ok(chunks)
}

/// Rebuild a sentence from one chunk of rows.
///
/// FEATS become the categories of the single analysis, POSTAG is kept as the
/// explicit fine tag, and a given HEAD becomes the token's only edge.
pub fn rows_to_sentence(id: impl Into<String>, rows: &[TableRow]) -> TreebankResult<Sentence> {
    let id = id.into();
    let tokens = rows
        .iter()
        .enumerate()
        .map(|(position, row)| {
            let analysis = Analysis::new(row.lemma.clone(), row.cpostag.clone(), row.feats.join(" "));
            let mut token = Token::new(&id, position, row.form.clone(), vec![analysis])?
                .with_fine_pos(row.postag.clone());
            if let Some(head) = row.head {
                token = token.with_edge(DependencyEdge::new(Head::from_one_based(head), row.deprel.clone()));
            }
            Ok(token)
        })
        .collect::<TreebankResult<Vec<_>>>()?;
    Ok(Sentence::new(id, tokens))
}
