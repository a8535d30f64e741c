//! Reader for VISL-CG3 annotated corpus files (`.inforem`).
//!
//! ```text
//! "<s>"
//! "<Öö>"
//!     "öö" L0 S com sg nom @SUBJ #1->2
//! "<oli>"
//!     "ole" Li V main indic impf ps3 sg ps af @FMV #2->0
//! "</s>"
//! ```
//!
//! Word lines are `"<form>"`; the indented lines below a word are its
//! readings: lemma, an optional ending marker, the part-of-speech tag,
//! grammatical categories, syntactic function labels and a `#i->j` link.
//! The pseudo words `"<kindel_piir>"`, `"<kiil>"` and `"</kiil>"` mark
//! clause boundaries and do not become tokens.

use std::fs;
use std::path::Path;

use layered_treebank::{Analysis, ClauseAnnotation, DependencyEdge, Head, Sentence, Token};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::errors::{CorpusError, CorpusResult};

/// Label used for readings without a syntactic function.
pub const MISSING_LABEL: &str = "xxx";

static ENDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^L[0-9\p{L}]*$").expect("Invalid ending regex"));
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#(\d+)->(\d+)$").expect("Invalid link regex"));

const SENTENCE_START: &str = "\"<s>\"";
const SENTENCE_END: &str = "\"</s>\"";

/// Read a CG3 file; sentences are named `<file name>__<index>` (0-based).
pub fn read_cg3_file(path: &Path) -> CorpusResult<Vec<Sentence>> {
    let content = fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_cg3(path, &name, &content)
}

#[derive(Debug)]
struct PendingWord {
    form: String,
    line: usize,
    analyses: Vec<Analysis>,
    edges: Vec<DependencyEdge>,
    marks: Vec<ClauseAnnotation>,
}

#[derive(Debug, Default)]
struct Cg3Reader {
    sentences: Vec<Vec<PendingWord>>,
    current: Vec<PendingWord>,
    word: Option<PendingWord>,
    in_pseudo_word: bool,
    open_embedded: bool,
}

impl Cg3Reader {
    fn flush_word(&mut self) {
        if let Some(word) = self.word.take() {
            self.current.push(word);
        }
    }

    fn flush_sentence(&mut self) {
        self.flush_word();
        if !self.current.is_empty() {
            self.sentences.push(std::mem::take(&mut self.current));
        }
    }

    fn mark_last_word(&mut self, mark: ClauseAnnotation) {
        if let Some(word) = self.current.last_mut() {
            word.marks.push(mark);
        }
    }
}

/// Parse CG3 content; `path` is only used in errors, `name` prefixes the
/// sentence ids.
pub fn parse_cg3(path: &Path, name: &str, content: &str) -> CorpusResult<Vec<Sentence>> {
    let mut reader = Cg3Reader::default();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if line == SENTENCE_START || line == SENTENCE_END {
            reader.flush_sentence();
            reader.in_pseudo_word = false;
            reader.open_embedded = false;
            continue;
        }

        let indented = raw.starts_with(char::is_whitespace);
        if !indented && line.starts_with("\"<") && line.ends_with(">\"") && line.len() >= 4 {
            reader.flush_word();
            let form = &line[2..line.len() - 2];
            reader.in_pseudo_word = true;
            match form {
                "kindel_piir" => reader.mark_last_word(ClauseAnnotation::Boundary),
                "kiil" => reader.open_embedded = true,
                "/kiil" => reader.mark_last_word(ClauseAnnotation::EmbeddedEnd),
                _ => {
                    reader.in_pseudo_word = false;
                    let mut marks = Vec::new();
                    if std::mem::take(&mut reader.open_embedded) {
                        marks.push(ClauseAnnotation::EmbeddedStart);
                    }
                    reader.word = Some(PendingWord {
                        form: form.to_string(),
                        line: idx + 1,
                        analyses: Vec::new(),
                        edges: Vec::new(),
                        marks,
                    });
                }
            }
            continue;
        }

        if indented && line.starts_with('"') {
            if reader.in_pseudo_word {
                continue;
            }
            let Some(word) = reader.word.as_mut() else {
                return Err(CorpusError::Parse {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    message: "reading without a word".to_string(),
                });
            };
            let (analysis, edge) = parse_reading(line).ok_or_else(|| CorpusError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
                message: format!("malformed reading: {line:?}"),
            })?;
            word.analyses.push(analysis);
            word.edges.extend(edge);
            continue;
        }

        debug!(path = %path.display(), line = idx + 1, "skipping unrecognized line");
    }
    reader.flush_sentence();

    reader
        .sentences
        .into_iter()
        .enumerate()
        .map(|(sentence_idx, words)| build_sentence(path, format!("{name}__{sentence_idx}"), words))
        .collect()
}

fn build_sentence(path: &Path, id: String, words: Vec<PendingWord>) -> CorpusResult<Sentence> {
    let mut tokens = Vec::with_capacity(words.len());
    for (position, word) in words.into_iter().enumerate() {
        if word.analyses.is_empty() {
            return Err(CorpusError::Parse {
                path: path.to_path_buf(),
                line: word.line,
                message: format!("word {:?} has no readings", word.form),
            });
        }
        let mut token = Token::new(&id, position, word.form, word.analyses)?;
        token.edges = word.edges.into();
        token.clause_marks = word.marks;
        tokens.push(token);
    }
    Ok(Sentence::new(id, tokens))
}

/// Parse one reading line: `"lemma" [Lx] POS categories... [@FUNC...] [#i->j]`.
fn parse_reading(line: &str) -> Option<(Analysis, Option<DependencyEdge>)> {
    let rest = line.strip_prefix('"')?;
    let lemma_end = rest.find('"')?;
    let lemma = &rest[..lemma_end];

    let mut parts = rest[lemma_end + 1..].split_whitespace().peekable();
    if parts.peek().map_or(false, |part| ENDING.is_match(part)) {
        parts.next();
    }
    let pos = parts.next()?;

    let mut categories = Vec::new();
    let mut label: Option<&str> = None;
    let mut head: Option<Head> = None;
    for part in parts {
        if part.starts_with('@') {
            label.get_or_insert(part);
        } else if let Some(caps) = LINK.captures(part) {
            let parent: usize = caps[2].parse().ok()?;
            head = Some(Head::from_one_based(parent));
        } else {
            categories.push(part);
        }
    }

    let analysis = Analysis::new(lemma, pos, categories.join(" "));
    let edge = head.map(|head| DependencyEdge::new(head, label.unwrap_or(MISSING_LABEL)));
    Some((analysis, edge))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELATIVE_CLAUSE: &str = r#""<s>"
"<Mees>"
	"mees" L0 S com sg nom @SUBJ #1->6
"<kiil>"
	"kiil" Y nominal
"<,>"
	"," Z Com CLB #2->4
"<kes>"
	"kes" L0 P rel sg nom @SUBJ #3->4
"<tuli>"
	"tule" Li V main indic impf ps3 sg ps af @FMV #4->1
"<,>"
	"," Z Com CLB #5->4
"</kiil>"
"<istus>"
	"istu" Ls V main indic impf ps3 sg ps af @FMV #6->0
"<kindel_piir>"
"<ja>"
	"ja" L0 J crd @J #7->8
"<läks>"
	"mine" Ls V main indic impf ps3 sg ps af @FMV #8->6
"<.>"
	"." Z Fst CLB #9->8
"</s>"
"#;

    fn parse(content: &str) -> CorpusResult<Vec<Sentence>> {
        parse_cg3(Path::new("ilu_mees.inforem"), "ilu_mees.inforem", content)
    }

    #[test]
    fn pseudo_words_become_clause_marks() {
        let sentences = parse(RELATIVE_CLAUSE).unwrap();
        assert_eq!(sentences.len(), 1);
        let sentence = &sentences[0];

        assert_eq!(sentence.id, "ilu_mees.inforem__0");
        assert_eq!(sentence.text(), "Mees , kes tuli , istus ja läks .");
        assert_eq!(sentence.clause_indices(), &[0, 1, 1, 1, 1, 0, 2, 2, 2]);
        assert!(sentence.tokens[1].has_mark(ClauseAnnotation::EmbeddedStart));
        assert!(sentence.tokens[4].has_mark(ClauseAnnotation::EmbeddedEnd));
        assert!(sentence.tokens[5].has_mark(ClauseAnnotation::Boundary));

        // links count words only, pseudo words are skipped
        assert_eq!(sentence.tokens[3].head(), Some(Head::Index(0)));
        assert_eq!(sentence.tokens[5].head(), Some(Head::Root));
        assert_eq!(sentence.tokens[7].head(), Some(Head::Index(5)));
        assert_eq!(sentence.tokens[1].analyses().len(), 1);
    }

    #[test]
    fn sentence_tags_split_and_stray_words_are_gathered() {
        let content = "\"<Jah>\"\n\t\"jah\" L0 I @B #1->0\n\
                       \"<s>\"\n\
                       \"<Ei>\"\n\t\"ei\" L0 D @ADVL #1->0\n\
                       \"<kiil>\"\n\
                       \"</s>\"\n\
                       ; comment\n\
                       \"<s>\"\n\
                       \"<Nii>\"\n\t\"nii\" L0 D @ADVL #1->0\n\
                       \"</s>\"\n";
        let sentences = parse(content).unwrap();

        let texts: Vec<String> = sentences.iter().map(Sentence::text).collect();
        assert_eq!(texts, vec!["Jah", "Ei", "Nii"]);
        assert_eq!(sentences[2].id, "ilu_mees.inforem__2");
        // an embedded clause opened at a sentence end does not leak
        assert!(sentences[2].tokens[0].clause_marks.is_empty());
        assert_eq!(sentences[2].clause_indices(), &[0]);
    }

    #[test]
    fn reading_without_word_is_fatal() {
        let err = parse("\"<s>\"\n\t\"jah\" L0 I @B #1->0\n").unwrap_err();
        match err {
            CorpusError::Parse { line, message, .. } => {
                assert_eq!(line, 2);
                assert_eq!(message, "reading without a word");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn word_without_readings_is_fatal() {
        let err = parse("\"<s>\"\n\"<Jah>\"\n\"</s>\"\n").unwrap_err();
        match err {
            CorpusError::Parse { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("has no readings"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reading_fields() {
        let (analysis, edge) = parse_reading("\"ole\" Li V main indic impf ps3 sg ps af @FMV #2->0").unwrap();
        assert_eq!(analysis.lemma, "ole");
        assert_eq!(analysis.pos, "V");
        assert_eq!(analysis.form, "main indic impf ps3 sg ps af");
        assert_eq!(edge, Some(DependencyEdge::root("@FMV")));
    }

    #[test]
    fn reading_without_ending_or_label() {
        let (analysis, edge) = parse_reading("\".\" Z Fst CLB #5->2").unwrap();
        assert_eq!(analysis.pos, "Z");
        assert_eq!(analysis.form, "Fst CLB");
        assert_eq!(edge, Some(DependencyEdge::new(Head::Index(1), MISSING_LABEL)));
    }

    #[test]
    fn reading_without_link_has_no_edge() {
        let (analysis, edge) = parse_reading("\"maja\" L0 S com sg nom").unwrap();
        assert_eq!(analysis.lemma, "maja");
        assert_eq!(edge, None);
        assert!(parse_reading("maja S").is_none());
    }
}
