//! Minimal reader for Universal Dependencies `.conllu` files.
//!
//! Only sentence ids and surface forms are kept; they are all the batch
//! driver needs to find and check the counterpart sentences.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{CorpusError, CorpusResult};

static SENT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\s*sent_id\s*=?\s*(\S+)\s*$").expect("Invalid sent_id regex"));

/// The id and token forms of one UD sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdSentence {
    /// Value of the last `# sent_id` comment before the sentence
    pub id: Option<String>,
    pub forms: Vec<String>,
    /// 1-based line of the first token
    pub line: usize,
}

impl UdSentence {
    /// Token forms joined by single spaces.
    pub fn text(&self) -> String {
        self.forms.join(" ")
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

pub fn load_ud_sentences(path: &Path) -> CorpusResult<Vec<UdSentence>> {
    let content = fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
    parse_ud(path, &content)
}

/// Parse `.conllu` content; `path` is only used in errors.
pub fn parse_ud(path: &Path, content: &str) -> CorpusResult<Vec<UdSentence>> {
    let mut sentences = Vec::new();
    let mut sent_id: Option<String> = None;
    let mut forms = Vec::new();
    let mut first_line = 0;

    for (idx, line) in content.lines().enumerate() {
        if line.starts_with('#') {
            if let Some(caps) = SENT_ID.captures(line) {
                sent_id = Some(caps[1].to_string());
            }
            continue;
        }

        let line = line.trim_end();
        if line.is_empty() {
            if !forms.is_empty() {
                sentences.push(UdSentence {
                    id: sent_id.take(),
                    forms: std::mem::take(&mut forms),
                    line: first_line,
                });
            }
            continue;
        }

        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() != 10 {
            return Err(CorpusError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
                message: format!("expected 10 columns, found {}: {:?}", columns.len(), line),
            });
        }
        if forms.is_empty() {
            first_line = idx + 1;
        }
        forms.push(columns[1].to_string());
    }

    if !forms.is_empty() {
        sentences.push(UdSentence {
            id: sent_id,
            forms,
            line: first_line,
        });
    }

    Ok(sentences)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# sent_id aja_ee199920_12\n\
                          # text = Öö oli tuuletu .\n\
                          1\tÖö\töö\tNOUN\tS\t_\t2\tnsubj\t_\t_\n\
                          2\toli\tolema\tVERB\tV\t_\t0\troot\t_\t_\n\
                          3\ttuuletu\ttuuletu\tADJ\tA\t_\t2\txcomp\t_\t_\n\
                          4\t.\t.\tPUNCT\tZ\t_\t2\tpunct\t_\t_\n\
                          \n\
                          # sent_id = ilu_kevade_3\n\
                          1\tJah\tjah\tINTJ\tI\t_\t0\troot\t_\t_\n";

    #[test]
    fn reads_ids_and_forms() {
        let sentences = parse_ud(Path::new("sample.conllu"), SAMPLE).unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].id.as_deref(), Some("aja_ee199920_12"));
        assert_eq!(sentences[0].text(), "Öö oli tuuletu .");
        assert_eq!(sentences[0].line, 3);
        assert_eq!(sentences[1].id.as_deref(), Some("ilu_kevade_3"));
        assert_eq!(sentences[1].forms, vec!["Jah"]);
    }

    #[test]
    fn sentence_without_id_has_none() {
        let sentences = parse_ud(
            Path::new("x.conllu"),
            "1\ta\ta\tX\tX\t_\t0\troot\t_\t_\n\n# sent_id x_1\n1\tb\tb\tX\tX\t_\t0\troot\t_\t_\n",
        )
        .unwrap();
        assert_eq!(sentences[0].id, None);
        assert_eq!(sentences[1].id.as_deref(), Some("x_1"));
    }

    #[test]
    fn wrong_column_count_is_fatal() {
        let err = parse_ud(Path::new("bad.conllu"), "# sent_id a_1\n1\tÖö\töö\n").unwrap_err();
        match err {
            CorpusError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
