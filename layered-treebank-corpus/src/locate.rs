//! Mapping UD sentence ids onto source corpus files.
//!
//! A UD sent_id looks like `aja_ee199920_12`: a file stem followed by the
//! 1-based number of the sentence inside that file. Source file names are
//! normalized (underscores dropped, lowercased, genre prefix re-separated)
//! before the stem is matched against their start.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{CorpusError, CorpusResult};

static SENT_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+)_(\d+)$").expect("Invalid sent_id regex"));
static GENRE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(aja|ilu|tea)(.+)$").expect("Invalid genre prefix regex"));

/// A UD sent_id split into file stem and sentence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceRef {
    pub stem: String,
    /// 1-based sentence number; `None` when the id carries no number
    pub number: Option<usize>,
}

impl SentenceRef {
    pub fn parse(sent_id: &str) -> Self {
        match SENT_NUMBER.captures(sent_id) {
            Some(caps) => SentenceRef {
                stem: caps[1].to_string(),
                number: caps[2].parse().ok(),
            },
            None => SentenceRef {
                stem: sent_id.to_string(),
                number: None,
            },
        }
    }
}

/// `aja_EE_1999_20.inforem` -> `aja_ee199920.inforem`
pub fn normalize_file_name(name: &str) -> String {
    let squeezed = name.replace('_', "").to_lowercase();
    GENRE_PREFIX.replace(&squeezed, "${1}_${2}").into_owned()
}

/// Source corpus files of one directory, sorted by name.
#[derive(Debug, Clone)]
pub struct SourceIndex {
    dir: PathBuf,
    files: Vec<(String, String)>,
}

impl SourceIndex {
    /// List the files of `dir` that end in `.<extension>`.
    pub fn scan(dir: &Path, extension: &str) -> CorpusResult<Self> {
        let suffix = format!(".{extension}");
        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| CorpusError::io(dir, e))? {
            let entry = entry.map_err(|e| CorpusError::io(dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(&suffix) {
                names.push(name);
            }
        }
        Ok(Self::from_names(dir, names))
    }

    pub fn from_names(dir: &Path, mut names: Vec<String>) -> Self {
        names.sort();
        let files = names
            .into_iter()
            .map(|name| {
                let normalized = normalize_file_name(&name);
                (name, normalized)
            })
            .collect();
        Self {
            dir: dir.to_path_buf(),
            files,
        }
    }

    /// First file (in name order) whose normalized name starts with `stem`.
    pub fn locate(&self, stem: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(_, normalized)| normalized.starts_with(stem))
            .map(|(name, _)| name.as_str())
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sent_id_splits_on_last_number() {
        assert_eq!(
            SentenceRef::parse("aja_ee199920_12"),
            SentenceRef {
                stem: "aja_ee199920".into(),
                number: Some(12)
            }
        );
        assert_eq!(SentenceRef::parse("ilu_kevade").number, None);
    }

    #[test]
    fn file_names_normalize_to_sent_id_stems() {
        assert_eq!(normalize_file_name("aja_EE_1999_20.inforem"), "aja_ee199920.inforem");
        assert_eq!(normalize_file_name("tea_AKP_2.inforem"), "tea_akp2.inforem");
        assert_eq!(normalize_file_name("muu_1.inforem"), "muu1.inforem");
    }

    #[test]
    fn locate_prefers_first_sorted_match() {
        let index = SourceIndex::from_names(
            Path::new("corpus"),
            vec!["aja_ee_1999_20b.inforem".into(), "aja_ee_1999_20.inforem".into()],
        );
        assert_eq!(index.locate("aja_ee199920"), Some("aja_ee_1999_20.inforem"));
        assert_eq!(index.locate("ilu_kevade"), None);
        assert_eq!(index.path_of("x.inforem"), Path::new("corpus").join("x.inforem"));
    }
}
