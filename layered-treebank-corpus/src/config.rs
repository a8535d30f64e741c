//! Run configuration loaded from TOML.

use std::fs;
use std::path::Path;

use layered_treebank::{AlignOptions, CycleRepair};
use serde::{Deserialize, Serialize};

use crate::errors::{CorpusError, CorpusResult};
use crate::presets::FeaturePreset;

/// Settings of one batch run.
///
/// ```toml
/// check_sentence_identity = true
/// exception_on_mismatch = false
/// feature_preset = "f04"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Compare the surface text of aligned sentences
    pub check_sentence_identity: bool,
    /// Abort the run on the first mismatching sentence
    pub exception_on_mismatch: bool,
    /// Write the `.sent_ids` log next to the table
    pub log_sent_ids: bool,
    pub feature_preset: FeaturePreset,
    /// Extension of the written table file
    pub table_extension: String,
    /// Extension of source corpus files
    pub source_extension: String,
    /// Apply the catalogued known-cycle fixes
    pub known_cycle_fixes: bool,
    /// Compare parser output forms against the source tokens
    pub check_tokens: bool,
    /// Annotate aligned records with document and sentence positions
    pub add_word_ids: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            check_sentence_identity: true,
            exception_on_mismatch: false,
            log_sent_ids: true,
            feature_preset: FeaturePreset::default(),
            table_extension: "cg3-conll".to_string(),
            source_extension: "inforem".to_string(),
            known_cycle_fixes: true,
            check_tokens: true,
            add_word_ids: false,
        }
    }
}

impl RunConfig {
    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> CorpusResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;

        toml::from_str(&content).map_err(|e| CorpusError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn cycle_repair(&self) -> CycleRepair {
        if self.known_cycle_fixes {
            CycleRepair::new()
        } else {
            CycleRepair::generic_only()
        }
    }

    pub fn align_options(&self) -> AlignOptions {
        AlignOptions {
            granularity: self.feature_preset.granularity(),
            check_tokens: self.check_tokens,
            add_word_ids: self.add_word_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_treebank::Granularity;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.table_extension, "cg3-conll");
        assert!(config.check_sentence_identity);
        assert!(!config.exception_on_mismatch);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "feature_preset = \"f05\"").unwrap();
        writeln!(file, "known_cycle_fixes = false").unwrap();
        writeln!(file, "add_word_ids = true").unwrap();

        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.feature_preset, FeaturePreset::F05);
        assert!(config.cycle_repair().known_cycles().is_empty());
        assert_eq!(config.align_options().granularity, Granularity::Clauses);
        assert!(config.align_options().add_word_ids);
        assert!(config.log_sent_ids);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "split_by = \"clauses\"").unwrap();

        let err = RunConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, CorpusError::Config { .. }), "{err}");
    }
}
