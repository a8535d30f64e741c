//! Named feature-generation presets.

use layered_treebank::{ClauseBoundaryFeatures, FeatureGenerator, Granularity};
use serde::{Deserialize, Serialize};

/// A fixed menu of generator settings, selected by `--f01` .. `--f05`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeaturePreset {
    /// Ambiguous POS tags
    #[default]
    F01,
    /// Plain columns
    F02,
    /// Ambiguous POS tags
    F03,
    /// Ambiguous POS tags and clause boundary features
    F04,
    /// Plain columns, one table block per clause
    F05,
}

impl FeaturePreset {
    pub const ALL: [FeaturePreset; 5] = [
        FeaturePreset::F01,
        FeaturePreset::F02,
        FeaturePreset::F03,
        FeaturePreset::F04,
        FeaturePreset::F05,
    ];

    pub fn flag(self) -> &'static str {
        match self {
            FeaturePreset::F01 => "--f01",
            FeaturePreset::F02 => "--f02",
            FeaturePreset::F03 => "--f03",
            FeaturePreset::F04 => "--f04",
            FeaturePreset::F05 => "--f05",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            FeaturePreset::F01 => "default feature generator: split_by=sentences, ambiguous_pos=true",
            FeaturePreset::F02 => "split_by=sentences",
            FeaturePreset::F03 => "split_by=sentences, ambiguous_pos=true",
            FeaturePreset::F04 => "split_by=sentences, ambiguous_pos=true, clause_boundaries=true",
            FeaturePreset::F05 => "split_by=clauses",
        }
    }

    pub fn generator(self) -> FeatureGenerator {
        match self {
            FeaturePreset::F01 | FeaturePreset::F03 => FeatureGenerator::new().with_ambiguous_pos(true),
            FeaturePreset::F02 | FeaturePreset::F05 => FeatureGenerator::new(),
            FeaturePreset::F04 => FeatureGenerator::new()
                .with_ambiguous_pos(true)
                .with_rule(ClauseBoundaryFeatures),
        }
    }

    pub fn granularity(self) -> Granularity {
        match self {
            FeaturePreset::F05 => Granularity::Clauses,
            _ => Granularity::Sentences,
        }
    }
}
