//! Corpus readers and the batch driver behind `align-corpus`.
//!
//! Reads VISL-CG3 source files and UD `.conllu` files, matches their
//! sentences by sent_id, and writes repaired dependency tables with
//! [`layered_treebank`].
//!
//! ## Modules
//!
//! - [`cg3`] - Reads `.inforem` files into sentences
//! - [`conllu`] - Reads sentence ids and forms from UD files
//! - [`locate`] - Maps sent_ids onto source file names
//! - [`runner`] - The align, diff and attach runs
//! - [`config`] - TOML run configuration
//! - [`presets`] - The `--f01` .. `--f05` feature presets

pub mod cg3;
pub mod config;
pub mod conllu;
pub mod errors;
pub mod locate;
pub mod output;
pub mod presets;
pub mod runner;
pub mod stats;

pub use cg3::{parse_cg3, read_cg3_file};
pub use config::RunConfig;
pub use conllu::{load_ud_sentences, parse_ud, UdSentence};
pub use errors::{CorpusError, CorpusResult};
pub use locate::{normalize_file_name, SentenceRef, SourceIndex};
pub use output::{TableSink, WrittenFiles};
pub use presets::FeaturePreset;
pub use runner::{CorpusAligner, RunReport, DIFF_BASE_NAME};
pub use stats::AlignStats;

#[cfg(test)]
mod tests {
    mod runner;
}
