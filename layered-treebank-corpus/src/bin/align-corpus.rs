//! Align a UD treebank with its VISL-CG3 source corpus.
//!
//! # Usage
//!
//! ```bash
//! # Export source sentences of every sentence in et-dev.conllu
//! align-corpus align et-dev.conllu corpus/ --f04
//!
//! # Export source sentences missing from the UD files
//! align-corpus diff corpus/ et-train.conllu et-dev.conllu -o et-rest
//!
//! # Attach parser output back onto a source file
//! align-corpus attach corpus/aja_ee_1999_20.inforem aja.parsed --f05
//! ```
//!
//! Logs go to stderr; `RUST_LOG` overrides the `-v` level.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use layered_treebank_corpus::{CorpusAligner, CorpusResult, FeaturePreset, RunConfig, RunReport};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "align-corpus")]
#[command(version)]
#[command(about = "Align a UD treebank with its VISL-CG3 source corpus and export dependency tables")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the source sentences of every sentence of a UD file
    Align {
        /// UD file (.conllu) holding the sent_ids to align
        conll_file: PathBuf,

        /// Directory of source corpus files
        source_dir: PathBuf,

        /// Output base; the table and id log get their own extensions
        #[arg(short, long)]
        out_file: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Export the source sentences that none of the UD files contain
    Diff {
        /// Directory of source corpus files
        source_dir: PathBuf,

        /// UD files (.conllu); files with other extensions are skipped
        #[arg(required = true)]
        conll_files: Vec<PathBuf>,

        /// Output base name, placed next to the first UD file
        #[arg(short, long)]
        out_file: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Attach parser output back onto a source file
    Attach {
        /// Source corpus file the parser input was exported from
        source_file: PathBuf,

        /// Parser output table
        parsed_file: PathBuf,

        /// Output table [default: <PARSED_FILE>.attached]
        #[arg(short, long)]
        out_file: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    #[command(flatten)]
    preset: PresetFlags,

    /// TOML run configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Abort on the first mismatching sentence
    #[arg(long)]
    strict: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args)]
#[group(multiple = false)]
struct PresetFlags {
    /// Default feature generator: split_by=sentences, ambiguous_pos=true
    #[arg(long)]
    f01: bool,

    /// split_by=sentences
    #[arg(long)]
    f02: bool,

    /// split_by=sentences, ambiguous_pos=true
    #[arg(long)]
    f03: bool,

    /// split_by=sentences, ambiguous_pos=true, clause_boundaries=true
    #[arg(long)]
    f04: bool,

    /// split_by=clauses
    #[arg(long)]
    f05: bool,
}

impl PresetFlags {
    fn selected(&self) -> Option<FeaturePreset> {
        let flags = [self.f01, self.f02, self.f03, self.f04, self.f05];
        FeaturePreset::ALL
            .into_iter()
            .zip(flags)
            .find_map(|(preset, set)| set.then_some(preset))
    }
}

impl CommonArgs {
    fn load_config(&self) -> CorpusResult<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };
        if let Some(preset) = self.preset.selected() {
            config.feature_preset = preset;
        }
        if self.strict {
            config.exception_on_mismatch = true;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let common = match &cli.command {
        Commands::Align { common, .. } | Commands::Diff { common, .. } | Commands::Attach { common, .. } => common,
    };
    init_tracing(common.verbose);

    match &cli.command {
        Commands::Align {
            conll_file,
            source_dir,
            ..
        } => {
            require_file(conll_file);
            require_dir(source_dir);
        }
        Commands::Diff { source_dir, .. } => require_dir(source_dir),
        Commands::Attach {
            source_file,
            parsed_file,
            ..
        } => {
            require_file(source_file);
            require_file(parsed_file);
        }
    }

    match run(&cli.command, common) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Commands, common: &CommonArgs) -> CorpusResult<RunReport> {
    let config = common.load_config()?;
    let preset = config.feature_preset;
    println!("Using feature generator {}: {}", preset.flag(), preset.help());
    let aligner = CorpusAligner::new(config);

    match command {
        Commands::Align {
            conll_file,
            source_dir,
            out_file,
            ..
        } => aligner.align(conll_file, source_dir, out_file.as_deref()),
        Commands::Diff {
            source_dir,
            conll_files,
            out_file,
            ..
        } => aligner.diff(source_dir, conll_files, out_file.as_deref()),
        Commands::Attach {
            source_file,
            parsed_file,
            out_file,
            ..
        } => aligner.attach(source_file, parsed_file, out_file.as_deref()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Exits with a usage error unless `path` is a file.
fn require_file(path: &Path) {
    if !path.is_file() {
        Cli::command()
            .error(ErrorKind::ValueValidation, format!("{} is not a file", path.display()))
            .exit();
    }
}

/// Exits with a usage error unless `path` is a directory.
fn require_dir(path: &Path) {
    if !path.is_dir() {
        Cli::command()
            .error(ErrorKind::ValueValidation, format!("{} is not a directory", path.display()))
            .exit();
    }
}
