//! The batch driver: align, diff and attach runs.
//!
//! Align and diff both start by matching UD sentences to their source
//! sentences: UD sentences are visited in sent_id order, the source file is
//! located from the id stem and read once per file, and the sentence number
//! picks the source sentence. Every exported sentence is repaired first.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use layered_treebank::{
    align_parser_output, detect_cycle, CycleRepair, Document, FeatureGenerator, Granularity, Sentence,
    TableExporter,
};
use tracing::{debug, info, warn};

use crate::cg3::read_cg3_file;
use crate::config::RunConfig;
use crate::conllu::{load_ud_sentences, UdSentence};
use crate::errors::{CorpusError, CorpusResult};
use crate::locate::{SentenceRef, SourceIndex};
use crate::output::{TableSink, WrittenFiles};
use crate::stats::AlignStats;

/// Output base name of diff runs.
pub const DIFF_BASE_NAME: &str = "et-train-diff";

/// Counts and files of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub stats: AlignStats,
    pub files: WrittenFiles,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.stats)?;
        write!(f, " Table: {}", self.files.table.display())?;
        if let Some(sent_ids) = &self.files.sent_ids {
            write!(f, "\n Sentence ids: {}", sent_ids.display())?;
        }
        Ok(())
    }
}

/// A UD sentence and the source sentence it was matched to.
struct Matched<'a> {
    file: &'a str,
    /// 0-based index of the sentence in `file`
    index: usize,
    ud: &'a UdSentence,
    source: &'a Sentence,
}

/// Runs batches with one configuration.
#[derive(Debug)]
pub struct CorpusAligner {
    config: RunConfig,
    repair: CycleRepair,
    generator: FeatureGenerator,
}

impl CorpusAligner {
    pub fn new(config: RunConfig) -> Self {
        let repair = config.cycle_repair();
        let generator = config.feature_preset.generator();
        Self {
            config,
            repair,
            generator,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Export the source sentences of every sentence of `conll_file`.
    ///
    /// Writes `<base>.<table_extension>` and `<base>.sent_ids`, where base is
    /// `out_base` or `conll_file`, each without its extension.
    pub fn align(&self, conll_file: &Path, source_dir: &Path, out_base: Option<&Path>) -> CorpusResult<RunReport> {
        require_file(conll_file)?;
        require_dir(source_dir)?;
        let started = Instant::now();
        self.log_preset();

        let ud = load_ud_sentences(conll_file)?;
        let index = SourceIndex::scan(source_dir, &self.config.source_extension)?;
        let base = out_base.unwrap_or(conll_file);
        let mut sink = TableSink::create(base, &self.config.table_extension)?;
        let exporter = self.exporter();
        let mut stats = AlignStats::default();

        self.match_sentences(ud, &index, &mut stats, |matched, stats| {
            let mut sentence = matched.source.clone();
            let table = self.export_sentence(&exporter, &mut sentence, &matched.ud.forms, stats)?;
            let sent_id = matched.ud.id.as_deref().unwrap_or(&sentence.id);
            sink.write_sentence(sent_id, &table)
        })?;

        let files = sink.finish(self.config.log_sent_ids)?;
        info!(elapsed = ?started.elapsed(), table = %files.table.display(), "align run completed");
        Ok(RunReport { stats, files })
    }

    /// Export every source sentence that none of `conll_files` contains.
    ///
    /// The output base is `out_name` (default [`DIFF_BASE_NAME`]) in the
    /// directory of the first UD file.
    pub fn diff(&self, source_dir: &Path, conll_files: &[PathBuf], out_name: Option<&str>) -> CorpusResult<RunReport> {
        require_dir(source_dir)?;
        let inputs: Vec<&PathBuf> = conll_files
            .iter()
            .filter(|path| path.is_file() && is_conllu(path))
            .collect();
        let Some(first) = inputs.first() else {
            return Err(CorpusError::InvalidInput(
                "input *.conllu files not found; check the file locations and extensions".to_string(),
            ));
        };
        let started = Instant::now();
        self.log_preset();

        let mut ud = Vec::new();
        for path in &inputs {
            info!(path = %path.display(), "loading input sentences");
            ud.extend(load_ud_sentences(path)?);
        }
        let index = SourceIndex::scan(source_dir, &self.config.source_extension)?;
        let mut stats = AlignStats::default();

        let mut common: HashMap<String, HashSet<usize>> = HashMap::new();
        self.match_sentences(ud, &index, &mut stats, |matched, _| {
            common
                .entry(matched.file.to_string())
                .or_default()
                .insert(matched.index);
            Ok(())
        })?;
        stats.common_sentences = common.values().map(HashSet::len).sum();
        info!(
            aligned = stats.aligned_sentences,
            missing = stats.missing_sentences,
            mismatch = stats.mismatch_sentences,
            common = stats.common_sentences,
            "aligning phase completed"
        );

        let dir = first.parent().unwrap_or_else(|| Path::new(""));
        let base = dir.join(out_name.unwrap_or(DIFF_BASE_NAME));
        let mut sink = TableSink::create(&base, &self.config.table_extension)?;
        let exporter = self.exporter();
        let mut common_seen = 0;

        for file in index.file_names() {
            let in_common = common.get(file);
            for (idx, mut sentence) in read_cg3_file(&index.path_of(file))?.into_iter().enumerate() {
                if in_common.map_or(false, |indices| indices.contains(&idx)) {
                    common_seen += 1;
                    continue;
                }
                let reference: Vec<String> = sentence.forms().map(str::to_string).collect();
                let table = self.export_sentence(&exporter, &mut sentence, &reference, &mut stats)?;
                stats.uncommon_sentences += 1;
                stats.uncommon_tokens += sentence.len();
                sink.write_sentence(&sentence.id, &table)?;
            }
        }
        info!(
            common = common_seen,
            uncommon = stats.uncommon_sentences,
            tokens = stats.uncommon_tokens,
            "differentiating phase completed"
        );

        let files = sink.finish(self.config.log_sent_ids)?;
        info!(elapsed = ?started.elapsed(), table = %files.table.display(), "diff run completed");
        Ok(RunReport { stats, files })
    }

    /// Align parser output back onto a source file and write the re-attached
    /// sentences with sentence-relative heads.
    ///
    /// The output defaults to `<parsed_file>.attached`.
    pub fn attach(&self, source_file: &Path, parsed_file: &Path, out: Option<&Path>) -> CorpusResult<RunReport> {
        require_file(source_file)?;
        require_file(parsed_file)?;
        let started = Instant::now();

        let mut document = Document::from_sentences(read_cg3_file(source_file)?);
        let parsed = fs::read_to_string(parsed_file).map_err(|e| CorpusError::io(parsed_file, e))?;
        let lines: Vec<&str> = parsed.lines().collect();

        let options = self.config.align_options();
        let aligned = align_parser_output(&document, &lines, &options)?;
        info!(
            records = aligned.len(),
            sentences = document.sentence_count(),
            granularity = ?options.granularity,
            "aligned parser output"
        );
        document.attach_parses(&aligned)?;

        let out = match out {
            Some(out) => out.to_path_buf(),
            None => {
                let mut name = parsed_file.as_os_str().to_owned();
                name.push(".attached");
                PathBuf::from(name)
            }
        };
        let mut sink = TableSink::create_at(&out)?;
        let exporter = TableExporter::new(&self.generator, Granularity::Sentences);
        let mut stats = AlignStats::default();
        for sentence in document.sentences_mut() {
            let table = exporter.export_with_syntax(sentence)?;
            stats.record_aligned(sentence.len());
            sink.write_sentence(&sentence.id, &table)?;
        }

        let files = sink.finish(self.config.log_sent_ids)?;
        info!(elapsed = ?started.elapsed(), table = %files.table.display(), "attach run completed");
        Ok(RunReport { stats, files })
    }

    fn exporter(&self) -> TableExporter<'_> {
        TableExporter::new(&self.generator, self.config.feature_preset.granularity())
    }

    fn log_preset(&self) {
        let preset = self.config.feature_preset;
        info!(flag = preset.flag(), settings = preset.help(), "using feature generator");
    }

    /// Repair and export one sentence.
    fn export_sentence(
        &self,
        exporter: &TableExporter<'_>,
        sentence: &mut Sentence,
        reference: &[String],
        stats: &mut AlignStats,
    ) -> CorpusResult<String> {
        let actions = self.repair.repair(sentence, reference);
        stats.repairs += actions.len();
        if let Some(cycle) = detect_cycle(sentence) {
            warn!(sentence = %sentence.id, ?cycle, "cycle left after repair");
            stats.residual_cycles += 1;
        }
        Ok(exporter.export_with_syntax(sentence)?)
    }

    fn match_sentences<F>(
        &self,
        mut ud: Vec<UdSentence>,
        index: &SourceIndex,
        stats: &mut AlignStats,
        mut on_match: F,
    ) -> CorpusResult<()>
    where
        F: FnMut(&Matched<'_>, &mut AlignStats) -> CorpusResult<()>,
    {
        ud.sort_by(|a, b| a.id.cmp(&b.id));
        let mut opened: Option<(String, Vec<Sentence>)> = None;

        for ud_sentence in &ud {
            let Some(sent_id) = ud_sentence.id.as_deref() else {
                warn!(line = ud_sentence.line, "UD sentence without sent_id");
                stats.record_missing(ud_sentence.len());
                continue;
            };
            let reference = SentenceRef::parse(sent_id);
            let Some(file) = index.locate(&reference.stem) else {
                warn!(sent_id, "could not find source file for sentence");
                stats.record_missing(ud_sentence.len());
                continue;
            };

            if opened.as_ref().map(|(name, _)| name.as_str()) != Some(file) {
                let sentences = read_cg3_file(&index.path_of(file))?;
                debug!(file, sentences = sentences.len(), "opened source file");
                opened = Some((file.to_string(), sentences));
            }
            let Some((file, sentences)) = opened.as_ref() else {
                continue;
            };
            if sentences.is_empty() {
                debug!(file = %file, sent_id, "source file holds no sentences");
                continue;
            }

            let number = reference.number.ok_or_else(|| CorpusError::InvalidSentId {
                sent_id: sent_id.to_string(),
                file: file.clone(),
            })?;
            if number == 0 || number > sentences.len() {
                return Err(CorpusError::SentenceOutOfRange {
                    sent_id: sent_id.to_string(),
                    file: file.clone(),
                    number,
                    available: sentences.len(),
                });
            }
            let source = &sentences[number - 1];

            if self.config.check_sentence_identity {
                let source_text = source.text().replace("  ", " ");
                let ud_text = ud_sentence.text();
                if source_text != ud_text {
                    warn!(file = %file, source = %source_text, ud = %ud_text, "mismatching sentences");
                    stats.mismatch_sentences += 1;
                    if self.config.exception_on_mismatch {
                        return Err(CorpusError::SentenceMismatch {
                            file: file.clone(),
                            source_text,
                            ud_text,
                        });
                    }
                }
            }

            stats.record_aligned(ud_sentence.len());
            let matched = Matched {
                file,
                index: number - 1,
                ud: ud_sentence,
                source,
            };
            on_match(&matched, stats)?;
        }

        Ok(())
    }
}

fn is_conllu(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("conllu") | Some("conll")
    )
}

fn require_file(path: &Path) -> CorpusResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CorpusError::InvalidInput(format!("{} is not a file", path.display())))
    }
}

fn require_dir(path: &Path) -> CorpusResult<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CorpusError::InvalidInput(format!("{} is not a directory", path.display())))
    }
}
