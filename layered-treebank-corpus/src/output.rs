//! Output files of a batch run: the table and the sentence-id log.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::{CorpusError, CorpusResult};

/// Writes table blocks as they are produced and collects their sentence ids.
///
/// The table file is truncated when the sink is created. The id log is
/// written by [`TableSink::finish`], one `#<sentence id>` per line, in table
/// order.
#[derive(Debug)]
pub struct TableSink {
    table_path: PathBuf,
    sent_ids_path: PathBuf,
    table: BufWriter<File>,
    sent_ids: Vec<String>,
}

/// Paths written by a finished [`TableSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub table: PathBuf,
    /// `None` when logging was disabled or no sentence was written
    pub sent_ids: Option<PathBuf>,
    pub sentences: usize,
}

impl TableSink {
    /// Create `<base>.<table_extension>` and remember `<base>.sent_ids`.
    pub fn create(base: &Path, table_extension: &str) -> CorpusResult<Self> {
        Self::open(with_extension(base, table_extension), with_extension(base, "sent_ids"))
    }

    /// Create exactly `table_path`; the id log goes next to it.
    pub fn create_at(table_path: &Path) -> CorpusResult<Self> {
        Self::open(table_path.to_path_buf(), with_extension(table_path, "sent_ids"))
    }

    fn open(table_path: PathBuf, sent_ids_path: PathBuf) -> CorpusResult<Self> {
        let file = File::create(&table_path).map_err(|e| CorpusError::io(&table_path, e))?;
        Ok(Self {
            table_path,
            sent_ids_path,
            table: BufWriter::new(file),
            sent_ids: Vec::new(),
        })
    }

    /// Append one exported sentence followed by a blank line.
    pub fn write_sentence(&mut self, sent_id: &str, table: &str) -> CorpusResult<()> {
        self.table
            .write_all(table.as_bytes())
            .and_then(|_| self.table.write_all(b"\n"))
            .map_err(|e| CorpusError::io(&self.table_path, e))?;
        self.sent_ids.push(sent_id.to_string());
        Ok(())
    }

    pub fn sentences_written(&self) -> usize {
        self.sent_ids.len()
    }

    pub fn finish(mut self, log_sent_ids: bool) -> CorpusResult<WrittenFiles> {
        self.table
            .flush()
            .map_err(|e| CorpusError::io(&self.table_path, e))?;

        let sent_ids = if log_sent_ids && !self.sent_ids.is_empty() {
            let file = File::create(&self.sent_ids_path).map_err(|e| CorpusError::io(&self.sent_ids_path, e))?;
            let mut log = BufWriter::new(file);
            for sent_id in &self.sent_ids {
                writeln!(log, "#{sent_id}").map_err(|e| CorpusError::io(&self.sent_ids_path, e))?;
            }
            log.flush().map_err(|e| CorpusError::io(&self.sent_ids_path, e))?;
            Some(self.sent_ids_path)
        } else {
            None
        };

        Ok(WrittenFiles {
            table: self.table_path,
            sent_ids,
            sentences: self.sent_ids.len(),
        })
    }
}

/// `dir/et-train.conllu` + `cg3-conll` -> `dir/et-train.cg3-conll`
///
/// Only the last extension of `base` is replaced; a base without extension
/// gets one appended.
pub fn with_extension(base: &Path, extension: &str) -> PathBuf {
    base.with_extension(extension)
}
