//! Counters reported at the end of a batch run.

use std::fmt;

/// Aggregate counts of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignStats {
    pub aligned_sentences: usize,
    pub aligned_tokens: usize,
    pub missing_sentences: usize,
    pub missing_tokens: usize,
    pub mismatch_sentences: usize,
    /// Repairs applied by the cycle repair
    pub repairs: usize,
    /// Sentences still holding a cycle after repair
    pub residual_cycles: usize,
    /// Source sentences that have a UD counterpart (diff mode)
    pub common_sentences: usize,
    /// Source sentences exported because they have no UD counterpart
    pub uncommon_sentences: usize,
    pub uncommon_tokens: usize,
}

impl AlignStats {
    pub fn record_missing(&mut self, tokens: usize) {
        self.missing_sentences += 1;
        self.missing_tokens += tokens;
    }

    pub fn record_aligned(&mut self, tokens: usize) {
        self.aligned_sentences += 1;
        self.aligned_tokens += tokens;
    }
}

impl fmt::Display for AlignStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            " Aligned sentences: {}   missing sentences: {}   mismatch sentences: {}",
            self.aligned_sentences, self.missing_sentences, self.mismatch_sentences
        )?;
        write!(
            f,
            " Aligned tokens:    {}   missing tokens: {}",
            self.aligned_tokens, self.missing_tokens
        )?;
        if self.repairs > 0 || self.residual_cycles > 0 {
            write!(
                f,
                "\n Cycle repairs:     {}   residual cycles: {}",
                self.repairs, self.residual_cycles
            )?;
        }
        if self.common_sentences > 0 || self.uncommon_sentences > 0 {
            write!(
                f,
                "\n Common sentences:  {}   uncommon sentences: {}   uncommon tokens: {}",
                self.common_sentences, self.uncommon_sentences, self.uncommon_tokens
            )?;
        }
        Ok(())
    }
}
