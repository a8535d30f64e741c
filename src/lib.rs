//! Dependency treebank alignment for layered pipelines.
//!
//! Sentences carry tokens with morphological analyses, candidate dependency
//! edges and clause marks. On top of that this crate provides:
//!
//! ## Modules
//!
//! - [`repair`] - Removes consecutive mutual cycles and catalogued longer cycles
//! - [`table`] - Exports sentences or clauses as 10-column dependency tables
//! - [`remap`] - Rewrites sentence-scoped links into clause-scoped links
//! - [`align`] - Maps parser output back onto document tokens
//! - [`features`] - Generates the per-token columns of exported rows
//! - [`document`] - Documents with character offsets for aligned records
//! - [`display`] - Draws edges and clauses under a sentence for debugging

pub mod align;
pub mod display;
pub mod document;
pub mod errors;
pub mod features;
pub mod remap;
pub mod repair;
pub mod sentence;
pub mod table;
pub mod token;

pub use align::{align_parser_output, AlignOptions, AlignedToken};
pub use display::SentenceDisplay;
pub use document::Document;
pub use errors::{TreebankError, TreebankResult};
pub use features::{ClauseBoundaryFeatures, FeatureGenerator, FeatureRule, TokenFeatures};
pub use remap::{clause_relative_heads, clause_scoped_links, sentence_relative_head};
pub use repair::{detect_cycle, mutual_cycles, CycleRepair, KnownCycle, RepairAction, KNOWN_CYCLES};
pub use sentence::{derive_clause_indices, Clause, Sentence};
pub use table::{read_chunks, render_blocks, rows_to_sentence, Granularity, TableExporter, TableRow};
pub use token::{Analysis, ClauseAnnotation, DependencyEdge, EdgeCandidates, Head, Token};
