//! Configuration fingerprint that decides index validity.
//!
//! A persisted index is only reusable when every fingerprint field of the
//! live configuration matches the fingerprint recorded at ingestion time.
//! Comparison is total, typed equality on value structs rather than
//! key-presence-dependent map comparison.

use serde::{Deserialize, Serialize};

/// Independent toggles for noise stripping before chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    pub remove_tables: bool,
    pub remove_footnotes: bool,
    pub remove_inline_citations: bool,
    pub remove_reference_section: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            remove_tables: true,
            remove_footnotes: true,
            remove_inline_citations: true,
            remove_reference_section: true,
        }
    }
}

/// The configuration subset that determines whether a persisted index is
/// still valid. The embedding model identifier is a first-class field,
/// never inferred from the stored vectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexFingerprint {
    pub embedding_model: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub preprocess: PreprocessConfig,
}
