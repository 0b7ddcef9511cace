//! paperscope-text
//!
//! Tantivy-backed keyword (BM25) index over chunks. Built fresh from the
//! chunk list at ingest time and reopened read-only for queries.

pub mod index;
pub mod tantivy_utils;

pub use index::KeywordIndex;
