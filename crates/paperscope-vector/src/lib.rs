//! paperscope-vector
//!
//! Persisted embedding store with in-memory cosine similarity search.
//! Chunks are embedded at build time and written as one JSON artifact;
//! queries load the artifact once and search it in memory.

pub mod index;
pub mod store;

pub use index::VectorIndex;
pub use store::VectorStore;
