//! Collaborator contracts at the engine's seams.

use crate::types::{RetrievedNode, SearchHit};

/// External embedding service. Implementations may call out to an
/// inference server or compute deterministic local embeddings.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Ranked keyword search over the indexed chunk set.
pub trait KeywordSearch: Send + Sync {
    fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<SearchHit>>;
}

/// Similarity search over the embedded chunk set.
pub trait VectorSearch: Send + Sync {
    fn search(&self, query_vec: &[f32], k: usize) -> anyhow::Result<Vec<SearchHit>>;
}

/// External answer generation. May fail or stall; callers bound its
/// latency and degrade gracefully on error.
pub trait AnswerGenerator: Send + Sync {
    fn generate(&self, query: &str, context: &[RetrievedNode]) -> anyhow::Result<String>;
}
