//! Domain types shared by the keyword and vector engines.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ChunkId = String;

/// Metadata carried from a source document onto every chunk cut from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMeta {
    pub file_path: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub tables: Vec<String>,
}

/// A raw unit of ingested content. Never mutated after creation;
/// preprocessing produces new documents with transformed text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: String,
    pub text: String,
    pub meta: DocMeta,
}

/// A retrieval-sized fragment of a document.
///
/// - `id`: stable identifier derived from document id, position, and content
/// - `doc_id`: weak back-reference to the owning document
/// - `chunk_index`/`total_chunks`: position within the parent document
///
/// Persisted twice per ingest: embedded into the vector store and
/// serialized whole into the keyword node list. The two artifacts must
/// always contain the identical id set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub doc_id: String,
    pub text: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
    pub meta: DocMeta,
}

/// Indicates which engine produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceKind {
    Vector,
    Keyword,
}

/// The minimal surface returned by both engines.
///
/// `id` matches `Chunk::id`. `score` is engine-specific but higher is
/// always better. `source` labels the origin engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ChunkId,
    pub score: f32,
    pub source: SourceKind,
}

/// Query-time view of a chunk. Ephemeral, never persisted.
///
/// `score` is the fused RRF score and drives ordering; `similarity` is
/// the node's best raw retriever score and is what the guardrail
/// compares against its threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedNode {
    pub node_id: ChunkId,
    pub text: String,
    pub score: f32,
    pub similarity: f32,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Structured result of one query: answer (possibly empty), supporting
/// sources, observability metadata, and the abstention flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<RetrievedNode>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub abstained: bool,
}
