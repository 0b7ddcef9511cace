use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use paperscope_core::traits::Embedder;
use paperscope_core::types::{Chunk, ChunkId};

use crate::index::VectorIndex;

const EMBED_BATCH_SIZE: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: ChunkId,
    pub embedding: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct VectorFile {
    dim: usize,
    records: Vec<VectorRecord>,
}

/// Durable embedding store at a fixed path.
pub struct VectorStore {
    path: PathBuf,
}

impl VectorStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Embed all chunks and persist the records. Returns the loaded
    /// in-memory index for immediate use.
    pub fn build(&self, chunks: &[Chunk], embedder: &dyn Embedder) -> Result<VectorIndex> {
        let dim = embedder.dim();
        let mut records = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embeddings = embedder.embed_batch(&texts)?;
            if embeddings.len() != batch.len() {
                return Err(anyhow!(
                    "embedder returned {} vectors for {} texts",
                    embeddings.len(),
                    batch.len()
                ));
            }
            for (chunk, embedding) in batch.iter().zip(embeddings) {
                if embedding.len() != dim {
                    return Err(anyhow!(
                        "embedding dim {} does not match embedder dim {}",
                        embedding.len(),
                        dim
                    ));
                }
                records.push(VectorRecord {
                    id: chunk.id.clone(),
                    embedding,
                });
            }
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = VectorFile { dim, records };
        fs::write(&self.path, serde_json::to_vec(&file)?)?;
        debug!(
            records = file.records.len(),
            path = %self.path.display(),
            "persisted vector store"
        );
        Ok(VectorIndex::new(file.dim, file.records))
    }

    /// Load the persisted store. Absent or unreadable artifacts are
    /// reported as `None`; the caller treats that as "no valid index".
    pub fn load(&self) -> Option<VectorIndex> {
        if !self.path.is_file() {
            return None;
        }
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read vector store");
                return None;
            }
        };
        match serde_json::from_slice::<VectorFile>(&bytes) {
            Ok(file) if !file.records.is_empty() => {
                debug!(records = file.records.len(), "loaded vector store");
                Some(VectorIndex::new(file.dim, file.records))
            }
            Ok(_) => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not parse vector store");
                None
            }
        }
    }
}
