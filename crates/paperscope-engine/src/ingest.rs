//! Ingestion pipeline: load → preprocess → chunk → build/persist → stats.
//!
//! Steps are strictly ordered. Stats are computed and written only after
//! the vector store, keyword index, and chunk list are all durably
//! written, so persisted stats always describe complete artifacts. Any
//! earlier failure propagates upward and leaves no stats behind.

use chrono::Utc;
use tracing::info;

use paperscope_core::chunker::Chunker;
use paperscope_core::config::EngineConfig;
use paperscope_core::error::{Error, Result};
use paperscope_core::loader::DocumentLoader;
use paperscope_core::preprocess::Preprocessor;
use paperscope_core::traits::Embedder;
use paperscope_core::types::Chunk;
use paperscope_text::KeywordIndex;
use paperscope_vector::{VectorIndex, VectorStore};

use crate::store::{ChunkStore, IndexPaths, IngestionStats, StatsStore};
use crate::INDEX_VERSION;

/// Fresh, query-ready state produced by one ingestion run.
#[derive(Debug)]
pub struct IngestedIndex {
    pub vector: VectorIndex,
    pub keyword: KeywordIndex,
    pub chunks: Vec<Chunk>,
    pub stats: IngestionStats,
}

pub struct IngestionPipeline<'a> {
    config: &'a EngineConfig,
    embedder: &'a dyn Embedder,
    paths: IndexPaths,
}

impl<'a> IngestionPipeline<'a> {
    pub fn new(config: &'a EngineConfig, embedder: &'a dyn Embedder) -> Self {
        let paths = IndexPaths::new(&config.resolved_index_dir());
        Self {
            config,
            embedder,
            paths,
        }
    }

    /// Run all ingestion steps in order.
    ///
    /// Returns `Error::NoDocuments` when the configured directories yield
    /// nothing; this is fatal to ingestion and must reach the caller.
    pub fn run(&self) -> Result<IngestedIndex> {
        let dirs = self.config.resolved_data_dirs();
        info!(
            dirs = ?dirs,
            embedding_model = %self.config.embedding_model,
            "starting ingestion"
        );

        let searched = dirs
            .iter()
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let loader = DocumentLoader::new(&self.config.extensions);
        let docs = loader.load(&dirs)?;
        if docs.is_empty() {
            return Err(Error::NoDocuments(searched));
        }

        let preprocessor = Preprocessor::new(self.config.preprocess);
        let docs = preprocessor.preprocess(&docs);

        let chunker = Chunker::new(self.config.chunk_size, self.config.chunk_overlap)?;
        let chunks = chunker.chunk_documents(&docs);
        // Preprocessing can strip a document to nothing. Zero chunks would
        // persist empty artifacts that never load back, so it is as fatal
        // as an empty directory.
        if chunks.is_empty() {
            return Err(Error::NoDocuments(format!(
                "{searched} (no usable text after preprocessing)"
            )));
        }

        let vector = VectorStore::new(self.paths.vectors.clone())
            .build(&chunks, self.embedder)
            .map_err(|e| Error::Store(format!("vector store build: {e}")))?;
        let keyword = KeywordIndex::build(&self.paths.keyword_dir, &chunks)
            .map_err(|e| Error::Store(format!("keyword index build: {e}")))?;
        ChunkStore::new(self.paths.chunks.clone())
            .persist(&chunks)
            .map_err(|e| Error::Store(format!("chunk list persist: {e}")))?;

        // All artifacts are durable; only now may stats exist.
        let stats = self.compute_stats(&docs, &chunks);
        StatsStore::new(self.paths.stats.clone())
            .write(&stats)
            .map_err(|e| Error::Store(format!("stats write: {e}")))?;

        info!(
            documents = stats.document_count,
            chunks = stats.chunk_count,
            "ingestion complete"
        );
        Ok(IngestedIndex {
            vector,
            keyword,
            chunks,
            stats,
        })
    }

    fn compute_stats(
        &self,
        docs: &[paperscope_core::types::Document],
        chunks: &[Chunk],
    ) -> IngestionStats {
        let total_chars: usize = chunks.iter().map(|c| c.text.len()).sum();
        let avg = if chunks.is_empty() {
            0.0
        } else {
            let raw = total_chars as f64 / chunks.len() as f64;
            (raw * 100.0).round() / 100.0
        };
        IngestionStats {
            document_count: docs.len(),
            chunk_count: chunks.len(),
            total_chars,
            avg_chunk_size: avg,
            paths: docs.iter().map(|d| d.meta.file_path.clone()).collect(),
            index_version: INDEX_VERSION.to_string(),
            created_at: Utc::now(),
            fingerprint: self.config.fingerprint(),
        }
    }
}
