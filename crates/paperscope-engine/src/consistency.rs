//! Index lifecycle: decide between reusing persisted state and
//! rebuilding from source documents.
//!
//! Reuse requires all of: readable stats whose fingerprint equals the
//! current configuration's, a loadable vector store, a loadable chunk
//! list, an openable keyword index, and identical chunk-id sets across
//! the vector and chunk artifacts. Any failed check falls back to a full
//! rebuild. Partial state is never served.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{info, warn};

use paperscope_core::config::EngineConfig;
use paperscope_core::error::Result;
use paperscope_core::traits::Embedder;
use paperscope_core::types::Chunk;
use paperscope_text::KeywordIndex;
use paperscope_vector::{VectorIndex, VectorStore};

use crate::ingest::IngestionPipeline;
use crate::store::{ChunkStore, IndexPaths, IngestionStats, StatsStore};

/// Everything one query needs: both search engines plus the chunk list
/// that maps hit ids back to text and metadata.
pub struct IndexSet {
    pub vector: VectorIndex,
    pub keyword: KeywordIndex,
    pub chunks: Vec<Chunk>,
}

pub struct IndexManager {
    config: EngineConfig,
    embedder: Box<dyn Embedder>,
    paths: IndexPaths,
    state: RwLock<Option<Arc<IndexSet>>>,
    rebuild_lock: Mutex<()>,
}

impl IndexManager {
    pub fn new(config: EngineConfig, embedder: Box<dyn Embedder>) -> Self {
        let paths = IndexPaths::new(&config.resolved_index_dir());
        Self {
            config,
            embedder,
            paths,
            state: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Return a query-ready index, loading or rebuilding as needed.
    ///
    /// The boolean reports whether this call performed a rebuild.
    /// Concurrent callers during a rebuild wait and then share the result
    /// of the single rebuild.
    pub fn ensure_index(&self) -> Result<(Arc<IndexSet>, bool)> {
        if let Some(set) = self.current() {
            return Ok((set, false));
        }

        let _guard = self
            .rebuild_lock
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        // Another caller may have finished while we waited.
        if let Some(set) = self.current() {
            return Ok((set, false));
        }

        if let Some(set) = self.try_load() {
            info!("reusing persisted index");
            let set = Arc::new(set);
            self.swap(Arc::clone(&set));
            return Ok((set, false));
        }

        info!("persisted index unusable, rebuilding");
        let built = IngestionPipeline::new(&self.config, self.embedder.as_ref()).run()?;
        let set = Arc::new(IndexSet {
            vector: built.vector,
            keyword: built.keyword,
            chunks: built.chunks,
        });
        self.swap(Arc::clone(&set));
        Ok((set, true))
    }

    /// Rebuild unconditionally, replacing any in-memory state.
    pub fn rebuild(&self) -> Result<(Arc<IndexSet>, IngestionStats)> {
        let _guard = self
            .rebuild_lock
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let built = IngestionPipeline::new(&self.config, self.embedder.as_ref()).run()?;
        let stats = built.stats;
        let set = Arc::new(IndexSet {
            vector: built.vector,
            keyword: built.keyword,
            chunks: built.chunks,
        });
        self.swap(Arc::clone(&set));
        Ok((set, stats))
    }

    fn current(&self) -> Option<Arc<IndexSet>> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn swap(&self, set: Arc<IndexSet>) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = Some(set);
    }

    /// Validate and load persisted state. `None` means "rebuild".
    fn try_load(&self) -> Option<IndexSet> {
        let stats = StatsStore::new(self.paths.stats.clone()).read()?;
        let current = self.config.fingerprint();
        if stats.fingerprint != current {
            info!(
                persisted = ?stats.fingerprint,
                current = ?current,
                "index fingerprint is stale"
            );
            return None;
        }

        let vector = VectorStore::new(self.paths.vectors.clone()).load()?;
        let chunks = ChunkStore::new(self.paths.chunks.clone()).load()?;
        if !KeywordIndex::exists(&self.paths.keyword_dir) {
            warn!(dir = %self.paths.keyword_dir.display(), "keyword index artifact missing");
            return None;
        }
        let keyword = match KeywordIndex::open(&self.paths.keyword_dir) {
            Ok(keyword) => keyword,
            Err(e) => {
                warn!(error = %e, "could not open keyword index");
                return None;
            }
        };

        let chunk_ids: HashSet<_> = chunks.iter().map(|c| c.id.clone()).collect();
        if chunk_ids != vector.ids() {
            warn!(
                chunk_ids = chunk_ids.len(),
                vector_ids = vector.ids().len(),
                "vector and chunk artifacts diverged"
            );
            return None;
        }

        Some(IndexSet {
            vector,
            keyword,
            chunks,
        })
    }
}
