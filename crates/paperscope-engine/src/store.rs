//! Persisted artifacts: the keyword node list, ingestion stats, and the
//! layout of the index directory.
//!
//! Stats are written strictly after the vector and keyword artifacts, so
//! their presence implies both artifacts exist and are complete. Missing
//! or unreadable stats always mean "no valid index".

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use paperscope_core::fingerprint::IndexFingerprint;
use paperscope_core::types::Chunk;

/// Locations of every persisted artifact under one index root.
#[derive(Debug, Clone)]
pub struct IndexPaths {
    pub root: PathBuf,
    pub vectors: PathBuf,
    pub chunks: PathBuf,
    pub stats: PathBuf,
    pub keyword_dir: PathBuf,
}

impl IndexPaths {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            vectors: root.join("vectors.json"),
            chunks: root.join("chunks.json"),
            stats: root.join("ingestion_stats.json"),
            keyword_dir: root.join("tantivy"),
        }
    }
}

/// Fingerprint + summary record written exactly once per successful
/// ingestion, after all artifacts are durable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionStats {
    pub document_count: usize,
    pub chunk_count: usize,
    pub total_chars: usize,
    pub avg_chunk_size: f64,
    pub paths: Vec<String>,
    pub index_version: String,
    pub created_at: DateTime<Utc>,
    pub fingerprint: IndexFingerprint,
}

/// The keyword node list: every chunk serialized whole, so BM25 search
/// state can be rebuilt or reloaded without re-chunking.
pub struct ChunkStore {
    path: PathBuf,
}

impl ChunkStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn persist(&self, chunks: &[Chunk]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec(chunks)?)
            .with_context(|| format!("writing chunk list to {}", self.path.display()))?;
        debug!(chunks = chunks.len(), path = %self.path.display(), "persisted chunk list");
        Ok(())
    }

    pub fn load(&self) -> Option<Vec<Chunk>> {
        if !self.path.is_file() {
            return None;
        }
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read chunk list");
                return None;
            }
        };
        match serde_json::from_slice::<Vec<Chunk>>(&bytes) {
            Ok(chunks) if !chunks.is_empty() => Some(chunks),
            Ok(_) => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not parse chunk list");
                None
            }
        }
    }
}

/// Single-record stats store, overwritten atomically (temp file +
/// rename) so readers see either the old record or the new one.
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn write(&self, stats: &IngestionStats) -> Result<()> {
        let parent = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&parent)?;
        let tmp = NamedTempFile::new_in(&parent)?;
        serde_json::to_writer_pretty(&tmp, stats)?;
        tmp.persist(&self.path)
            .with_context(|| format!("replacing stats at {}", self.path.display()))?;
        debug!(path = %self.path.display(), "wrote ingestion stats");
        Ok(())
    }

    pub fn read(&self) -> Option<IngestionStats> {
        if !self.path.is_file() {
            return None;
        }
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read ingestion stats");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not parse ingestion stats");
                None
            }
        }
    }
}
