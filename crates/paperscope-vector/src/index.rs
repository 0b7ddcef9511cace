use anyhow::{anyhow, Result};
use std::collections::HashSet;

use paperscope_core::traits::VectorSearch;
use paperscope_core::types::{ChunkId, SearchHit, SourceKind};

use crate::store::VectorRecord;

/// In-memory view of the persisted embedding store.
#[derive(Debug)]
pub struct VectorIndex {
    dim: usize,
    records: Vec<VectorRecord>,
}

impl VectorIndex {
    pub fn new(dim: usize, records: Vec<VectorRecord>) -> Self {
        Self { dim, records }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids of every embedded chunk, for consistency checks against the
    /// keyword node list.
    pub fn ids(&self) -> HashSet<ChunkId> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }

    /// Cosine-similarity search, best first. Ties order by id so results
    /// are deterministic for identical inputs.
    pub fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query_vec.len() != self.dim {
            return Err(anyhow!(
                "query vector dim {} does not match index dim {}",
                query_vec.len(),
                self.dim
            ));
        }
        let mut hits: Vec<SearchHit> = self
            .records
            .iter()
            .map(|r| SearchHit {
                id: r.id.clone(),
                score: cosine(query_vec, &r.embedding),
                source: SourceKind::Vector,
            })
            .collect();
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(k);
        Ok(hits)
    }
}

impl VectorSearch for VectorIndex {
    fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        Self::search(self, query_vec, k)
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na <= f32::EPSILON || nb <= f32::EPSILON {
        0.0
    } else {
        dot / (na * nb)
    }
}
