//! Hybrid retrieval: run vector and keyword search, fuse with
//! reciprocal rank fusion.
//!
//! Fusion scores depend only on rank, never on raw score magnitude, so
//! cosine similarities and BM25 scores combine without normalization.
//! Either engine failing fails the whole retrieval; a silently degraded
//! single-engine result would be indistinguishable from a hybrid one.

use std::collections::HashMap;
use tracing::debug;

use paperscope_core::error::{Error, Result};
use paperscope_core::traits::{Embedder, KeywordSearch, VectorSearch};
use paperscope_core::types::{ChunkId, SearchHit, SourceKind};

/// Standard RRF dampening constant.
pub const RRF_K: f32 = 60.0;

/// One fused result. `score` orders results; `similarity` is the best
/// raw per-engine score and feeds the guardrail. The rank fields record
/// where each engine placed the node (0-based), if it returned it.
#[derive(Debug, Clone)]
pub struct FusedHit {
    pub id: ChunkId,
    pub score: f32,
    pub similarity: f32,
    pub vector_rank: Option<usize>,
    pub keyword_rank: Option<usize>,
}

/// Fuse ranked lists: each appearance of an id contributes
/// `1 / (k + rank)` with 1-based ranks, summed across lists.
///
/// Ordering is deterministic: fused score descending, then vector rank
/// ascending (absent ranks last), then id ascending.
pub fn reciprocal_rank_fusion(lists: &[&[SearchHit]], k: f32) -> Vec<FusedHit> {
    let mut fused: HashMap<ChunkId, FusedHit> = HashMap::new();
    for list in lists {
        for (rank, hit) in list.iter().enumerate() {
            let entry = fused.entry(hit.id.clone()).or_insert_with(|| FusedHit {
                id: hit.id.clone(),
                score: 0.0,
                similarity: f32::NEG_INFINITY,
                vector_rank: None,
                keyword_rank: None,
            });
            entry.score += 1.0 / (k + (rank + 1) as f32);
            entry.similarity = entry.similarity.max(hit.score);
            match hit.source {
                SourceKind::Vector => {
                    entry.vector_rank = Some(entry.vector_rank.map_or(rank, |r| r.min(rank)));
                }
                SourceKind::Keyword => {
                    entry.keyword_rank = Some(entry.keyword_rank.map_or(rank, |r| r.min(rank)));
                }
            }
        }
    }
    let mut out: Vec<FusedHit> = fused.into_values().collect();
    out.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                a.vector_rank
                    .unwrap_or(usize::MAX)
                    .cmp(&b.vector_rank.unwrap_or(usize::MAX))
            })
            .then_with(|| a.id.cmp(&b.id))
    });
    out
}

pub struct HybridRetriever<'a, V: VectorSearch, K: KeywordSearch> {
    vector: &'a V,
    keyword: &'a K,
    embedder: &'a dyn Embedder,
    default_top_k: usize,
}

impl<'a, V: VectorSearch, K: KeywordSearch> HybridRetriever<'a, V, K> {
    pub fn new(
        vector: &'a V,
        keyword: &'a K,
        embedder: &'a dyn Embedder,
        default_top_k: usize,
    ) -> Self {
        Self {
            vector,
            keyword,
            embedder,
            default_top_k,
        }
    }

    /// Retrieve the fused top-k for a query. Both engines are consulted
    /// with the same k; a failure in either aborts the retrieval.
    pub fn retrieve(&self, query: &str, top_k: Option<usize>) -> Result<Vec<FusedHit>> {
        let k = top_k.unwrap_or(self.default_top_k);
        if k == 0 {
            return Err(Error::InvalidConfig("top_k must be positive".into()));
        }

        let query_vec = self
            .embedder
            .embed_batch(&[query.to_string()])
            .map_err(|e| Error::Retrieval(format!("query embedding: {e}")))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Retrieval("embedder returned no vector for query".into()))?;

        let vector_hits = self
            .vector
            .search(&query_vec, k)
            .map_err(|e| Error::Retrieval(format!("vector search: {e}")))?;
        let keyword_hits = self
            .keyword
            .search(query, k)
            .map_err(|e| Error::Retrieval(format!("keyword search: {e}")))?;
        debug!(
            vector = vector_hits.len(),
            keyword = keyword_hits.len(),
            k,
            "fusing result lists"
        );

        let mut fused = reciprocal_rank_fusion(&[&vector_hits, &keyword_hits], RRF_K);
        fused.truncate(k);
        Ok(fused)
    }
}
