//! paperscope-engine
//!
//! The retrieval-and-index-consistency engine: ingestion pipeline,
//! persisted-state consistency checks, hybrid (RRF) retrieval, the
//! abstention guardrail, and the query pipeline that composes them.

pub mod consistency;
pub mod guardrail;
pub mod ingest;
pub mod pipeline;
pub mod retriever;
pub mod store;

/// Bumped when the persisted artifact layout changes.
pub const INDEX_VERSION: &str = "1";

pub use consistency::{IndexManager, IndexSet};
pub use guardrail::Guardrail;
pub use ingest::{IngestedIndex, IngestionPipeline};
pub use pipeline::QueryPipeline;
pub use retriever::{reciprocal_rank_fusion, FusedHit, HybridRetriever, RRF_K};
pub use store::{ChunkStore, IndexPaths, IngestionStats, StatsStore};
