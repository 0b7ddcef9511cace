//! Query pipeline: retrieve, map hits back to chunks, guard, generate.
//!
//! Generation failures never discard retrieval work: the response keeps
//! its sources and records the error in metadata. Retrieval failures are
//! fatal and propagate to the caller.

use std::collections::HashMap;
use std::time::Instant;
use tracing::{error, info};

use paperscope_core::config::EngineConfig;
use paperscope_core::error::{Error, Result};
use paperscope_core::traits::{AnswerGenerator, Embedder};
use paperscope_core::types::{Chunk, QueryResponse, RetrievedNode};

use crate::consistency::IndexSet;
use crate::guardrail::Guardrail;
use crate::retriever::{FusedHit, HybridRetriever};

pub struct QueryPipeline<'a> {
    config: &'a EngineConfig,
    embedder: &'a dyn Embedder,
    generator: &'a dyn AnswerGenerator,
}

impl<'a> QueryPipeline<'a> {
    pub fn new(
        config: &'a EngineConfig,
        embedder: &'a dyn Embedder,
        generator: &'a dyn AnswerGenerator,
    ) -> Self {
        Self {
            config,
            embedder,
            generator,
        }
    }

    /// Answer one query against a loaded index.
    pub fn run_query(
        &self,
        index: &IndexSet,
        query: &str,
        top_k: Option<usize>,
    ) -> Result<QueryResponse> {
        let started = Instant::now();
        let retriever = HybridRetriever::new(
            &index.vector,
            &index.keyword,
            self.embedder,
            self.config.top_k,
        );
        let fused = retriever.retrieve(query, top_k)?;
        let sources = self.to_retrieved_nodes(&fused, &index.chunks);
        let retrieval_ms = started.elapsed().as_millis() as u64;

        let mut response = QueryResponse {
            answer: String::new(),
            sources,
            metadata: Default::default(),
            abstained: false,
        };
        response
            .metadata
            .insert("retrieval_time_ms".into(), retrieval_ms.into());
        response
            .metadata
            .insert("num_sources".into(), response.sources.len().into());

        if self.config.enable_guardrails {
            let guardrail = Guardrail::new(self.config.similarity_threshold);
            if guardrail.should_abstain(&response.sources) {
                response.abstained = true;
                let reason = if response.sources.is_empty() {
                    "no_results"
                } else {
                    "similarity_below_threshold"
                };
                response
                    .metadata
                    .insert("abstained_reason".into(), reason.into());
                return Ok(response);
            }
        }

        let gen_started = Instant::now();
        match self.generator.generate(query, &response.sources) {
            Ok(answer) => {
                response.metadata.insert(
                    "generation_time_ms".into(),
                    (gen_started.elapsed().as_millis() as u64).into(),
                );
                response.answer = answer;
                info!(
                    sources = response.sources.len(),
                    retrieval_ms, "query answered"
                );
            }
            Err(e) => {
                let failure = Error::Generation(e.to_string());
                error!(error = %failure, "answer generation failed, returning sources only");
                response
                    .metadata
                    .insert("generation_error".into(), failure.to_string().into());
            }
        }
        Ok(response)
    }

    /// Join fused hits back to their chunks. Hits whose id is not in the
    /// chunk list are dropped; with consistent artifacts there are none.
    fn to_retrieved_nodes(&self, fused: &[FusedHit], chunks: &[Chunk]) -> Vec<RetrievedNode> {
        let by_id: HashMap<&str, &Chunk> = chunks.iter().map(|c| (c.id.as_str(), c)).collect();
        fused
            .iter()
            .filter_map(|hit| by_id.get(hit.id.as_str()).map(|chunk| to_node(hit, chunk)))
            .collect()
    }
}

fn to_node(hit: &FusedHit, chunk: &Chunk) -> RetrievedNode {
    let mut metadata = std::collections::BTreeMap::new();
    metadata.insert(
        "file_path".to_string(),
        chunk.meta.file_path.clone().into(),
    );
    if !chunk.meta.headers.is_empty() {
        metadata.insert("headers".to_string(), chunk.meta.headers.clone().into());
    }
    if !chunk.meta.tables.is_empty() {
        metadata.insert("tables".to_string(), chunk.meta.tables.clone().into());
        metadata.insert(
            "tables_display".to_string(),
            format_tables_for_display(&chunk.meta.tables).into(),
        );
    }
    RetrievedNode {
        node_id: chunk.id.clone(),
        text: chunk.text.clone(),
        score: hit.score,
        similarity: hit.similarity,
        metadata,
    }
}

/// Render extracted tables for inclusion in generation context.
pub fn format_tables_for_display(tables: &[String]) -> String {
    tables
        .iter()
        .enumerate()
        .map(|(i, t)| format!("Table {}:\n{}", i + 1, t))
        .collect::<Vec<_>>()
        .join("\n\n")
}
