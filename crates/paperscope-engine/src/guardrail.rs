//! Relevance guardrail: abstain instead of answering from weak context.

use tracing::info;

use paperscope_core::types::RetrievedNode;

/// Compares the best raw retriever similarity among the retrieved nodes
/// against a fixed threshold. Fused scores are rank-derived and not
/// comparable to a similarity threshold, so they are never consulted.
#[derive(Debug, Clone, Copy)]
pub struct Guardrail {
    threshold: f32,
}

impl Guardrail {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// True when the engine should refuse to answer: no nodes at all, or
    /// every node's similarity strictly below the threshold. A best
    /// similarity exactly at the threshold passes.
    pub fn should_abstain(&self, nodes: &[RetrievedNode]) -> bool {
        if nodes.is_empty() {
            info!("no retrieved nodes, abstaining");
            return true;
        }
        let best = nodes
            .iter()
            .map(|n| n.similarity)
            .fold(f32::NEG_INFINITY, f32::max);
        if best < self.threshold {
            info!(
                best_similarity = best,
                threshold = self.threshold,
                "best similarity below threshold, abstaining"
            );
            return true;
        }
        false
    }
}
