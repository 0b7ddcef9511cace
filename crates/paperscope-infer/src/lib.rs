//! paperscope-infer
//!
//! `Embedder` and `AnswerGenerator` implementations. Real embeddings and
//! answers come from an external inference server over HTTP; the
//! deterministic hash embedder serves offline runs and tests.

pub mod hash;
pub mod remote;

use tracing::info;

use paperscope_core::config::EngineConfig;
use paperscope_core::traits::{AnswerGenerator, Embedder};

pub use hash::HashEmbedder;
pub use remote::{RemoteEmbedder, RemoteGenerator};

/// Pick an embedder per configuration. `PAPERSCOPE_USE_HASH_EMBEDDINGS=1`
/// forces the hash embedder regardless of config.
pub fn embedder_from_config(config: &EngineConfig) -> anyhow::Result<Box<dyn Embedder>> {
    let forced = std::env::var("PAPERSCOPE_USE_HASH_EMBEDDINGS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if forced || config.inference.use_hash_embeddings {
        info!(dim = config.inference.hash_dim, "using hash embedder");
        return Ok(Box::new(HashEmbedder::new(config.inference.hash_dim)));
    }
    let embedder = RemoteEmbedder::connect(
        &config.inference.endpoint,
        &config.embedding_model,
        config.inference.timeout_secs,
    )?;
    info!(
        model = %config.embedding_model,
        dim = embedder.dim(),
        "using remote embedder"
    );
    Ok(Box::new(embedder))
}

pub fn generator_from_config(config: &EngineConfig) -> anyhow::Result<Box<dyn AnswerGenerator>> {
    Ok(Box::new(RemoteGenerator::new(
        &config.inference.endpoint,
        &config.generation.model,
        &config.generation.prompt,
        config.inference.timeout_secs,
    )?))
}
