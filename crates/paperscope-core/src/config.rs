//! Typed configuration loader and path helpers.
//!
//! Uses Figment to merge `paperscope.toml` + `paperscope.<env>.toml` +
//! `PAPERSCOPE_*` env vars into an `EngineConfig` value. Provides helpers
//! to expand `~` and `${VAR}` and to resolve relative paths against a
//! known base directory.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::fingerprint::{IndexFingerprint, PreprocessConfig};

/// External inference endpoints and the offline-embedding switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub endpoint: String,
    pub use_hash_embeddings: bool,
    pub hash_dim: usize,
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            use_hash_embeddings: false,
            hash_dim: 384,
            timeout_secs: 60,
        }
    }
}

/// Answer-generation model and prompt template. `{context}` and
/// `{query}` placeholders are filled at generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub prompt: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "llama3".to_string(),
            prompt: "Answer the question based only on the following context.\n\n\
                     Context:\n{context}\n\nQuestion: {query}\n\nAnswer:"
                .to_string(),
        }
    }
}

/// Full engine configuration. The fingerprint subset (embedding model,
/// chunk size/overlap, preprocess toggles) decides index validity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directories scanned for extracted paper text, in order.
    pub data_dirs: Vec<String>,
    /// File extensions accepted by the document loader.
    pub extensions: Vec<String>,
    /// Root directory for all persisted index artifacts.
    pub index_dir: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub preprocess: PreprocessConfig,
    pub embedding_model: String,
    pub top_k: usize,
    pub similarity_threshold: f32,
    pub enable_guardrails: bool,
    pub inference: InferenceConfig,
    pub generation: GenerationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dirs: vec!["data".to_string(), "data/arxiv".to_string()],
            extensions: vec![".txt".to_string(), ".md".to_string()],
            index_dir: "index".to_string(),
            chunk_size: 512,
            chunk_overlap: 50,
            preprocess: PreprocessConfig::default(),
            embedding_model: "bge-small-en-v1.5".to_string(),
            top_k: 10,
            similarity_threshold: 0.03,
            enable_guardrails: true,
            inference: InferenceConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate configuration from toml files and env vars.
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("PAPERSCOPE_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("paperscope.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("paperscope.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("paperscope.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("paperscope.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("PAPERSCOPE_").split("__"));

        let config: Self = figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the chunker or retriever cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be positive".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be positive".into()));
        }
        if self.data_dirs.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one data directory is required".into(),
            ));
        }
        Ok(())
    }

    /// The configuration subset that decides index validity.
    pub fn fingerprint(&self) -> IndexFingerprint {
        IndexFingerprint {
            embedding_model: self.embedding_model.clone(),
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            preprocess: self.preprocess,
        }
    }

    /// Data directories with `~` and env vars expanded.
    pub fn resolved_data_dirs(&self) -> Vec<PathBuf> {
        self.data_dirs.iter().map(expand_path).collect()
    }

    /// Index artifact root with `~` and env vars expanded.
    pub fn resolved_index_dir(&self) -> PathBuf {
        expand_path(&self.index_dir)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
