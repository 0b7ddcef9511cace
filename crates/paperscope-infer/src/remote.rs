//! Blocking HTTP clients for an external inference server
//! (ollama-compatible API surface).

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use paperscope_core::traits::{AnswerGenerator, Embedder};
use paperscope_core::types::RetrievedNode;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

pub struct RemoteEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dim: usize,
}

impl RemoteEmbedder {
    /// Connect and probe the model's embedding dimension with one call.
    pub fn connect(endpoint: &str, model: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        let mut embedder = Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            dim: 0,
        };
        let probe = embedder.embed_one("paperscope dimension probe")?;
        if probe.is_empty() {
            return Err(anyhow!("embedding endpoint returned an empty vector"));
        }
        embedder.dim = probe.len();
        debug!(model = %embedder.model, dim = embedder.dim, "probed embedding dimension");
        Ok(embedder)
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.endpoint);
        let response = self
            .client
            .post(&url)
            .json(&EmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .with_context(|| format!("embedding request to {url}"))?
            .error_for_status()?;
        let body: EmbeddingResponse = response.json().context("parsing embedding response")?;
        Ok(body.embedding)
    }
}

impl Embedder for RemoteEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let embedding = self.embed_one(text)?;
            if embedding.len() != self.dim {
                return Err(anyhow!(
                    "embedding dim changed mid-stream: {} != {}",
                    embedding.len(),
                    self.dim
                ));
            }
            out.push(embedding);
        }
        Ok(out)
    }
}

pub struct RemoteGenerator {
    client: Client,
    endpoint: String,
    model: String,
    prompt_template: String,
}

impl RemoteGenerator {
    /// The prompt template fills `{context}` and `{query}` placeholders.
    pub fn new(endpoint: &str, model: &str, prompt_template: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            prompt_template: prompt_template.to_string(),
        })
    }

    fn build_context(nodes: &[RetrievedNode]) -> String {
        nodes
            .iter()
            .map(|n| {
                match n.metadata.get("tables_display").and_then(|v| v.as_str()) {
                    Some(tables) => format!("{}\n\n{}", n.text, tables),
                    None => n.text.clone(),
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }
}

impl AnswerGenerator for RemoteGenerator {
    fn generate(&self, query: &str, context: &[RetrievedNode]) -> Result<String> {
        let prompt = self
            .prompt_template
            .replace("{context}", &Self::build_context(context))
            .replace("{query}", query);
        let url = format!("{}/api/generate", self.endpoint);
        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt: &prompt,
                stream: false,
            })
            .send()
            .with_context(|| format!("generation request to {url}"))?
            .error_for_status()?;
        let body: GenerateResponse = response.json().context("parsing generation response")?;
        Ok(body.response)
    }
}
