//! Dense encoder backends
//!
//! `OllamaEncoder` talks to an Ollama embedding endpoint; `HashEncoder` is
//! a deterministic hash-projection fallback used for tests and offline
//! runs. Both implement the core [`TextEncoder`] trait.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use portal_assist_core::{Error, Result, TextEncoder};

use crate::RagError;

/// Cosine similarity between two equal-length vectors, in [-1, 1]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Encoder backend configuration
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Ollama API endpoint
    pub endpoint: String,
    /// Embedding model name
    pub model: String,
    /// Embedding vector length
    pub dimension: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            dimension: 768,
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Encoder backed by an Ollama embedding model
pub struct OllamaEncoder {
    client: Client,
    config: EncoderConfig,
}

impl OllamaEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn embed_inputs(&self, inputs: Vec<&str>) -> Result<Vec<Vec<f32>>> {
        let request = EmbedRequest {
            model: &self.config.model,
            input: inputs,
        };
        let url = format!("{}/api/embed", self.config.endpoint);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::Embedding(format!("encoder request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(
                RagError::Embedding(format!("encoder returned status {}", status)).into(),
            );
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| RagError::Embedding(format!("invalid encoder response: {}", e)))?;

        for embedding in &parsed.embeddings {
            if embedding.len() != self.config.dimension {
                return Err(RagError::Embedding(format!(
                    "expected dimension {}, got {}",
                    self.config.dimension,
                    embedding.len()
                ))
                .into());
            }
        }
        Ok(parsed.embeddings)
    }
}

#[async_trait]
impl TextEncoder for OllamaEncoder {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_inputs(vec![text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| Error::from(RagError::Embedding("empty encoder response".into())))
    }

    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut all = Vec::with_capacity(texts.len());
        // bounded request size keeps payloads within endpoint limits
        for chunk in texts.chunks(32) {
            let inputs: Vec<&str> = chunk.iter().map(String::as_str).collect();
            all.extend(self.embed_inputs(inputs).await?);
        }
        Ok(all)
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

/// Deterministic hash-projection encoder
///
/// Projects each word into a hashed bucket, then L2-normalizes. Texts
/// sharing words get correlated vectors, which is enough for tests and for
/// degraded offline operation.
pub struct HashEncoder {
    dimension: usize,
}

impl HashEncoder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];
        for word in text.to_lowercase().split_whitespace() {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            let bucket = (hasher.finish() as usize) % self.dimension;
            embedding[bucket] += 1.0;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut embedding {
                *value /= norm;
            }
        }
        embedding
    }
}

impl Default for HashEncoder {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl TextEncoder for HashEncoder {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hash-projection"
    }
}
