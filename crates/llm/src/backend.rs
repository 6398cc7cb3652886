//! Ollama generation backend

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use portal_assist_core::{Result, TextGenerator};

use crate::LlmError;

/// Generator backend configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model name
    pub model: String,
    /// Ollama API endpoint
    pub endpoint: String,
    /// Top-p sampling
    pub top_p: f32,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// Retry attempts for transient failures
    pub max_retries: u32,
    /// Initial backoff, doubled per retry
    pub initial_backoff: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "phi3:mini".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            top_p: 0.9,
            request_timeout: Duration::from_secs(60),
            max_retries: 2,
            initial_backoff: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: usize,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Generator backed by an Ollama model
pub struct OllamaGenerator {
    client: Client,
    config: GeneratorConfig,
}

impl OllamaGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LlmError::Backend(format!("client build failed: {}", e)))?;
        Ok(Self { client, config })
    }

    async fn generate_once(
        &self,
        prompt: &str,
        max_tokens: usize,
        temperature: f32,
    ) -> std::result::Result<String, LlmError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: max_tokens,
                temperature,
                top_p: self.config.top_p,
            },
        };

        let url = format!("{}/api/generate", self.config.endpoint);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LlmError::Backend(format!(
                "generator returned status {}",
                response.status()
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Backend(format!("invalid generator response: {}", e)))?;
        Ok(parsed.response)
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(
        &self,
        prompt: &str,
        max_tokens: usize,
        temperature: f32,
    ) -> Result<String> {
        let mut backoff = self.config.initial_backoff;
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.generate_once(prompt, max_tokens, temperature).await {
                Ok(text) => return Ok(text),
                Err(error) => {
                    tracing::warn!(%error, attempt, "generation attempt failed");
                    last_error = Some(error);
                    if attempt < self.config.max_retries {
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Backend("generation failed".into()))
            .into())
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.config.endpoint);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}
