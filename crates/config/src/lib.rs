//! Layered configuration for the supplier portal assistant
//!
//! Configuration resolves in three layers: compiled defaults, an optional
//! `portal-assist.toml` file, and `PORTAL_ASSIST_*` environment overrides
//! (`PORTAL_ASSIST_SERVER__PORT=8080`). Every tuning constant of the
//! ranking pipeline lives here; the compiled defaults are the calibrated
//! production values, not hard law.

mod search;
mod server;

pub use search::{BoostConfig, FragmentConfig, GenerationConfig, SearchConfig};
pub use server::ServerConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Model backend endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Ollama endpoint for the dense encoder
    pub encoder_endpoint: String,
    /// Embedding model name
    pub encoder_model: String,
    /// Embedding vector length
    pub embedding_dim: usize,
    /// Ollama endpoint for the generative model
    pub generator_endpoint: String,
    /// Generative model name
    pub generator_model: String,
    /// Attach the optional pairwise reranking model
    pub reranker_enabled: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            encoder_endpoint: "http://localhost:11434".to_string(),
            encoder_model: "nomic-embed-text".to_string(),
            embedding_dim: 768,
            generator_endpoint: "http://localhost:11434".to_string(),
            generator_model: "phi3:mini".to_string(),
            reranker_enabled: false,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub boost: BoostConfig,
    pub fragments: FragmentConfig,
    pub generation: GenerationConfig,
    pub models: ModelConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from an optional file plus environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        } else {
            builder =
                builder.add_source(config::File::with_name("portal-assist").required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("PORTAL_ASSIST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        tracing::debug!(
            candidates_k = config.search.candidates_k,
            semantic_weight = config.search.semantic_weight,
            "configuration loaded"
        );
        Ok(config)
    }
}
