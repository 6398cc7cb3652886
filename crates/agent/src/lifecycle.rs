//! Training and persistence lifecycle
//!
//! Training is a rare, exclusive batch operation; serving traffic reads an
//! immutable index. Retraining builds a new index out-of-place and the
//! caller swaps the service atomically. Saved artifacts hold plain data
//! only; model handles are re-acquired through [`ModelHandles::from_config`]
//! after a load, and a handle that fails to attach disables its feature for
//! the session instead of failing the load.

use std::path::Path;
use std::sync::Arc;

use portal_assist_config::AppConfig;
use portal_assist_core::{
    ArticleRecord, EntityRecognizer, PairwiseScorer, Result, TextEncoder, TextGenerator,
};
use portal_assist_llm::{GeneratorConfig, OllamaGenerator};
use portal_assist_rag::{EncoderConfig, KnowledgeIndex, OllamaEncoder};
use portal_assist_text_processing::RuleBasedRecognizer;

/// Model backends injected into the service
pub struct ModelHandles {
    pub encoder: Option<Arc<dyn TextEncoder>>,
    pub reranker: Option<Arc<dyn PairwiseScorer>>,
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub recognizer: Arc<dyn EntityRecognizer>,
}

impl ModelHandles {
    /// Attach backends described by the configuration
    ///
    /// A backend that fails to construct is logged and left detached; the
    /// pipeline degrades (lexical-only scoring, fragment-as-answer) rather
    /// than refusing to start.
    pub fn from_config(config: &AppConfig) -> Self {
        let encoder: Option<Arc<dyn TextEncoder>> = Some(Arc::new(OllamaEncoder::new(
            EncoderConfig {
                endpoint: config.models.encoder_endpoint.clone(),
                model: config.models.encoder_model.clone(),
                dimension: config.models.embedding_dim,
            },
        )));

        let generator: Option<Arc<dyn TextGenerator>> = match OllamaGenerator::new(
            GeneratorConfig {
                model: config.models.generator_model.clone(),
                endpoint: config.models.generator_endpoint.clone(),
                ..Default::default()
            },
        ) {
            Ok(generator) => Some(Arc::new(generator)),
            Err(error) => {
                tracing::warn!(%error, "generator unavailable, answers fall back to fragments");
                None
            }
        };

        if config.models.reranker_enabled {
            tracing::warn!(
                "pairwise reranker enabled in config but no backend is registered; \
                 cosine similarity stays in effect"
            );
        }

        Self {
            encoder,
            reranker: None,
            generator,
            recognizer: Arc::new(RuleBasedRecognizer::new()),
        }
    }

    /// Handles with every model detached; retrieval runs lexical-only
    pub fn detached() -> Self {
        Self {
            encoder: None,
            reranker: None,
            generator: None,
            recognizer: Arc::new(RuleBasedRecognizer::new()),
        }
    }

    /// Attach a pairwise reranking backend
    pub fn with_reranker(mut self, reranker: Arc<dyn PairwiseScorer>) -> Self {
        self.reranker = Some(reranker);
        self
    }
}

/// Train a fresh index over the corpus
///
/// Expensive and exclusive; must not run concurrently with serving against
/// the same index instance. An empty corpus is a fatal error surfaced to
/// the caller before serving starts.
pub async fn train_index(
    records: &[ArticleRecord],
    handles: &ModelHandles,
    config: &AppConfig,
) -> Result<KnowledgeIndex> {
    let index = KnowledgeIndex::train(records, handles.encoder.as_deref(), config).await?;
    Ok(index)
}

/// Load saved index artifacts
pub fn load_index(path: &Path) -> Result<KnowledgeIndex> {
    Ok(KnowledgeIndex::load(path)?)
}
