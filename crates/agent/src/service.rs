//! The search service
//!
//! One immutable object per index version: analyzer, booster, synthesizer
//! and model handles, shared by reference across concurrent requests.
//! Nothing on the query path mutates service state, and nothing on the
//! query path returns an error past this boundary — every internal failure
//! degrades to a poorer answer instead.

use std::sync::Arc;
use std::time::Instant;

use portal_assist_config::AppConfig;
use portal_assist_core::{
    AnswerResult, EntityRecognizer, PairwiseScorer, RankedArticle, TextEncoder,
};
use portal_assist_llm::AnswerSynthesizer;
use portal_assist_rag::{
    extract_fragments, rank, recommendations, ContextBooster, KnowledgeIndex,
};
use portal_assist_text_processing::QueryAnalyzer;

use crate::lifecycle::ModelHandles;

/// Answer plus the operator-escalation signal
#[derive(Debug, Clone)]
pub struct ServiceAnswer {
    pub result: AnswerResult,
    pub needs_operator: bool,
}

/// Immutable query pipeline over one trained index
pub struct SearchService {
    index: Arc<KnowledgeIndex>,
    analyzer: QueryAnalyzer,
    booster: ContextBooster,
    synthesizer: AnswerSynthesizer,
    encoder: Option<Arc<dyn TextEncoder>>,
    reranker: Option<Arc<dyn PairwiseScorer>>,
    recognizer: Arc<dyn EntityRecognizer>,
    config: AppConfig,
}

impl SearchService {
    /// Assemble the service from a trained index and model handles
    pub fn new(index: Arc<KnowledgeIndex>, handles: ModelHandles, config: AppConfig) -> Self {
        let analyzer = index.analyzer(handles.recognizer.clone(), &config);
        let booster = ContextBooster::new(config.boost.clone());
        let synthesizer = AnswerSynthesizer::new(handles.generator, config.generation.clone());

        // a lexical-only index never consults the encoder
        let encoder = if index.semantic_enabled {
            handles.encoder
        } else {
            None
        };

        Self {
            index,
            analyzer,
            booster,
            synthesizer,
            encoder,
            reranker: handles.reranker,
            recognizer: handles.recognizer,
            config,
        }
    }

    /// Number of indexed articles
    pub fn article_count(&self) -> usize {
        self.index.len()
    }

    /// Whether semantic scoring is active for this session
    pub fn semantic_enabled(&self) -> bool {
        self.index.semantic_enabled && self.encoder.is_some()
    }

    /// Answer a user query end to end
    pub async fn answer(&self, text: &str) -> ServiceAnswer {
        let started = Instant::now();

        if text.trim().is_empty() {
            return ServiceAnswer {
                result: AnswerResult::empty_query(started.elapsed().as_millis() as u64),
                needs_operator: false,
            };
        }

        let query = self.analyzer.analyze(text);
        let needs_operator = query.classification.needs_operator;

        let query_embedding = self.encode_query(text).await;
        let outcome = rank(
            &self.index,
            &self.analyzer,
            &self.booster,
            &query,
            query_embedding.as_deref(),
            self.reranker.as_deref(),
            &self.config.search,
        )
        .await;

        let ranked = recommendations(&self.index, &outcome, self.config.search.top_n);
        let (fragments, _) = extract_fragments(
            &query,
            &ranked,
            query_embedding.as_deref(),
            self.encoder.as_deref(),
            self.recognizer.as_ref(),
            &self.config.fragments,
            self.config.search.top_k_fragments,
        )
        .await;

        let result = self
            .synthesizer
            .synthesize(&query, fragments, &ranked, started)
            .await;

        tracing::info!(
            elapsed_ms = result.execution_time_ms,
            sources = result.sources.len(),
            needs_operator,
            "query answered"
        );

        ServiceAnswer {
            result,
            needs_operator,
        }
    }

    /// Ranked articles with the full score breakdown
    pub async fn recommendations(&self, text: &str, top_n: usize) -> Vec<RankedArticle> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let query = self.analyzer.analyze(text);
        let query_embedding = self.encode_query(text).await;
        let outcome = rank(
            &self.index,
            &self.analyzer,
            &self.booster,
            &query,
            query_embedding.as_deref(),
            self.reranker.as_deref(),
            &self.config.search,
        )
        .await;

        recommendations(&self.index, &outcome, top_n)
    }

    /// Encode the raw query once per request; failure degrades to
    /// lexical-only scoring
    async fn encode_query(&self, text: &str) -> Option<Vec<f32>> {
        let encoder = self.encoder.as_deref()?;
        match encoder.encode(text).await {
            Ok(embedding) => Some(embedding),
            Err(error) => {
                tracing::warn!(%error, "query encoding failed, lexical-only for this request");
                None
            }
        }
    }
}
