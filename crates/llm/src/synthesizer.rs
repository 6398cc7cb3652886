//! Answer synthesis
//!
//! Combines the top fragments into a grounded answer via the generative
//! backend, and independently generates a first-person explanation of the
//! retrieval. Every failure mode degrades: no fragments yields a fixed
//! "not found" answer without calling the model, a generation timeout or
//! error falls back to the best fragment verbatim, and a failed reasoning
//! call never blocks the answer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use portal_assist_config::GenerationConfig;
use portal_assist_core::{
    collect_sources, AnalyzedQuery, AnswerResult, Fragment, RankedArticle, TextGenerator,
};

use crate::prompt::{build_answer_prompt, build_reasoning_prompt, strip_control_tokens};

/// Synthesizes answers from ranked fragments
pub struct AnswerSynthesizer {
    generator: Option<Arc<dyn TextGenerator>>,
    config: GenerationConfig,
}

impl AnswerSynthesizer {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, config: GenerationConfig) -> Self {
        Self { generator, config }
    }

    /// Whether a generative backend is attached
    pub fn generator_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Produce the final answer for an analyzed query
    pub async fn synthesize(
        &self,
        query: &AnalyzedQuery,
        fragments: Vec<Fragment>,
        recommendations: &[RankedArticle],
        started: Instant,
    ) -> AnswerResult {
        if fragments.is_empty() {
            return AnswerResult::not_found(started.elapsed().as_millis() as u64);
        }

        let sources = collect_sources(&fragments);
        let timeout = Duration::from_secs(self.config.timeout_secs);

        let answer = match &self.generator {
            Some(generator) => {
                let prompt = build_answer_prompt(query, &fragments);
                match tokio::time::timeout(
                    timeout,
                    generator.generate(
                        &prompt,
                        self.config.answer_max_tokens,
                        self.config.answer_temperature,
                    ),
                )
                .await
                {
                    Ok(Ok(text)) => strip_control_tokens(&text),
                    Ok(Err(error)) => {
                        tracing::warn!(%error, "answer generation failed, using best fragment");
                        fragments[0].text.clone()
                    }
                    Err(_) => {
                        tracing::warn!(
                            timeout_secs = self.config.timeout_secs,
                            "answer generation timed out, using best fragment"
                        );
                        fragments[0].text.clone()
                    }
                }
            }
            // generator disabled for the session: best fragment verbatim
            None => fragments[0].text.clone(),
        };

        let reasoning = self
            .generate_reasoning(query, recommendations, &fragments, timeout)
            .await;

        AnswerResult {
            answer,
            reasoning,
            fragments,
            sources,
            execution_time_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Reasoning is generated independently and must never fail the answer
    async fn generate_reasoning(
        &self,
        query: &AnalyzedQuery,
        recommendations: &[RankedArticle],
        fragments: &[Fragment],
        timeout: Duration,
    ) -> String {
        let Some(generator) = &self.generator else {
            return "Explanation unavailable: generation is disabled. The answer \
                    was assembled from the most relevant passage."
                .to_string();
        };

        let prompt = build_reasoning_prompt(query, recommendations, fragments);
        match tokio::time::timeout(
            timeout,
            generator.generate(
                &prompt,
                self.config.reasoning_max_tokens,
                self.config.reasoning_temperature,
            ),
        )
        .await
        {
            Ok(Ok(text)) => strip_control_tokens(&text),
            Ok(Err(error)) => {
                tracing::warn!(%error, "reasoning generation failed");
                "An error occurred while generating the explanation.".to_string()
            }
            Err(_) => {
                tracing::warn!("reasoning generation timed out");
                "Explanation generation timed out.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use portal_assist_core::{QueryClassification, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedGenerator {
        calls: AtomicUsize,
        fail: bool,
        slow: bool,
    }

    impl ScriptedGenerator {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
                slow: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
                slow: false,
            }
        }

        fn slow() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
                slow: true,
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _max_tokens: usize,
            temperature: f32,
        ) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.slow {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            if self.fail {
                return Err(portal_assist_core::Error::Llm("backend down".into()));
            }
            Ok(format!("generated at t={}<|end|>", temperature))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn query() -> AnalyzedQuery {
        AnalyzedQuery {
            raw_text: "how to update the price list".to_string(),
            normalized_text: String::new(),
            classification: QueryClassification::default(),
            entities: Vec::new(),
            keywords: Vec::new(),
            variants: Vec::new(),
        }
    }

    fn fragment(text: &str) -> Fragment {
        Fragment {
            doc_id: 0,
            title: "Price list update instructions".to_string(),
            text: text.to_string(),
            word_count: text.split_whitespace().count(),
            relevance: 0.9,
            entity_matches: 0,
            entities: Vec::new(),
        }
    }

    fn config() -> GenerationConfig {
        GenerationConfig {
            timeout_secs: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_no_fragments_skips_generator() {
        let generator = Arc::new(ScriptedGenerator::ok());
        let synthesizer = AnswerSynthesizer::new(Some(generator.clone()), config());

        let result = synthesizer
            .synthesize(&query(), Vec::new(), &[], Instant::now())
            .await;

        assert!(result.answer.contains("no matching information"));
        assert!(result.reasoning.contains("No relevant passages"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_generation_strips_tokens() {
        let synthesizer =
            AnswerSynthesizer::new(Some(Arc::new(ScriptedGenerator::ok())), config());

        let result = synthesizer
            .synthesize(&query(), vec![fragment("Open the catalog.")], &[], Instant::now())
            .await;

        assert!(result.answer.starts_with("generated"));
        assert!(!result.answer.contains("<|end|>"));
        assert_eq!(result.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_generator_failure_falls_back_to_fragment() {
        let synthesizer =
            AnswerSynthesizer::new(Some(Arc::new(ScriptedGenerator::failing())), config());

        let result = synthesizer
            .synthesize(
                &query(),
                vec![fragment("Open the catalog and press update.")],
                &[],
                Instant::now(),
            )
            .await;

        assert_eq!(result.answer, "Open the catalog and press update.");
    }

    #[tokio::test]
    async fn test_timeout_falls_back_to_fragment() {
        let synthesizer =
            AnswerSynthesizer::new(Some(Arc::new(ScriptedGenerator::slow())), config());

        let result = synthesizer
            .synthesize(
                &query(),
                vec![fragment("Best fragment text.")],
                &[],
                Instant::now(),
            )
            .await;

        assert_eq!(result.answer, "Best fragment text.");
    }

    #[tokio::test]
    async fn test_disabled_generator_uses_fragment() {
        let synthesizer = AnswerSynthesizer::new(None, config());

        let result = synthesizer
            .synthesize(&query(), vec![fragment("Fragment answer.")], &[], Instant::now())
            .await;

        assert_eq!(result.answer, "Fragment answer.");
        assert!(result.reasoning.contains("generation is disabled"));
    }
}
