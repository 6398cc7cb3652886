//! End-to-end pipeline tests over a small in-memory corpus
//!
//! The fixtures run hermetically: the deterministic hash encoder stands in
//! for the dense model and a scripted generator counts its calls.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use portal_assist_agent::{train_index, ModelHandles, SearchService};
use portal_assist_config::AppConfig;
use portal_assist_core::{ArticleRecord, Result, TextGenerator};
use portal_assist_rag::{HashEncoder, KnowledgeIndex};

struct CountingGenerator {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TextGenerator for CountingGenerator {
    async fn generate(&self, _prompt: &str, _max_tokens: usize, _temperature: f32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("A grounded answer citing the sources.".to_string())
    }

    fn name(&self) -> &str {
        "counting"
    }
}

fn corpus() -> Vec<ArticleRecord> {
    vec![
        ArticleRecord::new(
            "Price list update instructions",
            Some(
                "To update the price list, open the catalog section of the portal, choose \
                 the price list entry, upload the new file and confirm the replacement. \
                 The update takes effect after moderation."
                    .to_string(),
            ),
        ),
        ArticleRecord::new(
            "General info",
            Some(
                "The supplier portal provides registration, catalog browsing and \
                 document exchange for customers and contractors."
                    .to_string(),
            ),
        ),
        ArticleRecord::new(
            "Contract signing error",
            Some(
                "If the portal reports an error when signing a contract, check the \
                 certificate validity and retry the signature in the personal account."
                    .to_string(),
            ),
        ),
    ]
}

async fn service_with_generator(calls: Arc<AtomicUsize>) -> SearchService {
    let config = AppConfig::default();
    let encoder = Arc::new(HashEncoder::new(64));

    let handles = ModelHandles {
        encoder: Some(encoder.clone()),
        reranker: None,
        generator: Some(Arc::new(CountingGenerator { calls })),
        recognizer: ModelHandles::detached().recognizer,
    };

    let index = train_index(&corpus(), &handles, &config).await.unwrap();
    SearchService::new(Arc::new(index), handles, config)
}

#[tokio::test]
async fn test_keyword_article_wins_the_price_list_scenario() {
    let service = service_with_generator(Arc::new(AtomicUsize::new(0))).await;

    let ranked = service
        .recommendations("how to update the price list", 5)
        .await;

    assert!(!ranked.is_empty());
    assert_eq!(ranked[0].title, "Price list update instructions");

    let generic = ranked.iter().find(|article| article.title == "General info");
    if let Some(generic) = generic {
        assert!(ranked[0].score > generic.score);
    }
}

#[tokio::test]
async fn test_zero_match_query_returns_not_found_without_generation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let service = service_with_generator(calls.clone()).await;

    let ranked = service.recommendations("weather forecast tomorrow", 5).await;
    assert!(ranked.is_empty());

    let answer = service.answer("weather forecast tomorrow").await;
    assert!(answer.result.answer.contains("no matching information"));
    assert!(answer.result.fragments.is_empty());
    assert!(answer.result.sources.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_error_query_with_payment_escalates() {
    let service = service_with_generator(Arc::new(AtomicUsize::new(0))).await;

    let answer = service
        .answer("payment error when signing the contract")
        .await;
    assert!(answer.needs_operator);
}

#[tokio::test]
async fn test_plain_instruction_query_does_not_escalate() {
    let service = service_with_generator(Arc::new(AtomicUsize::new(0))).await;

    let answer = service.answer("how to update the price list").await;
    assert!(!answer.needs_operator);
    assert!(!answer.result.answer.is_empty());
    assert!(!answer.result.sources.is_empty());
}

#[tokio::test]
async fn test_empty_query_short_circuits() {
    let calls = Arc::new(AtomicUsize::new(0));
    let service = service_with_generator(calls.clone()).await;

    let answer = service.answer("   ").await;
    assert!(answer.result.answer.contains("empty"));
    assert!(!answer.needs_operator);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_recommendation_scores_are_deterministic() {
    let service = service_with_generator(Arc::new(AtomicUsize::new(0))).await;

    let first = service.recommendations("supplier portal error", 5).await;
    let second = service.recommendations("supplier portal error", 5).await;

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.score, b.score);
        assert_eq!(a.breakdown.lexical, b.breakdown.lexical);
        assert_eq!(a.breakdown.semantic, b.breakdown.semantic);
    }
}

#[tokio::test]
async fn test_breakdown_is_populated_for_ranked_articles() {
    let service = service_with_generator(Arc::new(AtomicUsize::new(0))).await;

    let ranked = service
        .recommendations("how to update the price list", 3)
        .await;
    let top = &ranked[0];

    assert!(top.breakdown.lexical > 0.0);
    assert!(top.breakdown.context_weighted >= top.breakdown.combined);
    assert_eq!(top.query_type, "instruction");
}

#[tokio::test]
async fn test_saved_index_serves_identical_scores() {
    let config = AppConfig::default();
    let encoder = Arc::new(HashEncoder::new(64));
    let handles = ModelHandles {
        encoder: Some(encoder.clone()),
        reranker: None,
        generator: None,
        recognizer: ModelHandles::detached().recognizer,
    };

    let index = train_index(&corpus(), &handles, &config).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.bin");
    index.save(&path).unwrap();
    let reloaded = KnowledgeIndex::load(&path).unwrap();

    let original_service = SearchService::new(
        Arc::new(index),
        ModelHandles {
            encoder: Some(encoder.clone()),
            reranker: None,
            generator: None,
            recognizer: ModelHandles::detached().recognizer,
        },
        config.clone(),
    );
    let reloaded_service = SearchService::new(
        Arc::new(reloaded),
        ModelHandles {
            encoder: Some(encoder),
            reranker: None,
            generator: None,
            recognizer: ModelHandles::detached().recognizer,
        },
        config,
    );

    for query in ["how to update the price list", "contract signing error"] {
        let original = original_service.recommendations(query, 5).await;
        let reloaded = reloaded_service.recommendations(query, 5).await;
        assert_eq!(original.len(), reloaded.len());
        for (a, b) in original.iter().zip(reloaded.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.score, b.score);
        }
    }
}

#[tokio::test]
async fn test_lexical_only_session_still_answers() {
    let config = AppConfig::default();
    let handles = ModelHandles::detached();
    let index = train_index(&corpus(), &handles, &config).await.unwrap();
    let service = SearchService::new(Arc::new(index), handles, config);

    assert!(!service.semantic_enabled());

    let answer = service.answer("how to update the price list").await;
    // generator detached: best fragment verbatim
    assert!(!answer.result.answer.is_empty());
    assert!(!answer.result.fragments.is_empty());
}
