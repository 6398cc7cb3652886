//! Per-variant ranking loop
//!
//! For every query variant: BM25 scoring, candidate pool selection,
//! semantic re-ranking, context/keyword boosting and the variant weight.
//! Variant score vectors are aggregated by per-document maximum; the
//! intermediate scores of the winning variant are kept for the score
//! breakdown returned by the recommendations endpoint.

use portal_assist_config::SearchConfig;
use portal_assist_core::{AnalyzedQuery, PairwiseScorer, RankedArticle, ScoreBreakdown};
use portal_assist_text_processing::QueryAnalyzer;

use crate::bm25::top_candidates;
use crate::boost::ContextBooster;
use crate::index::KnowledgeIndex;
use crate::semantic::{blend_scores, candidate_similarities, min_max_normalize};

/// Full-corpus-length intermediate score vectors
#[derive(Debug, Clone)]
pub struct DebugScores {
    pub lexical: Vec<f32>,
    pub semantic: Vec<f32>,
    pub combined: Vec<f32>,
    pub context: Vec<f32>,
}

impl DebugScores {
    fn zeros(len: usize) -> Self {
        Self {
            lexical: vec![0.0; len],
            semantic: vec![0.0; len],
            combined: vec![0.0; len],
            context: vec![0.0; len],
        }
    }
}

/// Result of ranking one analyzed query
#[derive(Debug, Clone)]
pub struct RankOutcome {
    /// Final per-document scores (max over variants)
    pub final_scores: Vec<f32>,
    /// Intermediate scores of each document's winning variant
    pub debug: DebugScores,
    /// Whether any variant used the semantic signal
    pub semantic_used: bool,
}

/// Candidate-pool scores of one variant, kept for the breakdown
struct VariantData {
    candidates: Vec<u32>,
    lexical: Vec<f32>,
    semantic: Vec<f32>,
    combined: Vec<f32>,
    context: Vec<f32>,
}

/// Rank every corpus document against the analyzed query
pub async fn rank(
    index: &KnowledgeIndex,
    analyzer: &QueryAnalyzer,
    booster: &ContextBooster,
    query: &AnalyzedQuery,
    query_embedding: Option<&[f32]>,
    pairwise: Option<&dyn PairwiseScorer>,
    config: &SearchConfig,
) -> RankOutcome {
    let corpus_len = index.articles.len();
    let mut variant_scores: Vec<Vec<f32>> = Vec::with_capacity(query.variants.len());
    let mut variant_data: Vec<Option<VariantData>> = Vec::with_capacity(query.variants.len());
    let mut semantic_used = false;

    for variant in &query.variants {
        // variant texts carry phrase markers; flatten them for scoring
        let tokens = analyzer.lexical_tokens(&variant.text.replace('_', " "));
        if tokens.is_empty() {
            tracing::debug!(variant = %variant.text, "variant tokenized to nothing, skipping");
            variant_scores.push(vec![0.0; corpus_len]);
            variant_data.push(None);
            continue;
        }

        let lexical_scores = index.bm25.scores(&tokens);
        let candidates = top_candidates(&lexical_scores, config.candidates_k);
        if candidates.is_empty() {
            tracing::debug!(variant = %variant.text, "no lexical candidates for variant");
            variant_scores.push(vec![0.0; corpus_len]);
            variant_data.push(None);
            continue;
        }

        let candidate_lexical: Vec<f32> = candidates
            .iter()
            .map(|&doc| lexical_scores[doc as usize])
            .collect();

        let semantic =
            semantic_scores(index, query, query_embedding, pairwise, &candidates).await;

        let normalized_lexical = min_max_normalize(&candidate_lexical);
        let combined = match &semantic {
            Some(semantic) => {
                semantic_used = true;
                blend_scores(&normalized_lexical, semantic, config.semantic_weight)
            }
            None => normalized_lexical.clone(),
        };

        let mut context = combined.clone();
        booster.apply(
            &mut context,
            &candidates,
            &index.articles,
            &query.classification,
            &query.keywords,
        );

        let mut scattered = vec![0.0f32; corpus_len];
        for (slot, &doc) in candidates.iter().enumerate() {
            scattered[doc as usize] = context[slot] * variant.weight;
        }

        variant_scores.push(scattered);
        variant_data.push(Some(VariantData {
            candidates,
            lexical: candidate_lexical,
            semantic: semantic.unwrap_or_default(),
            combined,
            context,
        }));
    }

    aggregate(corpus_len, variant_scores, variant_data, semantic_used)
}

/// Semantic signal for the candidate pool
///
/// The pairwise model, when attached, supersedes cosine similarity. Either
/// signal failing degrades to the next one rather than erroring.
async fn semantic_scores(
    index: &KnowledgeIndex,
    query: &AnalyzedQuery,
    query_embedding: Option<&[f32]>,
    pairwise: Option<&dyn PairwiseScorer>,
    candidates: &[u32],
) -> Option<Vec<f32>> {
    if let Some(scorer) = pairwise {
        let mut scores = Vec::with_capacity(candidates.len());
        let mut failed = false;
        for &doc in candidates {
            let article = &index.articles[doc as usize];
            match scorer.score(&query.raw_text, &article.combined_text).await {
                Ok(score) => scores.push(score),
                Err(error) => {
                    tracing::warn!(%error, "pairwise scorer failed, falling back to cosine");
                    failed = true;
                    break;
                }
            }
        }
        if !failed {
            return Some(scores);
        }
    }

    match (query_embedding, index.embeddings.as_ref()) {
        (Some(embedding), Some(matrix)) => {
            Some(candidate_similarities(embedding, matrix, candidates))
        }
        _ => None,
    }
}

/// Max-reduce variant vectors and collect the winning variant's breakdown
fn aggregate(
    corpus_len: usize,
    variant_scores: Vec<Vec<f32>>,
    variant_data: Vec<Option<VariantData>>,
    semantic_used: bool,
) -> RankOutcome {
    let mut final_scores = vec![0.0f32; corpus_len];
    let mut best_variant = vec![usize::MAX; corpus_len];

    for (variant_index, scores) in variant_scores.iter().enumerate() {
        for (doc, &score) in scores.iter().enumerate() {
            if score > final_scores[doc] {
                final_scores[doc] = score;
                best_variant[doc] = variant_index;
            }
        }
    }

    let mut debug = DebugScores::zeros(corpus_len);
    for doc in 0..corpus_len {
        let variant_index = best_variant[doc];
        if variant_index == usize::MAX {
            continue;
        }
        let Some(Some(data)) = variant_data.get(variant_index) else {
            continue;
        };
        let Some(slot) = data.candidates.iter().position(|&c| c as usize == doc) else {
            continue;
        };
        debug.lexical[doc] = data.lexical[slot];
        debug.semantic[doc] = data.semantic.get(slot).copied().unwrap_or(0.0);
        debug.combined[doc] = data.combined[slot];
        debug.context[doc] = data.context[slot];
    }

    RankOutcome {
        final_scores,
        debug,
        semantic_used,
    }
}

/// Build the ranked article list from a rank outcome
///
/// At most `top_n` articles, positive scores only, ties broken by
/// ascending article id.
pub fn recommendations(
    index: &KnowledgeIndex,
    outcome: &RankOutcome,
    top_n: usize,
) -> Vec<RankedArticle> {
    let mut order: Vec<usize> = (0..outcome.final_scores.len()).collect();
    order.sort_by(|&a, &b| {
        outcome.final_scores[b]
            .partial_cmp(&outcome.final_scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    order
        .into_iter()
        .filter(|&doc| outcome.final_scores[doc] > 0.0)
        .take(top_n)
        .map(|doc| {
            let article = &index.articles[doc];
            RankedArticle {
                id: article.id,
                title: article.title.clone(),
                description: article.description.clone(),
                score: outcome.final_scores[doc],
                breakdown: ScoreBreakdown {
                    lexical: outcome.debug.lexical[doc],
                    semantic: outcome.debug.semantic[doc],
                    combined: outcome.debug.combined[doc],
                    context_weighted: outcome.debug.context[doc],
                },
                query_type: article.classification.query_type.label().to_string(),
                role: article.classification.role.clone(),
                component: article.classification.component.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{HashEncoder, OllamaEncoder};
    use crate::index::KnowledgeIndex;
    use portal_assist_config::AppConfig;
    use portal_assist_core::{ArticleRecord, TextEncoder};
    use portal_assist_text_processing::RuleBasedRecognizer;
    use std::sync::Arc;

    async fn fixture() -> (KnowledgeIndex, QueryAnalyzer, ContextBooster, AppConfig) {
        let config = AppConfig::default();
        let records = vec![
            ArticleRecord::new(
                "Price list update instructions",
                Some("How to update the price list in the catalog.".to_string()),
            ),
            ArticleRecord::new(
                "General info",
                Some("An overview of the supplier portal features.".to_string()),
            ),
            ArticleRecord::new(
                "Contract signing error",
                Some("The portal reports an error when signing a contract.".to_string()),
            ),
        ];
        let encoder = HashEncoder::new(64);
        let index = KnowledgeIndex::train(&records, Some(&encoder), &config)
            .await
            .unwrap();
        let analyzer = index.analyzer(Arc::new(RuleBasedRecognizer::new()), &config);
        let booster = ContextBooster::new(config.boost.clone());
        (index, analyzer, booster, config)
    }

    #[tokio::test]
    async fn test_keyword_match_outranks_generic_article() {
        let (index, analyzer, booster, config) = fixture().await;
        let encoder = HashEncoder::new(64);
        let query = analyzer.analyze("how to update the price list");
        let embedding = encoder.encode(&query.raw_text).await.unwrap();

        let outcome = rank(
            &index,
            &analyzer,
            &booster,
            &query,
            Some(&embedding),
            None,
            &config.search,
        )
        .await;

        // article 0 carries both keywords in its title
        assert!(outcome.final_scores[0] > outcome.final_scores[1]);
        let ranked = recommendations(&index, &outcome, 5);
        assert_eq!(ranked[0].id, 0);
    }

    #[tokio::test]
    async fn test_zero_match_query_is_empty() {
        let (index, analyzer, booster, config) = fixture().await;
        let query = analyzer.analyze("weather forecast tomorrow");

        let outcome = rank(&index, &analyzer, &booster, &query, None, None, &config.search).await;

        assert!(outcome.final_scores.iter().all(|&s| s == 0.0));
        assert!(recommendations(&index, &outcome, 5).is_empty());
    }

    #[tokio::test]
    async fn test_final_score_is_variant_maximum() {
        let (index, analyzer, booster, config) = fixture().await;
        let query = analyzer.analyze("how to update the price list");

        let outcome = rank(&index, &analyzer, &booster, &query, None, None, &config.search).await;

        // re-rank each variant in isolation; the aggregate must be the max
        for doc in 0..index.len() {
            let mut single_best = 0.0f32;
            for variant in &query.variants {
                let single = AnalyzedQuery {
                    raw_text: query.raw_text.clone(),
                    normalized_text: query.normalized_text.clone(),
                    classification: query.classification.clone(),
                    entities: query.entities.clone(),
                    keywords: query.keywords.clone(),
                    variants: vec![variant.clone()],
                };
                let outcome_single =
                    rank(&index, &analyzer, &booster, &single, None, None, &config.search).await;
                single_best = single_best.max(outcome_single.final_scores[doc]);
            }
            assert!((outcome.final_scores[doc] - single_best).abs() < 1e-5);
        }
    }

    #[tokio::test]
    async fn test_ranking_is_deterministic() {
        let (index, analyzer, booster, config) = fixture().await;
        let encoder = HashEncoder::new(64);
        let query = analyzer.analyze("supplier portal error");
        let embedding = encoder.encode(&query.raw_text).await.unwrap();

        let first = rank(
            &index,
            &analyzer,
            &booster,
            &query,
            Some(&embedding),
            None,
            &config.search,
        )
        .await;
        let second = rank(
            &index,
            &analyzer,
            &booster,
            &query,
            Some(&embedding),
            None,
            &config.search,
        )
        .await;

        assert_eq!(first.final_scores, second.final_scores);
        assert_eq!(first.debug.lexical, second.debug.lexical);
    }

    #[tokio::test]
    async fn test_candidate_pool_bounded() {
        let config = AppConfig {
            search: portal_assist_config::SearchConfig {
                candidates_k: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        let records: Vec<ArticleRecord> = (0..10)
            .map(|i| {
                ArticleRecord::new(
                    format!("Portal article {}", i),
                    Some("supplier portal usage notes".to_string()),
                )
            })
            .collect();
        let index = KnowledgeIndex::train(&records, None, &config).await.unwrap();
        let analyzer = index.analyzer(Arc::new(RuleBasedRecognizer::new()), &config);
        let booster = ContextBooster::new(config.boost.clone());

        let query = analyzer.analyze("supplier portal");
        let outcome = rank(&index, &analyzer, &booster, &query, None, None, &config.search).await;

        // every positively scored document sits inside some variant's pool
        let positive = outcome.final_scores.iter().filter(|&&s| s > 0.0).count();
        assert!(positive <= config.search.candidates_k * query.variants.len());
        assert!(positive > 0);
    }

    #[tokio::test]
    async fn test_lexical_fallback_without_embeddings() {
        let (index, analyzer, booster, config) = fixture().await;
        let query = analyzer.analyze("how to update the price list");

        // no query embedding: combiner runs lexical-only, still ranks
        let outcome = rank(&index, &analyzer, &booster, &query, None, None, &config.search).await;
        assert!(!outcome.semantic_used);
        assert!(outcome.final_scores[0] > 0.0);
    }

    #[test]
    fn test_ollama_encoder_constructs_offline() {
        let _encoder = OllamaEncoder::new(Default::default());
    }
}
