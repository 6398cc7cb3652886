//! Passage segmentation and fragment ranking
//!
//! Top-ranked articles are split into overlapping passages; each passage is
//! scored against the query by dense similarity plus an entity-overlap
//! bonus, penalized for shortness, and blended with the parent article's
//! relevance. Without an encoder the entity bonus alone carries the
//! passage score.

use portal_assist_config::FragmentConfig;
use portal_assist_core::{
    AnalyzedQuery, EntityRecognizer, Fragment, RankedArticle, TextEncoder,
};
use portal_assist_text_processing::{split_sentences, word_count};

use crate::encoder::cosine_similarity;

/// Per-fragment score components, kept for observability
#[derive(Debug, Clone)]
pub struct FragmentDebug {
    pub doc_id: u32,
    pub word_count: usize,
    pub similarity: f32,
    pub entity_bonus: f32,
    pub length_penalty: f32,
    pub relevance: f32,
}

/// Split text into overlapping segments on sentence boundaries
///
/// Sentences accumulate until the target word count is reached; the next
/// segment re-seeds with the trailing sentences that fit the overlap
/// budget. Texts of three or fewer sentences stay whole.
pub fn split_into_segments(text: &str, config: &FragmentConfig) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let sentences = split_sentences(text);
    if sentences.len() <= 3 {
        return vec![text.to_string()];
    }

    let mut segments = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_words = 0usize;

    for sentence in sentences {
        current_words += word_count(&sentence);
        current.push(sentence);

        if current_words >= config.segment_words {
            segments.push(current.join(" "));

            // trailing sentences that fit within the overlap budget
            let mut overlap: Vec<String> = Vec::new();
            let mut overlap_words = 0usize;
            for sentence in current.iter().rev() {
                let words = word_count(sentence);
                if overlap_words + words <= config.overlap_words {
                    overlap.insert(0, sentence.clone());
                    overlap_words += words;
                } else {
                    break;
                }
            }

            current = overlap;
            current_words = overlap_words;
        }
    }

    if !current.is_empty() {
        segments.push(current.join(" "));
    }

    segments
}

/// Extract and rank fragments from the top articles
pub async fn extract_fragments(
    query: &AnalyzedQuery,
    ranked: &[RankedArticle],
    query_embedding: Option<&[f32]>,
    encoder: Option<&dyn TextEncoder>,
    recognizer: &dyn EntityRecognizer,
    config: &FragmentConfig,
    top_k: usize,
) -> (Vec<Fragment>, Vec<FragmentDebug>) {
    let mut fragments: Vec<Fragment> = Vec::new();
    let mut debug_entries: Vec<FragmentDebug> = Vec::new();

    for article in ranked {
        let full_text = match &article.description {
            Some(description) if !description.is_empty() => {
                format!("{}. {}", article.title, description)
            }
            _ => article.title.clone(),
        };

        for segment in split_into_segments(&full_text, config) {
            let words = word_count(&segment);
            if words < config.min_words {
                continue;
            }

            let length_penalty = (words as f32 / config.full_weight_words as f32).min(1.0);

            let segment_entities = recognizer.extract(&segment);
            let entity_matches = query
                .entities
                .iter()
                .map(|query_entity| {
                    segment_entities
                        .iter()
                        .filter(|segment_entity| query_entity.fuzzy_matches(segment_entity))
                        .count()
                })
                .sum::<usize>();
            let entity_bonus = (config.entity_bonus_step * entity_matches as f32)
                .min(config.entity_bonus_cap);

            let similarity = match (query_embedding, encoder) {
                (Some(embedding), Some(encoder)) => match encoder.encode(&segment).await {
                    Ok(segment_embedding) => {
                        Some(cosine_similarity(embedding, &segment_embedding))
                    }
                    Err(error) => {
                        tracing::debug!(%error, "segment encoding failed, entity bonus only");
                        None
                    }
                },
                _ => None,
            };

            let passage_score = match similarity {
                Some(similarity) => {
                    config.similarity_weight * similarity + config.entity_weight * entity_bonus
                }
                None => entity_bonus,
            } * length_penalty;

            let relevance = config.fragment_weight * passage_score
                + config.document_weight * article.score;

            debug_entries.push(FragmentDebug {
                doc_id: article.id,
                word_count: words,
                similarity: similarity.unwrap_or(0.0),
                entity_bonus,
                length_penalty,
                relevance,
            });
            fragments.push(Fragment {
                doc_id: article.id,
                title: article.title.clone(),
                text: segment,
                word_count: words,
                relevance,
                entity_matches,
                entities: segment_entities,
            });
        }
    }

    fragments.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.doc_id.cmp(&b.doc_id))
    });
    fragments.truncate(top_k);

    tracing::debug!(
        fragments = fragments.len(),
        considered = debug_entries.len(),
        "fragments extracted"
    );
    (fragments, debug_entries)
}
