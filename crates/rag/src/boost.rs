//! Context-match and keyword-tier score boosting
//!
//! Applied multiplicatively to each candidate, in order: classification
//! matches (type, role, component), then exactly one keyword tier, then the
//! variant weight (applied by the ranker). All multipliers are >= 1, so a
//! boost never lowers a similarity-derived score.

use portal_assist_config::BoostConfig;
use portal_assist_core::{Article, QueryClassification};
use portal_assist_text_processing::{lemma_phrase, normalize_text};

/// Booster with the domain keyword terms pre-lemmatized
pub struct ContextBooster {
    config: BoostConfig,
    primary: String,
    secondary: Vec<String>,
}

impl ContextBooster {
    pub fn new(config: BoostConfig) -> Self {
        let primary = lemma_phrase(&config.primary_term);
        let secondary = config
            .secondary_terms
            .iter()
            .map(|term| lemma_phrase(term))
            .collect();
        Self {
            config,
            primary,
            secondary,
        }
    }

    /// Apply context and keyword boosts to candidate scores in place
    ///
    /// `scores[i]` is the combined score of `articles[candidates[i]]`.
    /// Candidates with non-positive scores are left untouched.
    pub fn apply(
        &self,
        scores: &mut [f32],
        candidates: &[u32],
        articles: &[Article],
        query: &QueryClassification,
        query_keywords: &[String],
    ) {
        for (slot, &doc) in candidates.iter().enumerate() {
            if scores[slot] <= 0.0 {
                continue;
            }
            let Some(article) = articles.get(doc as usize) else {
                continue;
            };

            let mut boost = 1.0f32;

            // classification matches, independent and multiplicative
            if article.classification.query_type == query.query_type {
                boost *= 1.0 + self.config.type_boost;
            }
            if let Some(role) = &query.role {
                if article.classification.role.as_deref() == Some(role.as_str()) {
                    boost *= 1.0 + self.config.role_boost;
                }
            }
            if let Some(component) = &query.component {
                if article.classification.component.as_deref() == Some(component.as_str()) {
                    boost *= 1.0 + self.config.component_boost;
                }
            }

            boost *= self.keyword_tier(article, query_keywords);

            scores[slot] *= boost;
        }
    }

    /// Exactly one keyword tier fires per candidate
    fn keyword_tier(&self, article: &Article, query_keywords: &[String]) -> f32 {
        if query_keywords.is_empty() {
            return 1.0;
        }

        let title = lemma_phrase(&normalize_text(&article.title));
        let body = lemma_phrase(&normalize_text(&article.combined_text));

        let primary_in_title = phrase_in(&title, &self.primary);
        let secondary_in_title = self.secondary.iter().any(|term| phrase_in(&title, term));
        let primary_in_body = phrase_in(&body, &self.primary);
        let secondary_in_body = self.secondary.iter().any(|term| phrase_in(&body, term));

        if primary_in_title && secondary_in_title {
            return 1.0 + self.config.combined_title_boost;
        }
        if primary_in_title {
            return 1.0 + self.config.primary_title_boost;
        }
        if secondary_in_title {
            return 1.0 + self.config.secondary_title_boost;
        }
        if primary_in_body && secondary_in_body {
            return 1.0 + self.config.combined_body_boost;
        }
        if primary_in_body {
            return 1.0 + self.config.primary_body_boost;
        }
        if secondary_in_body {
            return 1.0 + self.config.secondary_body_boost;
        }

        let general_in_title = query_keywords
            .iter()
            .any(|keyword| phrase_in(&title, keyword));
        if general_in_title {
            return 1.0 + self.config.general_title_boost;
        }

        1.0
    }
}

/// Word-boundary phrase containment over space-separated lemma strings
fn phrase_in(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let padded_text = format!(" {} ", text);
    let padded_phrase = format!(" {} ", phrase);
    padded_text.contains(&padded_phrase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_assist_core::{DocClassification, QueryType};

    fn article(id: u32, title: &str, body: &str, query_type: QueryType) -> Article {
        Article {
            id,
            title: title.to_string(),
            description: Some(body.to_string()),
            combined_text: format!("{} {}", title, body),
            classification: DocClassification {
                query_type,
                role: None,
                component: None,
                is_error: query_type == QueryType::Error,
            },
            lexical_tokens: Vec::new(),
        }
    }

    fn keywords() -> Vec<String> {
        vec![lemma_phrase("price"), lemma_phrase("update")]
    }

    #[test]
    fn test_combined_title_tier_is_strongest() {
        let booster = ContextBooster::new(BoostConfig::default());
        let with_both = article(
            0,
            "Price list update instructions",
            "steps to follow",
            QueryType::Instruction,
        );
        let with_neither = article(1, "General info", "portal overview", QueryType::Info);

        let tier_both = booster.keyword_tier(&with_both, &keywords());
        let tier_neither = booster.keyword_tier(&with_neither, &keywords());

        assert!((tier_both - 1.8).abs() < 1e-6);
        assert!((tier_neither - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_tier_fires() {
        let booster = ContextBooster::new(BoostConfig::default());
        // secondary term in title only
        let article = article(0, "How to update your profile", "profile settings", QueryType::Info);
        let tier = booster.keyword_tier(&article, &keywords());
        assert!((tier - 1.6).abs() < 1e-6);
    }

    #[test]
    fn test_body_only_tier() {
        let booster = ContextBooster::new(BoostConfig::default());
        let article = article(
            0,
            "Catalog reference",
            "describes the price list and how to update it",
            QueryType::Info,
        );
        let tier = booster.keyword_tier(&article, &keywords());
        assert!((tier - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_general_keyword_tier() {
        let booster = ContextBooster::new(BoostConfig::default());
        let article = article(0, "Price categories", "category overview", QueryType::Info);
        // primary phrase "price list" absent, but "price" is a query keyword
        let tier = booster.keyword_tier(&article, &[lemma_phrase("price")]);
        assert!((tier - 1.05).abs() < 1e-6);
    }

    #[test]
    fn test_boost_never_lowers_scores() {
        let booster = ContextBooster::new(BoostConfig::default());
        let articles = vec![
            article(0, "Price list update", "both terms in title", QueryType::Instruction),
            article(1, "Misc", "nothing relevant", QueryType::Info),
        ];
        let candidates = vec![0u32, 1u32];
        let mut scores = vec![0.5f32, 0.5f32];
        let before = scores.clone();

        let query = QueryClassification {
            query_type: QueryType::Instruction,
            ..Default::default()
        };
        booster.apply(&mut scores, &candidates, &articles, &query, &keywords());

        for (after, before) in scores.iter().zip(before.iter()) {
            assert!(after >= before);
        }
        // matching article boosted strictly more
        assert!(scores[0] > scores[1]);
    }

    #[test]
    fn test_matching_context_boosts_more() {
        let booster = ContextBooster::new(BoostConfig::default());
        let articles = vec![
            article(0, "Same title", "same body", QueryType::Error),
            article(1, "Same title", "same body", QueryType::Info),
        ];
        let candidates = vec![0u32, 1u32];
        let mut scores = vec![1.0f32, 1.0f32];

        let query = QueryClassification {
            query_type: QueryType::Error,
            ..Default::default()
        };
        booster.apply(&mut scores, &candidates, &articles, &query, &[]);

        assert!(scores[0] > scores[1]);
    }
}
