//! Ranking pipeline tuning

use serde::{Deserialize, Serialize};

/// Retrieval and blending parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Candidate pool size per query variant
    pub candidates_k: usize,
    /// BM25 k1 parameter
    pub bm25_k1: f32,
    /// BM25 b parameter
    pub bm25_b: f32,
    /// Weight of the semantic signal in the lexical/semantic blend
    pub semantic_weight: f32,
    /// Articles passed to fragment extraction
    pub top_n: usize,
    /// Fragments passed to answer synthesis
    pub top_k_fragments: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            candidates_k: 100,
            bm25_k1: 1.5,
            bm25_b: 0.75,
            semantic_weight: 0.5,
            top_n: 5,
            top_k_fragments: 7,
        }
    }
}

/// Context and keyword boost multipliers
///
/// All boosts are additive fractions applied as `score * (1 + boost)`,
/// so they never lower a score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    /// Article intent type matches the query's
    pub type_boost: f32,
    /// Article role matches the query's
    pub role_boost: f32,
    /// Article component matches the query's
    pub component_boost: f32,

    /// Primary domain term (lemmatized); "price list" in the portal corpus
    pub primary_term: String,
    /// Synonym set for the secondary term, lemmatized at startup
    pub secondary_terms: Vec<String>,

    /// Both domain terms present in the title
    pub combined_title_boost: f32,
    /// Both domain terms present in the body only
    pub combined_body_boost: f32,
    /// Primary term in the title
    pub primary_title_boost: f32,
    /// Primary term in the body only
    pub primary_body_boost: f32,
    /// A secondary term in the title
    pub secondary_title_boost: f32,
    /// A secondary term in the body only
    pub secondary_body_boost: f32,
    /// Any general query keyword in the title, nothing else matched
    pub general_title_boost: f32,

    /// Variant weight: first clause before punctuation
    pub clause_variant_weight: f32,
    /// Variant weight: role-augmented query
    pub role_variant_weight: f32,
    /// Variant weight: component-augmented query
    pub component_variant_weight: f32,
    /// Variant weight: error-prefixed query
    pub error_variant_weight: f32,
    /// Variant weight: per detected action
    pub action_variant_weight: f32,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            type_boost: 0.03,
            role_boost: 0.04,
            component_boost: 0.03,

            primary_term: "price list".to_string(),
            secondary_terms: vec![
                "update".to_string(),
                "change".to_string(),
                "upload".to_string(),
                "replace".to_string(),
                "edit".to_string(),
            ],

            combined_title_boost: 0.8,
            combined_body_boost: 0.4,
            primary_title_boost: 0.2,
            primary_body_boost: 0.05,
            secondary_title_boost: 0.6,
            secondary_body_boost: 0.25,
            general_title_boost: 0.05,

            clause_variant_weight: 0.8,
            role_variant_weight: 1.2,
            component_variant_weight: 1.1,
            error_variant_weight: 0.9,
            action_variant_weight: 0.9,
        }
    }
}

/// Fragment segmentation and scoring parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentConfig {
    /// Target segment size in words
    pub segment_words: usize,
    /// Overlap between consecutive segments in words
    pub overlap_words: usize,
    /// Fragments shorter than this are discarded
    pub min_words: usize,
    /// Word count at which the length penalty reaches 1.0
    pub full_weight_words: usize,
    /// Weight of passage similarity in the passage score
    pub similarity_weight: f32,
    /// Weight of the entity bonus in the passage score
    pub entity_weight: f32,
    /// Entity bonus per matched entity
    pub entity_bonus_step: f32,
    /// Entity bonus cap
    pub entity_bonus_cap: f32,
    /// Weight of the passage score in the final blend
    pub fragment_weight: f32,
    /// Weight of the parent article score in the final blend
    pub document_weight: f32,
}

impl Default for FragmentConfig {
    fn default() -> Self {
        Self {
            segment_words: 150,
            overlap_words: 50,
            min_words: 20,
            full_weight_words: 50,
            similarity_weight: 0.8,
            entity_weight: 0.2,
            entity_bonus_step: 0.1,
            entity_bonus_cap: 0.3,
            fragment_weight: 0.6,
            document_weight: 0.4,
        }
    }
}

/// Generative model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Output bound for the main answer
    pub answer_max_tokens: usize,
    /// Sampling temperature for the main answer
    pub answer_temperature: f32,
    /// Output bound for the reasoning text
    pub reasoning_max_tokens: usize,
    /// Sampling temperature for the reasoning text
    pub reasoning_temperature: f32,
    /// Per-call timeout in seconds, enforced by the synthesizer
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            answer_max_tokens: 350,
            answer_temperature: 0.7,
            reasoning_max_tokens: 150,
            reasoning_temperature: 0.5,
            timeout_secs: 30,
        }
    }
}
