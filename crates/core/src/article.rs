//! Knowledge base article types

use serde::{Deserialize, Serialize};

use crate::classification::DocClassification;

/// Raw corpus record as supplied at training time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Article title
    pub title: String,
    /// Article body, may be absent
    #[serde(default)]
    pub description: Option<String>,
}

impl ArticleRecord {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
        }
    }
}

/// Indexed knowledge article
///
/// Built once during training and immutable afterwards. Owned exclusively
/// by the knowledge index; query-time code only borrows articles.
/// The dense embedding lives in the index's embedding matrix, keyed by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Position in the corpus, also the embedding matrix row
    pub id: u32,
    pub title: String,
    pub description: Option<String>,
    /// Title and description joined, used for search and segmentation
    pub combined_text: String,
    /// Classification assigned at indexing time
    pub classification: DocClassification,
    /// Normalized tokens of `combined_text` for lexical scoring
    pub lexical_tokens: Vec<String>,
}

impl Article {
    /// Full text used for fragment extraction: "Title. Description"
    pub fn full_text(&self) -> String {
        match &self.description {
            Some(desc) if !desc.is_empty() => format!("{}. {}", self.title, desc),
            _ => self.title.clone(),
        }
    }
}

/// Per-signal score breakdown for one returned article
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Raw BM25 score
    pub lexical: f32,
    /// Cosine or pairwise-model similarity
    pub semantic: f32,
    /// Blend of normalized lexical and semantic scores
    pub combined: f32,
    /// After context and keyword boosts
    pub context_weighted: f32,
}

/// One ranked article in a recommendations response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedArticle {
    pub id: u32,
    pub title: String,
    pub description: Option<String>,
    /// Final relevance after variant aggregation
    pub score: f32,
    /// Intermediate scores for observability
    pub breakdown: ScoreBreakdown,
    /// Article classification context
    pub query_type: String,
    pub role: Option<String>,
    pub component: Option<String>,
}
