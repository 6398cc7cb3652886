//! Hybrid retrieval and ranking for the supplier portal assistant
//!
//! Features:
//! - BM25 lexical retrieval with a bounded candidate pool per query variant
//! - Dense semantic re-ranking against a precomputed embedding matrix
//! - Optional pairwise reranking model replacing the cosine signal
//! - Context-match and keyword-tier score boosting
//! - Per-variant scoring aggregated by per-document maximum
//! - Overlapping passage segmentation and fragment ranking
//! - Trained index artifacts with bincode persistence
//! - Ollama-backed encoder plus a deterministic offline fallback

pub mod bm25;
pub mod boost;
pub mod encoder;
pub mod fragments;
pub mod index;
pub mod knowledge;
pub mod ranker;
pub mod semantic;

pub use bm25::Bm25Index;
pub use boost::ContextBooster;
pub use encoder::{cosine_similarity, EncoderConfig, HashEncoder, OllamaEncoder};
pub use fragments::{extract_fragments, split_into_segments, FragmentDebug};
pub use index::KnowledgeIndex;
pub use knowledge::{KnowledgeFile, KnowledgeLoader};
pub use ranker::{rank, recommendations, DebugScores, RankOutcome};
pub use semantic::{blend_scores, candidate_similarities, min_max_normalize, EmbeddingMatrix};

use thiserror::Error;

/// Retrieval errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Reranker error: {0}")]
    Reranker(String),

    #[error("Corpus is empty, training cannot proceed")]
    EmptyCorpus,

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<RagError> for portal_assist_core::Error {
    fn from(err: RagError) -> Self {
        match err {
            RagError::EmptyCorpus => portal_assist_core::Error::Training(err.to_string()),
            RagError::Persistence(_) => portal_assist_core::Error::Persistence(err.to_string()),
            _ => portal_assist_core::Error::Rag(err.to_string()),
        }
    }
}
