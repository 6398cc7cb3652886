//! Fragment and answer types

use serde::{Deserialize, Serialize};

use crate::classification::NamedEntity;

/// A scored sub-passage of an article, used for answer grounding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    /// Id of the source article
    pub doc_id: u32,
    /// Title of the source article
    pub title: String,
    /// Passage text
    pub text: String,
    /// Number of whitespace-separated words
    pub word_count: usize,
    /// Blended relevance (passage similarity + parent article relevance)
    pub relevance: f32,
    /// Number of query entities matched in this passage
    pub entity_matches: usize,
    /// Named entities found in the passage
    #[serde(default)]
    pub entities: Vec<NamedEntity>,
}

/// A cited source article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub doc_id: u32,
    pub title: String,
}

/// Final answer to a user query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Synthesized answer text
    pub answer: String,
    /// First-person explanation of how the answer was derived
    pub reasoning: String,
    /// Fragments the answer is grounded on
    pub fragments: Vec<Fragment>,
    /// Deduplicated sources in order of first appearance among fragments
    pub sources: Vec<Source>,
    /// End-to-end time spent producing the answer
    pub execution_time_ms: u64,
}

impl AnswerResult {
    /// Answer for a query with no text
    pub fn empty_query(elapsed_ms: u64) -> Self {
        Self {
            answer: "The query is empty.".to_string(),
            reasoning: "The query contains no text.".to_string(),
            fragments: Vec::new(),
            sources: Vec::new(),
            execution_time_ms: elapsed_ms,
        }
    }

    /// Answer when no relevant passages were found in the knowledge base
    pub fn not_found(elapsed_ms: u64) -> Self {
        Self {
            answer: "Unfortunately, no matching information for your request \
                     was found in the knowledge base."
                .to_string(),
            reasoning: "No relevant passages matching the request were located \
                        in the knowledge base articles."
                .to_string(),
            fragments: Vec::new(),
            sources: Vec::new(),
            execution_time_ms: elapsed_ms,
        }
    }
}

/// Deduplicate fragment sources, keeping first-appearance order
pub fn collect_sources(fragments: &[Fragment]) -> Vec<Source> {
    let mut sources: Vec<Source> = Vec::new();
    for fragment in fragments {
        if !sources.iter().any(|s| s.doc_id == fragment.doc_id) {
            sources.push(Source {
                doc_id: fragment.doc_id,
                title: fragment.title.clone(),
            });
        }
    }
    sources
}
