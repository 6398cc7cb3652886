//! Semantic scoring utilities
//!
//! The embedding matrix holds one precomputed row per corpus article.
//! Candidate scoring computes cosine similarity against the query
//! embedding; lexical scores are min-max normalized over the candidate set
//! before blending.

use serde::{Deserialize, Serialize};

use crate::encoder::cosine_similarity;

/// Row-major matrix of document embeddings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingMatrix {
    dimension: usize,
    data: Vec<f32>,
}

impl EmbeddingMatrix {
    /// Assemble from per-document vectors; all rows must share a dimension
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Option<Self> {
        let dimension = rows.first()?.len();
        if dimension == 0 || rows.iter().any(|row| row.len() != dimension) {
            return None;
        }
        let mut data = Vec::with_capacity(rows.len() * dimension);
        for row in rows {
            data.extend(row);
        }
        Some(Self { dimension, data })
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    pub fn rows(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Cosine similarity of the query against each candidate's embedding
pub fn candidate_similarities(
    query_embedding: &[f32],
    matrix: &EmbeddingMatrix,
    candidates: &[u32],
) -> Vec<f32> {
    candidates
        .iter()
        .map(|&doc| {
            matrix
                .row(doc as usize)
                .map(|row| cosine_similarity(query_embedding, row))
                .unwrap_or(0.0)
        })
        .collect()
}

/// Min-max normalize scores to [0, 1]
///
/// A flat score distribution maps to 0.5 when positive, 0 otherwise.
pub fn min_max_normalize(scores: &[f32]) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }
    let min = scores.iter().copied().fold(f32::INFINITY, f32::min);
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    if max > min {
        scores.iter().map(|&s| (s - min) / (max - min)).collect()
    } else {
        let flat = if max > 0.0 { 0.5 } else { 0.0 };
        vec![flat; scores.len()]
    }
}

/// Blend normalized lexical and semantic scores
///
/// `combined = (1 - weight) * lexical + weight * semantic`
pub fn blend_scores(lexical: &[f32], semantic: &[f32], weight: f32) -> Vec<f32> {
    lexical
        .iter()
        .zip(semantic.iter())
        .map(|(&lex, &sem)| (1.0 - weight) * lex + weight * sem)
        .collect()
}
