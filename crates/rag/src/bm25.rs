//! BM25 Okapi lexical index
//!
//! Inverted index over the articles' lexical tokens. Articles that tokenize
//! to an empty sequence are skipped at build time; an explicit position map
//! scatters scores back to original corpus positions, so `scores` always
//! returns a full-corpus-length vector.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single entry in a term's postings list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    /// Dense index into the filtered document list
    pub doc: u32,
    /// Occurrences of the term in the document
    pub term_frequency: u32,
}

/// BM25 Okapi index with an explicit corpus position map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bm25Index {
    /// term -> postings over filtered documents
    index: HashMap<String, Vec<Posting>>,
    /// filtered document -> token count
    doc_lengths: Vec<u32>,
    /// filtered document -> original corpus position
    positions: Vec<u32>,
    /// total documents in the corpus (including skipped ones)
    corpus_len: usize,
    total_doc_length: u64,
    k1: f32,
    b: f32,
}

impl Bm25Index {
    /// Build the index from per-article token sequences
    pub fn build(token_lists: &[Vec<String>], k1: f32, b: f32) -> Self {
        let mut index: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut doc_lengths = Vec::new();
        let mut positions = Vec::new();
        let mut total_doc_length = 0u64;

        for (corpus_position, tokens) in token_lists.iter().enumerate() {
            if tokens.is_empty() {
                continue;
            }
            let doc = doc_lengths.len() as u32;
            positions.push(corpus_position as u32);
            doc_lengths.push(tokens.len() as u32);
            total_doc_length += tokens.len() as u64;

            let mut frequencies: HashMap<&str, u32> = HashMap::new();
            for token in tokens {
                *frequencies.entry(token.as_str()).or_insert(0) += 1;
            }
            for (term, term_frequency) in frequencies {
                index.entry(term.to_string()).or_default().push(Posting {
                    doc,
                    term_frequency,
                });
            }
        }

        tracing::debug!(
            indexed = doc_lengths.len(),
            skipped = token_lists.len() - doc_lengths.len(),
            terms = index.len(),
            "BM25 index built"
        );

        Self {
            index,
            doc_lengths,
            positions,
            corpus_len: token_lists.len(),
            total_doc_length,
            k1,
            b,
        }
    }

    fn average_doc_length(&self) -> f32 {
        if self.doc_lengths.is_empty() {
            return 0.0;
        }
        self.total_doc_length as f32 / self.doc_lengths.len() as f32
    }

    /// Number of documents actually indexed
    pub fn indexed_count(&self) -> usize {
        self.doc_lengths.len()
    }

    /// Score every corpus document against the query tokens
    ///
    /// Returns a vector of `corpus_len` scores; documents skipped at build
    /// time score 0.
    pub fn scores(&self, query_tokens: &[String]) -> Vec<f32> {
        let mut corpus_scores = vec![0.0f32; self.corpus_len];
        if query_tokens.is_empty() || self.doc_lengths.is_empty() {
            return corpus_scores;
        }

        let avgdl = self.average_doc_length();
        let n = self.doc_lengths.len() as f32;

        let mut filtered_scores = vec![0.0f32; self.doc_lengths.len()];
        for token in query_tokens {
            let Some(postings) = self.index.get(token) else {
                continue;
            };
            let df = postings.len() as f32;
            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();

            for posting in postings {
                let dl = self.doc_lengths[posting.doc as usize] as f32;
                let tf = posting.term_frequency as f32;
                let tf_norm =
                    (tf * (self.k1 + 1.0)) / (tf + self.k1 * (1.0 - self.b + self.b * dl / avgdl));
                filtered_scores[posting.doc as usize] += idf * tf_norm;
            }
        }

        // scatter back to original corpus positions
        for (doc, score) in filtered_scores.into_iter().enumerate() {
            corpus_scores[self.positions[doc] as usize] = score;
        }
        corpus_scores
    }
}

/// Select the candidate pool: top `k` positive scores
///
/// Ties break by ascending document id so candidate selection is
/// deterministic.
pub fn top_candidates(scores: &[f32], k: usize) -> Vec<u32> {
    let mut order: Vec<u32> = (0..scores.len() as u32).collect();
    order.sort_by(|&a, &b| {
        scores[b as usize]
            .partial_cmp(&scores[a as usize])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    order
        .into_iter()
        .take(k)
        .filter(|&doc| scores[doc as usize] > 0.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(|t| t.to_string()).collect()
    }

    fn build_index() -> Bm25Index {
        Bm25Index::build(
            &[
                tokens("price list update instruction supplier"),
                tokens("supplier registration portal"),
                tokens(""), // skipped
                tokens("contract signing error portal"),
            ],
            1.5,
            0.75,
        )
    }

    #[test]
    fn test_empty_documents_skipped() {
        let index = build_index();
        assert_eq!(index.indexed_count(), 3);

        let scores = index.scores(&tokens("portal"));
        assert_eq!(scores.len(), 4);
        // skipped document scores zero
        assert_eq!(scores[2], 0.0);
        assert!(scores[1] > 0.0);
        assert!(scores[3] > 0.0);
    }

    #[test]
    fn test_relevant_document_scores_highest() {
        let index = build_index();
        let scores = index.scores(&tokens("price list update"));
        let best = scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i);
        assert_eq!(best, Some(0));
    }

    #[test]
    fn test_scores_are_deterministic() {
        let index = build_index();
        let query = tokens("supplier portal");
        assert_eq!(index.scores(&query), index.scores(&query));
    }

    #[test]
    fn test_unknown_terms_score_zero() {
        let index = build_index();
        let scores = index.scores(&tokens("weather forecast"));
        assert!(scores.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_top_candidates_bounded_and_positive() {
        let scores = vec![0.0, 2.0, 1.0, 0.0, 3.0];
        let candidates = top_candidates(&scores, 2);
        assert_eq!(candidates, vec![4, 1]);

        let all = top_candidates(&scores, 10);
        assert_eq!(all, vec![4, 1, 2]); // zeros dropped
    }

    #[test]
    fn test_top_candidates_tie_breaks_by_id() {
        let scores = vec![1.0, 1.0, 1.0];
        assert_eq!(top_candidates(&scores, 2), vec![0, 1]);
    }
}
