//! Stopword list for query and article preprocessing
//!
//! Negations and problem markers ("not", "no", "without", "error",
//! "problem") are deliberately NOT stopwords: they decide whether a query
//! is classified as an error report.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "am", "do", "does",
        "did", "have", "has", "had", "i", "me", "my", "we", "our", "you", "your", "he", "she",
        "it", "its", "they", "them", "their", "this", "that", "these", "those", "what", "which",
        "who", "whom", "whose", "to", "of", "in", "on", "at", "by", "with", "from", "into",
        "about", "as", "for", "and", "or", "but", "if", "then", "else", "so", "than", "too",
        "very", "can", "could", "will", "would", "shall", "should", "may", "might", "must",
        "there", "here", "when", "where", "why", "all", "any", "both", "each", "few", "more",
        "most", "other", "some", "such", "only", "own", "same", "please",
    ]
    .into_iter()
    .collect()
});

/// Check whether a lowercase token is a stopword
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}
