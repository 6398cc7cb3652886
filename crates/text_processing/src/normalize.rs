//! Text normalization primitives

use unicode_segmentation::UnicodeSegmentation;

/// Lowercase and replace punctuation with spaces
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect()
}

/// Split normalized text into word tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_string()).collect()
}

/// Split text into sentences on unicode sentence boundaries
pub fn split_sentences(text: &str) -> Vec<String> {
    text.unicode_sentences()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Count whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
