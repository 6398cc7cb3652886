//! Corpus-derived vocabulary
//!
//! Built once at training time from the combined article texts: word
//! frequencies for spelling correction plus repeated bigrams/trigrams used
//! as phrase markers during preprocessing. Serialized with the index
//! artifacts.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::normalize::{normalize_text, tokenize};

/// Minimum occurrences for an n-gram to enter the phrase vocabulary
const NGRAM_MIN_COUNT: usize = 2;

/// Corpus vocabulary: word frequencies and repeated phrases
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    /// word -> occurrences across the corpus
    pub words: HashMap<String, u32>,
    /// bigrams seen at least [`NGRAM_MIN_COUNT`] times
    pub bigrams: HashSet<String>,
    /// trigrams seen at least [`NGRAM_MIN_COUNT`] times
    pub trigrams: HashSet<String>,
}

impl Vocabulary {
    /// Build the vocabulary from corpus texts
    pub fn build<'a>(texts: impl Iterator<Item = &'a str>) -> Self {
        let mut words: HashMap<String, u32> = HashMap::new();
        let mut bigram_counts: HashMap<String, usize> = HashMap::new();
        let mut trigram_counts: HashMap<String, usize> = HashMap::new();

        for text in texts {
            let tokens = tokenize(&normalize_text(text));
            for token in &tokens {
                *words.entry(token.clone()).or_insert(0) += 1;
            }
            for window in tokens.windows(2) {
                *bigram_counts.entry(window.join(" ")).or_insert(0) += 1;
            }
            for window in tokens.windows(3) {
                *trigram_counts.entry(window.join(" ")).or_insert(0) += 1;
            }
        }

        let bigrams = bigram_counts
            .into_iter()
            .filter(|(_, count)| *count >= NGRAM_MIN_COUNT)
            .map(|(gram, _)| gram)
            .collect();
        let trigrams = trigram_counts
            .into_iter()
            .filter(|(_, count)| *count >= NGRAM_MIN_COUNT)
            .map(|(gram, _)| gram)
            .collect();

        let vocabulary = Self {
            words,
            bigrams,
            trigrams,
        };
        tracing::debug!(
            words = vocabulary.words.len(),
            bigrams = vocabulary.bigrams.len(),
            trigrams = vocabulary.trigrams.len(),
            "vocabulary built"
        );
        vocabulary
    }

    /// Register the domain term sets as known phrases
    pub fn add_phrases<'a>(&mut self, phrases: impl Iterator<Item = &'a str>) {
        for phrase in phrases {
            match phrase.split_whitespace().count() {
                2 => {
                    self.bigrams.insert(phrase.to_string());
                }
                3 => {
                    self.trigrams.insert(phrase.to_string());
                }
                _ => {}
            }
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    pub fn frequency(&self, word: &str) -> u32 {
        self.words.get(word).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// N-grams of `tokens` that are known corpus phrases
    pub fn known_ngrams(&self, tokens: &[String]) -> Vec<String> {
        let mut found = Vec::new();
        for window in tokens.windows(2) {
            let gram = window.join(" ");
            if self.bigrams.contains(&gram) {
                found.push(gram);
            }
        }
        for window in tokens.windows(3) {
            let gram = window.join(" ");
            if self.trigrams.contains(&gram) {
                found.push(gram);
            }
        }
        found
    }
}
