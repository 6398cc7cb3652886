//! Abbreviation discovery and expansion
//!
//! Abbreviation pairs are discovered automatically from the corpus at
//! training time: parenthetical patterns ("universal transfer document
//! (UTD)" and "UTD (universal transfer document)") plus capitalized word
//! sequences whose initials appear as an acronym in the same text. At query
//! time the counterpart form of any matched abbreviation is appended to the
//! processed query.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// "full phrase (ABBR)"
static FULL_THEN_ABBR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z][A-Za-z ]+?)\s+\(([A-Z]{2,})\)").unwrap());

/// "ABBR (full phrase)"
static ABBR_THEN_FULL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]{2,})\s+\(([A-Za-z][A-Za-z ]+?)\)").unwrap());

/// Bidirectional abbreviation dictionary built from the corpus
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbbreviationDictionary {
    /// ABBR -> full phrase (lowercase)
    pub expansions: HashMap<String, String>,
    /// full phrase (lowercase) -> ABBR
    pub full_forms: HashMap<String, String>,
}

impl AbbreviationDictionary {
    /// Harvest abbreviation pairs from one corpus text
    pub fn harvest(&mut self, text: &str) {
        for captures in FULL_THEN_ABBR.captures_iter(text) {
            let abbr = captures[2].trim().to_uppercase();
            // the capture runs back to the clause start; keep only as many
            // trailing words as the acronym has letters
            let full = last_words(captures[1].trim(), abbr.len()).to_lowercase();
            self.insert(abbr, full);
        }
        for captures in ABBR_THEN_FULL.captures_iter(text) {
            let abbr = captures[1].trim().to_uppercase();
            let full = first_words(captures[2].trim(), abbr.len()).to_lowercase();
            self.insert(abbr, full);
        }
        self.harvest_capitalized_sequences(text);
    }

    /// Sequences of capitalized words whose initials occur as an acronym
    /// elsewhere in the same text
    fn harvest_capitalized_sequences(&mut self, text: &str) {
        let upper_text = text.to_uppercase();
        let words: Vec<&str> = text.split_whitespace().collect();

        for window in words.windows(3) {
            if !window.iter().all(|word| starts_capitalized(word)) {
                continue;
            }
            let abbr: String = window
                .iter()
                .filter_map(|word| word.chars().next())
                .collect::<String>()
                .to_uppercase();
            if abbr.len() < 2 {
                continue;
            }
            // the acronym itself must appear in the text as a standalone word
            let standalone = upper_text
                .split(|c: char| !c.is_alphanumeric())
                .any(|token| token == abbr);
            if standalone {
                let full = window
                    .join(" ")
                    .trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase();
                self.insert(abbr, full);
            }
        }
    }

    fn insert(&mut self, abbr: String, full: String) {
        if abbr.is_empty() || full.is_empty() {
            return;
        }
        self.full_forms.insert(full.clone(), abbr.clone());
        self.expansions.insert(abbr, full);
    }

    /// Counterpart forms for every abbreviation or full phrase in `text`
    pub fn expansions_for(&self, text: &str) -> Vec<String> {
        let text_lower = text.to_lowercase();
        let mut terms = Vec::new();

        for (abbr, full) in &self.expansions {
            let abbr_lower = abbr.to_lowercase();
            let standalone = text_lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|token| token == abbr_lower);
            if standalone {
                terms.push(full.clone());
            } else if text_lower.contains(full.as_str()) {
                terms.push(abbr_lower);
            }
        }

        terms.sort();
        terms.dedup();
        terms
    }

    pub fn len(&self) -> usize {
        self.expansions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expansions.is_empty()
    }
}

fn starts_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_uppercase())
}

/// Last `n` whitespace-separated words of `phrase`
fn last_words(phrase: &str, n: usize) -> String {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let start = words.len().saturating_sub(n);
    words[start..].join(" ")
}

/// First `n` whitespace-separated words of `phrase`
fn first_words(phrase: &str, n: usize) -> String {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    words[..n.min(words.len())].join(" ")
}
