//! Rule-based named entity recognition
//!
//! Default [`EntityRecognizer`] implementation: finds capitalized word
//! sequences and classifies them with surface cues (honorifics, legal-form
//! suffixes, location markers). A model-backed recognizer can be injected
//! in its place; this one keeps the pipeline dependency-free and
//! deterministic.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use portal_assist_core::{EntityKind, EntityRecognizer, NamedEntity};

static HONORIFICS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["mr", "mrs", "ms", "dr", "prof"].into_iter().collect()
});

static ORG_SUFFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "llc", "ltd", "inc", "corp", "gmbh", "plc", "jsc", "group", "bank", "company", "holdings",
    ]
    .into_iter()
    .collect()
});

static LOCATION_MARKERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "city", "street", "avenue", "district", "region", "square", "oblast",
    ]
    .into_iter()
    .collect()
});

/// Rule-based recognizer for organizations, persons and locations
#[derive(Debug, Default)]
pub struct RuleBasedRecognizer;

impl RuleBasedRecognizer {
    pub fn new() -> Self {
        Self
    }

    /// Group consecutive capitalized words into candidate spans
    fn candidate_spans(text: &str) -> Vec<(Vec<String>, bool)> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut spans = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut sentence_start = true;
        let mut span_at_start = false;

        for word in words {
            let cleaned: String = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_string();
            let capitalized = cleaned.chars().next().is_some_and(|c| c.is_uppercase());

            if capitalized && !cleaned.is_empty() {
                if current.is_empty() {
                    span_at_start = sentence_start;
                }
                current.push(cleaned.clone());
            } else if !current.is_empty() {
                spans.push((std::mem::take(&mut current), span_at_start));
            }

            sentence_start = word.ends_with(['.', '!', '?']);
        }
        if !current.is_empty() {
            spans.push((current, span_at_start));
        }
        spans
    }

    fn classify_span(words: &[String], at_sentence_start: bool) -> Option<NamedEntity> {
        if words.is_empty() {
            return None;
        }

        let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();

        // honorific introduces a person
        if HONORIFICS.contains(lowered[0].as_str()) && words.len() > 1 {
            return Some(NamedEntity::new(words[1..].join(" "), EntityKind::Person));
        }

        // legal-form suffix or prefix marks an organization
        if lowered
            .iter()
            .any(|word| ORG_SUFFIXES.contains(word.as_str()))
        {
            return Some(NamedEntity::new(words.join(" "), EntityKind::Organization));
        }

        // location markers
        if lowered
            .iter()
            .any(|word| LOCATION_MARKERS.contains(word.as_str()))
        {
            return Some(NamedEntity::new(words.join(" "), EntityKind::Location));
        }

        // all-caps tokens of 2+ letters read as organization acronyms
        if words.len() == 1
            && words[0].len() >= 2
            && words[0].chars().all(|c| c.is_uppercase())
        {
            return Some(NamedEntity::new(words[0].clone(), EntityKind::Organization));
        }

        // a lone capitalized word at sentence start is ordinary prose
        if words.len() == 1 && at_sentence_start {
            return None;
        }

        // remaining multi-word capitalized spans default to organizations
        if words.len() > 1 {
            return Some(NamedEntity::new(words.join(" "), EntityKind::Organization));
        }

        None
    }
}

impl EntityRecognizer for RuleBasedRecognizer {
    fn extract(&self, text: &str) -> Vec<NamedEntity> {
        let mut entities: Vec<NamedEntity> = Vec::new();
        for (span, at_start) in Self::candidate_spans(text) {
            if let Some(entity) = Self::classify_span(&span, at_start) {
                if !entities.contains(&entity) {
                    entities.push(entity);
                }
            }
        }
        entities
    }

    fn name(&self) -> &str {
        "rule-based"
    }
}
