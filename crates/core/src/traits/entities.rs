//! Named entity recognizer interface

use crate::classification::NamedEntity;

/// Named entity recognizer
///
/// Pluggable collaborator for extracting organizations, persons and
/// locations from queries and passages. The default implementation is a
/// rule-based recognizer; a model-backed one can be injected instead.
///
/// Extraction is infallible by contract: recognizers return an empty list
/// rather than an error for text they cannot handle.
pub trait EntityRecognizer: Send + Sync {
    /// Extract named entities from free text
    fn extract(&self, text: &str) -> Vec<NamedEntity>;

    /// Recognizer name for logging
    fn name(&self) -> &str;
}

/// Recognizer that never finds anything; used when extraction is disabled
pub struct NoopRecognizer;

impl EntityRecognizer for NoopRecognizer {
    fn extract(&self, _text: &str) -> Vec<NamedEntity> {
        Vec::new()
    }

    fn name(&self) -> &str {
        "noop"
    }
}
