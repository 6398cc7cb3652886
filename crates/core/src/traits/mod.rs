//! Traits for pluggable model backends
//!
//! The assistant treats every model as an external collaborator behind a
//! trait: a dense text encoder, an optional pairwise relevance scorer, a
//! generative language model, and a named entity recognizer. Backends are
//! constructor-injected; no module-level singletons.

mod encoder;
mod entities;
mod generator;

pub use encoder::{PairwiseScorer, TextEncoder};
pub use entities::{EntityRecognizer, NoopRecognizer};
pub use generator::TextGenerator;
