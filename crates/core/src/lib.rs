//! Core traits and types for the supplier portal assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Knowledge article and corpus record types
//! - Query/document classification (closed intent enum, role, component)
//! - Fragment and answer types
//! - Traits for pluggable model backends (encoder, scorer, generator, NER)
//! - Error types

pub mod answer;
pub mod article;
pub mod classification;
pub mod error;
pub mod traits;

pub use answer::{collect_sources, AnswerResult, Fragment, Source};
pub use article::{Article, ArticleRecord, RankedArticle, ScoreBreakdown};
pub use classification::{
    AnalyzedQuery, DocClassification, EntityKind, NamedEntity, QueryClassification, QueryType,
    QueryVariant,
};
pub use error::{Error, Result};
pub use traits::{EntityRecognizer, NoopRecognizer, PairwiseScorer, TextEncoder, TextGenerator};
