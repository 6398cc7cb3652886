//! Query analysis for the supplier portal assistant
//!
//! This crate turns raw user queries into structured analyses:
//! - **Normalization**: case folding, punctuation stripping, tokenization
//! - **Spelling correction**: bounded edit distance against the corpus
//!   vocabulary
//! - **Abbreviations**: corpus-discovered acronym/full-form pairs
//! - **Classification**: intent type, user role, portal component, operator
//!   escalation signal
//! - **Query variants**: weighted reformulations for retrieval recall
//!
//! Analysis is infallible by contract: malformed input degrades to a
//! best-effort result, it never raises.
//!
//! # Example
//!
//! ```ignore
//! use portal_assist_text_processing::{QueryAnalyzer, RuleBasedRecognizer};
//!
//! let analyzer = QueryAnalyzer::untrained(Arc::new(RuleBasedRecognizer::new()));
//! let query = analyzer.analyze("how to update the price list");
//! assert_eq!(query.classification.query_type.label(), "instruction");
//! ```

pub mod abbreviations;
pub mod analyzer;
pub mod domain;
pub mod entities;
pub mod normalize;
pub mod spelling;
pub mod stem;
pub mod stopwords;
pub mod vocabulary;

pub use abbreviations::AbbreviationDictionary;
pub use analyzer::QueryAnalyzer;
pub use domain::{DomainMatches, DomainVocabulary, TermCategory};
pub use entities::RuleBasedRecognizer;
pub use normalize::{normalize_text, split_sentences, tokenize, word_count};
pub use spelling::{SpellingConfig, SpellingCorrector};
pub use stem::{lemma, lemma_phrase};
pub use stopwords::is_stopword;
pub use vocabulary::Vocabulary;
