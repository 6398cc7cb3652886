//! Query and document classification types
//!
//! Every knowledge article and every incoming query is classified into one
//! of three intent types, plus an optional user role and portal component.
//! The same shape is shared between documents (assigned at indexing time)
//! and queries (assigned per request).

use serde::{Deserialize, Serialize};

/// Intent type for queries and articles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// Something is broken or failing
    Error,
    /// How-to / step-by-step request
    Instruction,
    /// General information request
    #[default]
    Info,
}

impl QueryType {
    /// Label used in prompts and API responses
    pub fn label(&self) -> &'static str {
        match self {
            QueryType::Error => "error",
            QueryType::Instruction => "instruction",
            QueryType::Info => "info",
        }
    }
}

/// Classification assigned to a knowledge article at indexing time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocClassification {
    /// Intent type of the article content
    pub query_type: QueryType,
    /// User role the article targets, if any
    pub role: Option<String>,
    /// Portal component the article covers, if any
    pub component: Option<String>,
    /// Whether the article describes an error condition
    pub is_error: bool,
}

/// Classification of an incoming query
///
/// Superset of [`DocClassification`]: also carries the extracted actions,
/// problem phrases, and the operator-escalation signal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryClassification {
    pub query_type: QueryType,
    pub role: Option<String>,
    pub component: Option<String>,
    /// Action verbs found in the query (register, sign, unblock, ...)
    pub actions: Vec<String>,
    /// Problem phrases found in the query (error, not working, ...)
    pub problems: Vec<String>,
    /// True when the query should be handed to a human operator
    pub needs_operator: bool,
}

impl QueryClassification {
    /// Collapse to the document-side shape for context matching
    pub fn as_doc(&self) -> DocClassification {
        DocClassification {
            query_type: self.query_type,
            role: self.role.clone(),
            component: self.component.clone(),
            is_error: self.query_type == QueryType::Error,
        }
    }
}

/// Kind of a named entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Organization,
    Person,
    Location,
}

/// A named entity found in free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub text: String,
    pub kind: EntityKind,
}

impl NamedEntity {
    pub fn new(text: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// Loose match: same kind and one surface form contains the other
    pub fn fuzzy_matches(&self, other: &NamedEntity) -> bool {
        if self.kind != other.kind {
            return false;
        }
        let a = self.text.to_lowercase();
        let b = other.text.to_lowercase();
        a.contains(&b) || b.contains(&a)
    }
}

/// A reformulation of the user query with a retrieval weight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryVariant {
    /// Preprocessed variant text, ready for tokenization
    pub text: String,
    /// Relative weight, always > 0
    pub weight: f32,
}

impl QueryVariant {
    pub fn new(text: impl Into<String>, weight: f32) -> Self {
        debug_assert!(weight > 0.0);
        Self {
            text: text.into(),
            weight,
        }
    }
}

/// Fully analyzed query, produced once per request
#[derive(Debug, Clone)]
pub struct AnalyzedQuery {
    /// Original user text
    pub raw_text: String,
    /// Normalized, corrected, expanded text
    pub normalized_text: String,
    /// Query classification
    pub classification: QueryClassification,
    /// Named entities found in the query
    pub entities: Vec<NamedEntity>,
    /// Lemmatized keywords (stopwords and single characters removed)
    pub keywords: Vec<String>,
    /// Retrieval variants, base variant first
    pub variants: Vec<QueryVariant>,
}
