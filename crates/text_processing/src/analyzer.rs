//! Query analysis
//!
//! Turns a raw user query into an [`AnalyzedQuery`]: normalized and
//! spelling-corrected text, intent classification with the operator
//! escalation signal, named entities, lemmatized keywords, and the weighted
//! retrieval variants. Analysis is best-effort and never fails: malformed
//! tokens pass through unmodified and classification falls back to
//! `info` with no role or component.

use once_cell::sync::Lazy;
use std::sync::Arc;

use portal_assist_config::BoostConfig;
use portal_assist_core::{
    AnalyzedQuery, EntityRecognizer, NamedEntity, QueryClassification, QueryType, QueryVariant,
};

use crate::abbreviations::AbbreviationDictionary;
use crate::domain::DomainVocabulary;
use crate::normalize::{normalize_text, tokenize, word_count};
use crate::spelling::{SpellingConfig, SpellingCorrector};
use crate::stem::lemma;
use crate::stopwords::is_stopword;
use crate::vocabulary::Vocabulary;

/// Phrases marking an error report
static ERROR_TERMS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "error", "problem", "not working", "fails", "failure", "cannot", "unable", "broken",
    ]
});

/// Phrases marking a how-to request
static INSTRUCTION_TERMS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec!["how", "instruction", "guide", "explain", "step by step", "in detail"]
});

/// Phrases asking for a human operator
static OPERATOR_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "operator",
        "specialist",
        "support",
        "help me",
        "urgent",
        "critical",
        "connect me",
        "real person",
        "live person",
        "transfer me",
        "human",
    ]
});

/// Issues severe enough to escalate when combined with an error query
static CRITICAL_ISSUES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "blocked",
        "blocking",
        "hacked",
        "breach",
        "leak",
        "unavailable",
        "data loss",
        "money",
        "payment",
        "invoice",
        "finance",
        "contract terminated",
        "threat",
        "fine",
        "penalty",
        "sanctions",
        "missed deadline",
        "lawyer",
    ]
});

/// Error queries longer than this many words are escalated
const COMPLEX_QUERY_WORDS: usize = 20;

/// Query analyzer over the corpus-derived vocabulary
pub struct QueryAnalyzer {
    vocabulary: Vocabulary,
    abbreviations: AbbreviationDictionary,
    domain: DomainVocabulary,
    corrector: SpellingCorrector,
    recognizer: Arc<dyn EntityRecognizer>,
    boost: BoostConfig,
}

impl QueryAnalyzer {
    /// Build an analyzer from trained vocabulary artifacts
    pub fn new(
        vocabulary: Vocabulary,
        abbreviations: AbbreviationDictionary,
        recognizer: Arc<dyn EntityRecognizer>,
        boost: BoostConfig,
    ) -> Self {
        let domain = DomainVocabulary::default();
        let mut vocabulary = vocabulary;
        vocabulary.add_phrases(domain.all_terms().map(|(term, _)| term));

        Self {
            vocabulary,
            abbreviations,
            domain,
            corrector: SpellingCorrector::new(SpellingConfig::default()),
            recognizer,
            boost,
        }
    }

    /// Analyzer without trained artifacts; correction and expansion are
    /// no-ops until the index is trained
    pub fn untrained(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self::new(
            Vocabulary::default(),
            AbbreviationDictionary::default(),
            recognizer,
            BoostConfig::default(),
        )
    }

    /// Full analysis of a raw query
    pub fn analyze(&self, raw_text: &str) -> AnalyzedQuery {
        let entities = self.recognizer.extract(raw_text);
        let classification = self.classify(raw_text, &entities);
        let normalized_text = self.preprocess(raw_text);
        let keywords = self.keywords(raw_text);
        let variants = self.variants(raw_text, &classification, &normalized_text);

        tracing::debug!(
            query_type = classification.query_type.label(),
            role = ?classification.role,
            component = ?classification.component,
            needs_operator = classification.needs_operator,
            variants = variants.len(),
            "query analyzed"
        );

        AnalyzedQuery {
            raw_text: raw_text.to_string(),
            normalized_text,
            classification,
            entities,
            keywords,
            variants,
        }
    }

    /// Classify a query or article text
    pub fn classify(&self, text: &str, entities: &[NamedEntity]) -> QueryClassification {
        let text_lower = text.to_lowercase();
        let matches = self.domain.extract(&text_lower);

        let query_type = if ERROR_TERMS.iter().any(|term| text_lower.contains(term)) {
            QueryType::Error
        } else if INSTRUCTION_TERMS.iter().any(|term| text_lower.contains(term)) {
            QueryType::Instruction
        } else {
            QueryType::Info
        };

        let role = matches.roles.first().cloned();
        // document kinds take precedence over generic components
        let component = matches
            .documents
            .first()
            .cloned()
            .or_else(|| matches.components.first().cloned());

        let mut needs_operator = OPERATOR_KEYWORDS
            .iter()
            .any(|keyword| text_lower.contains(keyword));

        if query_type == QueryType::Error {
            if CRITICAL_ISSUES.iter().any(|issue| text_lower.contains(issue)) {
                needs_operator = true;
            }
            if word_count(text) > COMPLEX_QUERY_WORDS {
                needs_operator = true;
            }
            if !entities.is_empty() {
                needs_operator = true;
            }
        }

        QueryClassification {
            query_type,
            role,
            component,
            actions: matches.actions,
            problems: matches.problems,
            needs_operator,
        }
    }

    /// Full preprocessing: normalization, spelling correction, stopword
    /// removal, lemmatization, plus phrase/entity/abbreviation markers
    pub fn preprocess(&self, text: &str) -> String {
        let domain_found = self.domain.extract(text);
        let mut expanded = self.abbreviations.expansions_for(text);
        for term in domain_found.all() {
            for related in self.domain.related_terms(term) {
                if !expanded.contains(&related) {
                    expanded.push(related);
                }
            }
        }

        let tokens: Vec<String> = tokenize(&normalize_text(text))
            .into_iter()
            .filter(|token| token.chars().all(|c| c.is_alphabetic()))
            .map(|token| self.corrector.correct(&token, &self.vocabulary))
            .collect();

        let ngrams = self.vocabulary.known_ngrams(&tokens);

        let mut parts: Vec<String> = tokens
            .iter()
            .filter(|token| !is_stopword(token))
            .map(|token| lemma(token))
            .collect();

        parts.extend(ngrams.iter().map(|gram| gram.replace(' ', "_")));
        parts.extend(domain_found.all().map(|term| term.replace(' ', "_")));
        parts.extend(expanded.iter().map(|term| term.replace(' ', "_")));

        parts.join(" ")
    }

    /// Simplified tokenization for lexical scoring: normalized, corrected,
    /// stopword-free, lemmatized tokens
    pub fn lexical_tokens(&self, text: &str) -> Vec<String> {
        tokenize(&normalize_text(text))
            .into_iter()
            .map(|token| {
                if token.chars().all(|c| c.is_alphabetic()) {
                    self.corrector.correct(&token, &self.vocabulary)
                } else {
                    token
                }
            })
            .filter(|token| token.len() > 1 && !is_stopword(token))
            .map(|token| lemma(&token))
            .collect()
    }

    /// Lemmatized query keywords for title boosting
    pub fn keywords(&self, text: &str) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();
        for token in tokenize(&normalize_text(text)) {
            if token.len() <= 1 || is_stopword(&token) {
                continue;
            }
            let stem = lemma(&token);
            if !keywords.contains(&stem) {
                keywords.push(stem);
            }
        }
        keywords
    }

    /// Generate the weighted retrieval variants
    ///
    /// Base variant first, weight 1.0; the rest follow the fixed recipe:
    /// first clause, role-augmented, component-augmented, error-prefixed,
    /// one per detected action.
    pub fn variants(
        &self,
        raw_text: &str,
        classification: &QueryClassification,
        base_preprocessed: &str,
    ) -> Vec<QueryVariant> {
        let mut variants = vec![QueryVariant::new(base_preprocessed.to_string(), 1.0)];

        // first clause before punctuation
        let parts: Vec<&str> = raw_text
            .split([',', '.', ';', ':', '!', '?'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.len() > 1 {
            variants.push(QueryVariant::new(
                self.preprocess(parts[0]),
                self.boost.clause_variant_weight,
            ));
        }

        if let Some(role) = &classification.role {
            variants.push(QueryVariant::new(
                self.preprocess(&format!("{} {}", raw_text, role)),
                self.boost.role_variant_weight,
            ));
        }

        if let Some(component) = &classification.component {
            variants.push(QueryVariant::new(
                self.preprocess(&format!("{} {}", raw_text, component)),
                self.boost.component_variant_weight,
            ));
        }

        if classification.query_type == QueryType::Error {
            let text_lower = raw_text.to_lowercase();
            let explicit = ["error", "problem", "not working"]
                .iter()
                .any(|term| text_lower.contains(term));
            if !explicit {
                variants.push(QueryVariant::new(
                    self.preprocess(&format!("error {}", raw_text)),
                    self.boost.error_variant_weight,
                ));
            }
        }

        for action in &classification.actions {
            let component = classification.component.as_deref().unwrap_or("");
            variants.push(QueryVariant::new(
                self.preprocess(&format!("{} {}", action, component)),
                self.boost.action_variant_weight,
            ));
        }

        variants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RuleBasedRecognizer;

    fn analyzer() -> QueryAnalyzer {
        let vocabulary = Vocabulary::build(
            [
                "price list update instructions for suppliers",
                "how to update the price list in the catalog",
                "supplier registration on the portal",
            ]
            .into_iter(),
        );
        QueryAnalyzer::new(
            vocabulary,
            AbbreviationDictionary::default(),
            Arc::new(RuleBasedRecognizer::new()),
            BoostConfig::default(),
        )
    }

    #[test]
    fn test_error_classification() {
        let analyzer = analyzer();
        let classification = analyzer.classify("error when signing the contract", &[]);
        assert_eq!(classification.query_type, QueryType::Error);
    }

    #[test]
    fn test_instruction_classification() {
        let analyzer = analyzer();
        let classification = analyzer.classify("how to update the price list", &[]);
        assert_eq!(classification.query_type, QueryType::Instruction);
        assert_eq!(classification.component.as_deref(), Some("price list"));
    }

    #[test]
    fn test_info_fallback() {
        let analyzer = analyzer();
        let classification = analyzer.classify("catalog contents", &[]);
        assert_eq!(classification.query_type, QueryType::Info);
        assert!(classification.role.is_none());
    }

    #[test]
    fn test_needs_operator_on_critical_error() {
        let analyzer = analyzer();
        let classification = analyzer.classify("payment error in the personal account", &[]);
        assert_eq!(classification.query_type, QueryType::Error);
        assert!(classification.needs_operator);
    }

    #[test]
    fn test_needs_operator_on_operator_keyword() {
        let analyzer = analyzer();
        let classification = analyzer.classify("connect me to an operator", &[]);
        assert!(classification.needs_operator);
    }

    #[test]
    fn test_plain_query_does_not_escalate() {
        let analyzer = analyzer();
        let classification = analyzer.classify("how to update the price list", &[]);
        assert!(!classification.needs_operator);
    }

    #[test]
    fn test_variants_base_first() {
        let analyzer = analyzer();
        let query = analyzer.analyze("how to update the price list");
        assert!(!query.variants.is_empty());
        assert!((query.variants[0].weight - 1.0).abs() < f32::EPSILON);
        // component variant present for "price list"
        assert!(query
            .variants
            .iter()
            .any(|v| (v.weight - 1.1).abs() < f32::EPSILON));
    }

    #[test]
    fn test_role_variant_weight() {
        let analyzer = analyzer();
        let query = analyzer.analyze("supplier cannot sign the contract");
        assert!(query
            .variants
            .iter()
            .any(|v| (v.weight - 1.2).abs() < f32::EPSILON));
    }

    #[test]
    fn test_error_prefixed_variant_for_implicit_errors() {
        let analyzer = analyzer();
        // "unable" classifies as error but is not an explicit error term
        let classification = analyzer.classify("unable to open the catalog", &[]);
        assert_eq!(classification.query_type, QueryType::Error);

        let variants =
            analyzer.variants("unable to open the catalog", &classification, "base");
        assert!(variants
            .iter()
            .any(|v| (v.weight - 0.9).abs() < f32::EPSILON));
    }

    #[test]
    fn test_spelling_corrected_in_tokens() {
        let analyzer = analyzer();
        let tokens = analyzer.lexical_tokens("upadte the prise list");
        assert!(tokens.contains(&lemma("update")));
        assert!(tokens.contains(&lemma("price")));
    }

    #[test]
    fn test_analyze_never_fails_on_garbage() {
        let analyzer = analyzer();
        let query = analyzer.analyze("!!! ???");
        assert_eq!(query.classification.query_type, QueryType::Info);
        assert!(query.classification.role.is_none());
        assert_eq!(query.variants.len(), 1);
    }
}
