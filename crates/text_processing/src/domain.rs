//! Supplier portal domain vocabulary
//!
//! Fixed term sets for the entities the portal deals in: document kinds,
//! user roles, actions, problem phrases and portal components. Queries and
//! articles are matched against these sets for classification and query
//! expansion.

use serde::{Deserialize, Serialize};

/// Category of a domain term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermCategory {
    /// Document kinds handled on the portal
    Documents,
    /// User roles
    Roles,
    /// Actions users perform
    Actions,
    /// Problem phrases
    Problems,
    /// Portal components
    Components,
}

/// Terms found in a text, grouped by category
#[derive(Debug, Clone, Default)]
pub struct DomainMatches {
    pub documents: Vec<String>,
    pub roles: Vec<String>,
    pub actions: Vec<String>,
    pub problems: Vec<String>,
    pub components: Vec<String>,
}

impl DomainMatches {
    /// All matched terms across categories
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.documents
            .iter()
            .chain(self.roles.iter())
            .chain(self.actions.iter())
            .chain(self.problems.iter())
            .chain(self.components.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.all().next().is_none()
    }
}

/// Fixed domain vocabulary of the supplier portal
#[derive(Debug, Clone)]
pub struct DomainVocabulary {
    documents: Vec<&'static str>,
    roles: Vec<&'static str>,
    actions: Vec<&'static str>,
    problems: Vec<&'static str>,
    components: Vec<&'static str>,
}

impl Default for DomainVocabulary {
    fn default() -> Self {
        Self {
            documents: vec![
                "transfer document",
                "invoice",
                "delivery note",
                "receipt",
                "act of acceptance",
                "contract",
                "agreement",
                "offer",
                "purchase order",
                "request",
                "price list",
            ],
            roles: vec![
                "customer",
                "supplier",
                "contractor",
                "procurer",
                "buyer",
                "seller",
                "recipient",
                "sender",
            ],
            actions: vec![
                "unblock",
                "block",
                "register",
                "sign",
                "send",
                "receive",
                "create",
                "delete",
                "update",
                "upload",
                "reject",
                "approve",
                "submit",
            ],
            problems: vec![
                "error",
                "problem",
                "not working",
                "cannot",
                "unable",
                "missing",
                "unavailable",
                "refused",
                "failure",
                "malfunction",
            ],
            components: vec![
                "portal",
                "website",
                "system",
                "personal account",
                "registry",
                "catalog",
                "profile",
            ],
        }
    }
}

impl DomainVocabulary {
    /// Find every domain term contained in `text` (case-insensitive)
    pub fn extract(&self, text: &str) -> DomainMatches {
        let text = text.to_lowercase();

        DomainMatches {
            documents: matching_terms(&self.documents, &text),
            roles: matching_terms(&self.roles, &text),
            actions: matching_terms(&self.actions, &text),
            problems: matching_terms(&self.problems, &text),
            components: matching_terms(&self.components, &text),
        }
    }

    /// Every term in the vocabulary with its category
    pub fn all_terms(&self) -> impl Iterator<Item = (&'static str, TermCategory)> + '_ {
        self.documents
            .iter()
            .map(|t| (*t, TermCategory::Documents))
            .chain(self.roles.iter().map(|t| (*t, TermCategory::Roles)))
            .chain(self.actions.iter().map(|t| (*t, TermCategory::Actions)))
            .chain(self.problems.iter().map(|t| (*t, TermCategory::Problems)))
            .chain(self.components.iter().map(|t| (*t, TermCategory::Components)))
    }

    /// Terms related to `term`: multi-word vocabulary terms containing it
    pub fn related_terms(&self, term: &str) -> Vec<String> {
        self.all_terms()
            .filter(|(candidate, _)| *candidate != term && candidate.contains(term))
            .map(|(candidate, _)| candidate.to_string())
            .collect()
    }
}

fn matching_terms(terms: &[&'static str], text: &str) -> Vec<String> {
    terms
        .iter()
        .filter(|term| term_in_text(text, term))
        .map(|term| term.to_string())
        .collect()
}

/// Word-boundary containment check for single- and multi-word terms
fn term_in_text(text: &str, term: &str) -> bool {
    if !text.contains(term) {
        return false;
    }
    // reject substring hits inside longer words ("act" in "contract")
    for (pos, _) in text.match_indices(term) {
        let before_ok = pos == 0
            || !text[..pos]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric());
        let after = pos + term.len();
        let after_ok = after >= text.len()
            || !text[after..].chars().next().is_some_and(|c| c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_terms_by_category() {
        let vocab = DomainVocabulary::default();
        let matches = vocab.extract("The supplier cannot sign the contract in the personal account");

        assert_eq!(matches.roles, vec!["supplier"]);
        assert!(matches.actions.contains(&"sign".to_string()));
        assert!(matches.documents.contains(&"contract".to_string()));
        assert!(matches.components.contains(&"personal account".to_string()));
        assert!(matches.problems.contains(&"cannot".to_string()));
    }

    #[test]
    fn test_no_substring_false_positives() {
        let vocab = DomainVocabulary::default();
        // "act" is part of "contractor" but "act of acceptance" should not fire
        let matches = vocab.extract("the contractor signed");
        assert!(matches.documents.is_empty());
        assert_eq!(matches.roles, vec!["contractor"]);
    }

    #[test]
    fn test_related_terms() {
        let vocab = DomainVocabulary::default();
        let related = vocab.related_terms("account");
        assert!(related.contains(&"personal account".to_string()));
    }
}
