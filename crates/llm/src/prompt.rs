//! Prompt construction for answer and reasoning generation

use std::fmt::Write as _;

use portal_assist_core::{AnalyzedQuery, EntityKind, Fragment, NamedEntity, RankedArticle};

/// Control tokens some models leak into completions
const CONTROL_TOKENS: [&str; 4] = ["<|end|>", "<|assistant|>", "<|endoftext|>", "<|im_end|>"];

/// Remove model control tokens from generated text
pub fn strip_control_tokens(text: &str) -> String {
    let mut cleaned = text.to_string();
    for token in CONTROL_TOKENS {
        cleaned = cleaned.replace(token, "");
    }
    cleaned.trim().to_string()
}

fn entities_of(entities: &[NamedEntity], kind: EntityKind) -> Vec<&str> {
    entities
        .iter()
        .filter(|entity| entity.kind == kind)
        .map(|entity| entity.text.as_str())
        .collect()
}

fn push_entity_lines(prompt: &mut String, entities: &[NamedEntity]) {
    let organizations = entities_of(entities, EntityKind::Organization);
    let persons = entities_of(entities, EntityKind::Person);
    let locations = entities_of(entities, EntityKind::Location);

    if organizations.is_empty() && persons.is_empty() && locations.is_empty() {
        return;
    }
    prompt.push_str("\nEntities detected in the question:\n");
    if !organizations.is_empty() {
        let _ = writeln!(prompt, "- Organizations: {}", organizations.join(", "));
    }
    if !persons.is_empty() {
        let _ = writeln!(prompt, "- Persons: {}", persons.join(", "));
    }
    if !locations.is_empty() {
        let _ = writeln!(prompt, "- Locations: {}", locations.join(", "));
    }
}

/// Build the grounding prompt for the main answer
pub fn build_answer_prompt(query: &AnalyzedQuery, fragments: &[Fragment]) -> String {
    let classification = &query.classification;

    let mut prompt = format!(
        "A user asked a question about the supplier portal. The question may \
         contain typos or imprecision. Below are passages from our knowledge \
         base. Combine them into a single answer to the user's question, and \
         cite the source article of the information you use.\n\
         User question: {}\n\
         Question type: {}\n\
         User role: {}\n\
         Component: {}\n",
        query.raw_text,
        classification.query_type.label(),
        classification.role.as_deref().unwrap_or("not identified"),
        classification.component.as_deref().unwrap_or("not identified"),
    );

    push_entity_lines(&mut prompt, &query.entities);

    prompt.push_str("\nRelevant passages from the knowledge base:\n");
    for (number, fragment) in fragments.iter().enumerate() {
        let _ = write!(
            prompt,
            "\n--- Passage {} (from article '{}') ---\n{}\n",
            number + 1,
            fragment.title,
            fragment.text
        );

        if !fragment.entities.is_empty() {
            let names: Vec<&str> = fragment
                .entities
                .iter()
                .map(|entity| entity.text.as_str())
                .collect();
            let _ = writeln!(prompt, "Entities in this passage: {}", names.join(", "));
        }
    }

    prompt
}

/// Build the prompt asking the model to explain its answer, first person
pub fn build_reasoning_prompt(
    query: &AnalyzedQuery,
    recommendations: &[RankedArticle],
    fragments: &[Fragment],
) -> String {
    let classification = &query.classification;

    let mut prompt = format!(
        "Explain in the first person how you arrived at the answer to the \
         user's request. Walk through your steps:\n\
         1. Request analysis: briefly describe how you understood the request \
         (type, key topics and entities).\n\
         2. Article search: which knowledge base articles looked most relevant \
         and why. Mention the one to three most important articles.\n\
         3. Passage selection: why you picked these passages to build the \
         answer.\n\n\
         User request: \"{}\"\n\n\
         Your analysis of the request:\n\
         - Type: {}\n\
         - User role: {}\n\
         - Component: {}\n\
         - Key actions: {:?}\n\
         - Problems: {:?}\n",
        query.raw_text,
        classification.query_type.label(),
        classification.role.as_deref().unwrap_or("not identified"),
        classification.component.as_deref().unwrap_or("not identified"),
        classification.actions,
        classification.problems,
    );

    let _ = writeln!(
        prompt,
        "\nRelevant articles found (top {}):",
        recommendations.len()
    );
    for (number, article) in recommendations.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "- Article {}: \"{}\" (relevance {:.3}, type {}, role {}, component {})",
            number + 1,
            article.title,
            article.score,
            article.query_type,
            article.role.as_deref().unwrap_or("-"),
            article.component.as_deref().unwrap_or("-"),
        );
    }

    let _ = writeln!(prompt, "\nSelected passages (top {}):", fragments.len());
    for (number, fragment) in fragments.iter().enumerate() {
        let preview: String = fragment.text.chars().take(150).collect();
        let _ = writeln!(
            prompt,
            "- Passage {} from \"{}\":\n  \"{}...\"\n  (passage relevance {:.3}, entity matches {})",
            number + 1,
            fragment.title,
            preview,
            fragment.relevance,
            fragment.entity_matches,
        );
    }

    prompt.push_str("\nNow describe your reasoning:");
    prompt
}
