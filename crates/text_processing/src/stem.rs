//! Light suffix-stripping lemmatizer
//!
//! Reduces inflected English forms to a shared stem so that query keywords
//! and article text compare equal ("updated", "updating", "update" all map
//! to "updat"). Consistency across forms matters here, not dictionary
//! citation forms. Tokens with non-alphabetic characters pass through
//! unchanged.

/// Reduce a single word to its stem
pub fn lemma(word: &str) -> String {
    let lower = word.to_lowercase();
    if !lower.chars().all(|c| c.is_ascii_alphabetic()) {
        // mixed tokens (numbers, hyphens, non-latin) pass through
        return lower;
    }

    let mut stem = lower;

    // plural endings
    if stem.len() >= 5 && stem.ends_with("ies") {
        stem.truncate(stem.len() - 3);
        stem.push('i');
    } else if stem.len() >= 5 && stem.ends_with("sses") {
        stem.truncate(stem.len() - 2);
    } else if stem.len() >= 4
        && stem.ends_with('s')
        && !stem.ends_with("ss")
        && !stem.ends_with("us")
        && !stem.ends_with("is")
    {
        stem.truncate(stem.len() - 1);
    }

    // verbal endings
    if stem.len() >= 6 && stem.ends_with("ing") {
        stem.truncate(stem.len() - 3);
    } else if stem.len() >= 5 && stem.ends_with("ed") {
        stem.truncate(stem.len() - 2);
    }

    // final -e so "update"/"updated" agree
    if stem.len() >= 5 && stem.ends_with('e') {
        stem.truncate(stem.len() - 1);
    }

    // -y/-i so "copy"/"copies" agree
    if stem.len() >= 3 && stem.ends_with('y') {
        stem.truncate(stem.len() - 1);
        stem.push('i');
    }

    stem
}

/// Stem every word of a phrase, preserving word order
pub fn lemma_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(lemma)
        .collect::<Vec<_>>()
        .join(" ")
}
