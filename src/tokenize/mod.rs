//! Text normalization shared by every signal.
//!
//! Tokens are lower-cased runs of word characters (alphanumerics and `_`). Every other
//! non-whitespace character acts as a separator, so `"JOB-123456"` yields `job` and
//! `123456`.

use std::collections::BTreeSet;

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Splits `text` into ordered, lower-cased tokens.
///
/// Order is preserved for positional heuristics; duplicates are kept.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_word_char(c) || c.is_whitespace() { c } else { ' ' })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Distinct tokens of `text`, for membership tests.
pub fn token_set(text: &str) -> BTreeSet<String> {
    tokenize(text).into_iter().collect()
}

/// Tokens joined by single spaces.
///
/// This is the canonical form used for input hashing, form-code matching and
/// phrase lookups.
pub fn normalize_text(text: &str) -> String {
    tokenize(text).join(" ")
}

/// A document tokenized once per selection and shared by every candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedDocument {
    pub tokens: Vec<String>,
    pub set: BTreeSet<String>,
    pub normalized: String,
}

impl TokenizedDocument {
    pub fn new(text: &str) -> Self {
        let tokens = tokenize(text);
        let set = tokens.iter().cloned().collect();
        let normalized = tokens.join(" ");
        Self {
            tokens,
            set,
            normalized,
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.set.contains(token)
    }

    /// Membership test for a normalized term. Multi-word terms (a config token
    /// such as `"job-sheet"` normalizes to `"job sheet"`) match as a phrase.
    pub fn contains_term(&self, term: &str) -> bool {
        if term.contains(' ') {
            contains_phrase(&self.normalized, term)
        } else {
            self.contains(term)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Returns `true` if `phrase` occurs in `normalized` on token boundaries.
///
/// Both sides are compared in normalized form, so `"Sign here:"` matches the phrase
/// `"sign here"` but `"update"` does not match `"date"`.
pub fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    let phrase = normalize_text(phrase);
    if phrase.is_empty() || normalized.is_empty() {
        return false;
    }
    let haystack = format!(" {normalized} ");
    haystack.contains(&format!(" {phrase} "))
}
