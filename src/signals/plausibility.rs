use std::sync::LazyLock;

use regex::Regex;

use crate::constants::clamp_score;
use crate::template::{FieldExpectation, FieldType};
use crate::tokenize::{contains_phrase, normalize_text};

use super::patterns::field_variants;
use super::regex_cache::compiled;
use super::types::{Evidence, SignalResult, SignalType};

/// `DD/MM/YYYY` with `/`, `-` or `.` separators and a 2- or 4-digit year.
static DATE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}[/.\-]\d{1,2}[/.\-](?:\d{4}|\d{2})\b").ok());

/// Checks whether the text plausibly contains each critical field the template
/// declares.
pub fn plausibility_signal(document_text: &str, fields: &[FieldExpectation]) -> SignalResult {
    if fields.is_empty() {
        return SignalResult::neutral(SignalType::Plausibility);
    }

    let normalized = normalize_text(document_text);
    let mut evidence = Evidence::default();
    let mut plausible = 0usize;

    for expectation in fields {
        let found = match expectation.field_type {
            FieldType::Date => DATE_PATTERN
                .as_ref()
                .is_some_and(|re| re.is_match(document_text)),
            FieldType::Pattern | FieldType::Regex => expectation
                .pattern
                .as_deref()
                .is_some_and(|pattern| pattern_matches(&expectation.field, pattern, document_text)),
            FieldType::String | FieldType::Required | FieldType::Other => {
                field_variants(&expectation.field)
                    .iter()
                    .any(|variant| contains_phrase(&normalized, variant))
            }
        };

        if found {
            plausible += 1;
            evidence.matched.push(expectation.field.clone());
        } else {
            evidence.missing.push(expectation.field.clone());
        }
    }

    let score = clamp_score(100.0 * plausible as f64 / fields.len() as f64);
    evidence = evidence
        .detail("plausibleFields", plausible)
        .detail("totalFields", fields.len());

    SignalResult::new(SignalType::Plausibility, score, evidence)
}

fn pattern_matches(field: &str, pattern: &str, text: &str) -> bool {
    compiled(pattern, false, field).is_some_and(|re| re.is_match(text))
}
