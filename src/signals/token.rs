use crate::constants::{
    ANY_MISSING_PENALTY, ANY_TOKEN_POINTS, FORM_CODE_POINTS, OPTIONAL_TOKEN_POINTS,
    REQUIRED_MISSING_PENALTY, REQUIRED_TOKEN_POINTS, clamp_score,
};
use crate::template::SelectionConfig;
use crate::tokenize::{TokenizedDocument, normalize_text};

use super::regex_cache::compiled;
use super::types::{Evidence, SignalResult, SignalType};

/// Scores a document's tokens against one candidate's token rules.
///
/// The raw score is normalized by the best score this config can produce, so
/// templates with many rules are not favoured over terse ones. A missing required
/// token costs a flat penalty large enough that the incidental overlap of a
/// near-miss document cannot reach the HIGH band.
pub fn token_signal(doc: &TokenizedDocument, config: &SelectionConfig) -> SignalResult {
    let mut raw = 0.0_f64;
    let mut max = 0.0_f64;
    let mut matched = Vec::new();
    let mut missing = Vec::new();

    let mut required_missing = false;
    for token in &config.required_tokens_all {
        let key = term_key(token);
        let points = config.weight_for(token, REQUIRED_TOKEN_POINTS);
        max += points;
        if doc.contains_term(&key) {
            raw += points;
            matched.push(key);
        } else {
            required_missing = true;
            missing.push(key);
        }
    }
    if required_missing {
        raw = (raw - REQUIRED_MISSING_PENALTY).max(0.0);
    }

    if !config.required_tokens_any.is_empty() {
        max += ANY_TOKEN_POINTS * config.required_tokens_any.len() as f64;

        let mut any_matched = false;
        for token in &config.required_tokens_any {
            let key = term_key(token);
            if doc.contains_term(&key) {
                raw += ANY_TOKEN_POINTS;
                any_matched = true;
                matched.push(key);
            }
        }

        if !any_matched {
            raw = (raw - ANY_MISSING_PENALTY).max(0.0);
            let alternatives: Vec<String> = config
                .required_tokens_any
                .iter()
                .map(|t| term_key(t))
                .collect();
            missing.push(format!("ANY({})", alternatives.join("|")));
        }
    }

    let mut form_code_matched = None;
    if let Some(pattern) = &config.form_code_regex {
        max += FORM_CODE_POINTS;
        let is_match = form_code_matches(pattern, &doc.normalized);
        if is_match {
            raw += FORM_CODE_POINTS;
        }
        form_code_matched = Some(is_match);
    }

    for token in &config.optional_tokens {
        let key = term_key(token);
        let points = config.weight_for(token, OPTIONAL_TOKEN_POINTS);
        max += points;
        if doc.contains_term(&key) {
            raw += points;
            matched.push(key);
        }
    }

    let score = if max > 0.0 {
        clamp_score(raw / max * 100.0)
    } else {
        0
    };

    let mut evidence = Evidence {
        matched,
        missing,
        ..Default::default()
    }
    .detail("rawScore", raw)
    .detail("maxScore", max);
    if let Some(is_match) = form_code_matched {
        evidence = evidence.detail("formCodeMatched", is_match);
    }

    SignalResult::new(SignalType::Token, score, evidence)
}

/// Config tokens are normalized like document text; one made only of punctuation
/// keeps its lowercased form and never matches.
fn term_key(token: &str) -> String {
    let key = normalize_text(token);
    if key.is_empty() {
        token.trim().to_lowercase()
    } else {
        key
    }
}

/// An unparseable pattern counts as no match; a broken template must only lower its
/// own score, never abort selection for the others.
fn form_code_matches(pattern: &str, normalized: &str) -> bool {
    compiled(pattern, true, "formCodeRegex").is_some_and(|re| re.is_match(normalized))
}
