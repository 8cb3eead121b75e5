//! Compiled template regexes, shared across candidates and calls.
//!
//! Form-code and field patterns come from immutable template versions, so each
//! distinct pattern is compiled once and reused until evicted. Invalid patterns
//! are cached as `None` and logged only when first seen.

use std::sync::LazyLock;

use moka::sync::Cache;
use regex::{Regex, RegexBuilder};
use tracing::warn;

const CAPACITY: u64 = 4_096;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PatternKey {
    pattern: String,
    case_insensitive: bool,
}

static COMPILED: LazyLock<Cache<PatternKey, Option<Regex>>> =
    LazyLock::new(|| Cache::builder().max_capacity(CAPACITY).build());

/// Returns the compiled `pattern`, or `None` when it does not parse.
///
/// `source` names the template field the pattern came from, for the log line.
pub fn compiled(pattern: &str, case_insensitive: bool, source: &str) -> Option<Regex> {
    let key = PatternKey {
        pattern: pattern.to_string(),
        case_insensitive,
    };
    COMPILED.get_with(key, || {
        match RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()
        {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(source = %source, pattern = %pattern, error = %e, "Ignoring invalid regex");
                None
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiled_reuses_pattern() {
        let first = compiled(r"JS-\d{4}", true, "formCodeRegex");
        let second = compiled(r"JS-\d{4}", true, "formCodeRegex");

        assert!(first.as_ref().is_some_and(|re| re.is_match("js-2041")));
        assert_eq!(
            first.map(|re| re.as_str().to_string()),
            second.map(|re| re.as_str().to_string())
        );
    }

    #[test]
    fn test_case_sensitivity_is_part_of_the_key() {
        let insensitive = compiled(r"INV-\d+", true, "formCodeRegex");
        let sensitive = compiled(r"INV-\d+", false, "jobReference");

        assert!(insensitive.is_some_and(|re| re.is_match("inv-42")));
        assert!(sensitive.is_some_and(|re| !re.is_match("inv-42")));
    }

    #[test]
    fn test_invalid_pattern_is_none() {
        assert!(compiled("([", false, "broken").is_none());
        assert!(compiled("([", false, "broken").is_none());
    }
}
