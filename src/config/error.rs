//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Integer variable could not be parsed.
    #[error("failed to parse {var}='{value}': {source}")]
    InvalidInteger {
        var: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Weight variable could not be parsed.
    #[error("failed to parse {var}='{value}': {source}")]
    InvalidFloat {
        var: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Effective-at timestamp is not RFC 3339.
    #[error("failed to parse {var}='{value}': {source}")]
    InvalidTimestamp {
        var: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("unknown scoring mode '{value}': expected 'legacy' or 'multi_signal'")]
    UnknownScoringMode { value: String },

    #[error("unknown low-confidence action '{value}': expected 'review' or 'hard_stop'")]
    UnknownLowConfidenceAction { value: String },

    /// A threshold or gap lies outside 0..=100 (or is 0 where that makes no sense).
    #[error("invalid {name} {value}: must be between 1 and 100")]
    InvalidThreshold { name: &'static str, value: u32 },

    #[error("medium threshold {medium} must be below high threshold {high}")]
    ThresholdOrder { high: u32, medium: u32 },

    /// Weight is negative, above 1 or not finite.
    #[error("invalid {signal} weight {value}: must be within 0.0..=1.0")]
    InvalidWeight { signal: &'static str, value: f64 },

    #[error("signal weights sum to zero")]
    ZeroTotalWeight,

    /// Weight values differ from the default set but kept its version label.
    ///
    /// Every recorded score carries the weights version, so reusing a label for
    /// different values would make historical traces ambiguous.
    #[error("signal weights changed but version is still '{version}': set SELECTOR_WEIGHTS_VERSION")]
    WeightsVersionNotBumped { version: String },
}
