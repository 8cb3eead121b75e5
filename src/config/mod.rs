//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SELECTOR_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;

use chrono::{DateTime, Utc};

use crate::constants::{DEFAULT_AMBIGUITY_GAP, MAX_SCORE, SIGNAL_WEIGHTS_VERSION};
use crate::decision::{DecisionPolicy, LowConfidenceAction, Thresholds};
use crate::ranking::{CandidateRanker, ScoringMode};
use crate::signals::{VersionedWeights, WeightOverrides};

/// Engine configuration loaded from environment variables.
///
/// Use [`SelectorConfig::from_env`] to read `SELECTOR_*` overrides on top of
/// defaults, then [`SelectorConfig::validate`] before handing it to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorConfig {
    /// Band lower bounds. Default: HIGH `80`, MEDIUM `50`.
    pub thresholds: Thresholds,

    /// Minimum lead a MEDIUM candidate needs over the runner-up. Default: `10`.
    pub ambiguity_gap: u32,

    /// Default: [`ScoringMode::Legacy`].
    pub scoring_mode: ScoringMode,

    /// Routing for LOW top candidates. Default: review queue.
    pub low_confidence_action: LowConfidenceAction,

    /// Versioned signal weights used in multi-signal mode.
    pub weights: VersionedWeights,

    /// Per-deployment weight overrides. Never read from the environment.
    pub weight_overrides: Option<WeightOverrides>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            ambiguity_gap: DEFAULT_AMBIGUITY_GAP,
            scoring_mode: ScoringMode::default(),
            low_confidence_action: LowConfidenceAction::default(),
            weights: VersionedWeights::default(),
            weight_overrides: None,
        }
    }
}

impl SelectorConfig {
    pub const ENV_HIGH_THRESHOLD: &'static str = "SELECTOR_HIGH_THRESHOLD";
    pub const ENV_MEDIUM_THRESHOLD: &'static str = "SELECTOR_MEDIUM_THRESHOLD";
    pub const ENV_AMBIGUITY_GAP: &'static str = "SELECTOR_AMBIGUITY_GAP";
    pub const ENV_SCORING_MODE: &'static str = "SELECTOR_SCORING_MODE";
    pub const ENV_LOW_CONFIDENCE_ACTION: &'static str = "SELECTOR_LOW_CONFIDENCE_ACTION";
    pub const ENV_TOKEN_WEIGHT: &'static str = "SELECTOR_TOKEN_WEIGHT";
    pub const ENV_LAYOUT_WEIGHT: &'static str = "SELECTOR_LAYOUT_WEIGHT";
    pub const ENV_ROI_WEIGHT: &'static str = "SELECTOR_ROI_WEIGHT";
    pub const ENV_PLAUSIBILITY_WEIGHT: &'static str = "SELECTOR_PLAUSIBILITY_WEIGHT";
    pub const ENV_WEIGHTS_VERSION: &'static str = "SELECTOR_WEIGHTS_VERSION";
    pub const ENV_WEIGHTS_EFFECTIVE_AT: &'static str = "SELECTOR_WEIGHTS_EFFECTIVE_AT";

    /// All variables read by [`SelectorConfig::from_env`].
    pub const ENV_VARS: [&'static str; 11] = [
        Self::ENV_HIGH_THRESHOLD,
        Self::ENV_MEDIUM_THRESHOLD,
        Self::ENV_AMBIGUITY_GAP,
        Self::ENV_SCORING_MODE,
        Self::ENV_LOW_CONFIDENCE_ACTION,
        Self::ENV_TOKEN_WEIGHT,
        Self::ENV_LAYOUT_WEIGHT,
        Self::ENV_ROI_WEIGHT,
        Self::ENV_PLAUSIBILITY_WEIGHT,
        Self::ENV_WEIGHTS_VERSION,
        Self::ENV_WEIGHTS_EFFECTIVE_AT,
    ];

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Parsing errors are reported here; range and consistency checks live in
    /// [`SelectorConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let thresholds = Thresholds {
            high: Self::parse_u32_from_env(Self::ENV_HIGH_THRESHOLD, defaults.thresholds.high)?,
            medium: Self::parse_u32_from_env(
                Self::ENV_MEDIUM_THRESHOLD,
                defaults.thresholds.medium,
            )?,
        };
        let ambiguity_gap = Self::parse_u32_from_env(Self::ENV_AMBIGUITY_GAP, defaults.ambiguity_gap)?;

        let scoring_mode = match Self::read_env(Self::ENV_SCORING_MODE) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::UnknownScoringMode { value })?,
            None => defaults.scoring_mode,
        };
        let low_confidence_action = match Self::read_env(Self::ENV_LOW_CONFIDENCE_ACTION) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::UnknownLowConfidenceAction { value })?,
            None => defaults.low_confidence_action,
        };

        let weights = Self::parse_weights_from_env(defaults.weights)?;

        Ok(Self {
            thresholds,
            ambiguity_gap,
            scoring_mode,
            low_confidence_action,
            weights,
            weight_overrides: None,
        })
    }

    /// Checks threshold ranges and order, weight ranges, and that changed weights
    /// carry a new version label.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Thresholds { high, medium } = self.thresholds;
        for (name, value) in [("high threshold", high), ("medium threshold", medium)] {
            if value == 0 || value > MAX_SCORE {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        if medium >= high {
            return Err(ConfigError::ThresholdOrder { high, medium });
        }
        if self.ambiguity_gap > MAX_SCORE {
            return Err(ConfigError::InvalidThreshold {
                name: "ambiguity gap",
                value: self.ambiguity_gap,
            });
        }

        Self::validate_weights(&self.weights)?;
        // Overrides replace individual weights, so the applied set is checked too.
        Self::validate_weights(&self.effective_weights())?;

        let weights = &self.weights;
        let baseline = VersionedWeights::default();
        if weights.version == baseline.version && !weights.same_values(&baseline) {
            return Err(ConfigError::WeightsVersionNotBumped {
                version: weights.version.clone(),
            });
        }

        Ok(())
    }

    /// The weights multi-signal scoring applies: base weights after overrides.
    pub fn effective_weights(&self) -> VersionedWeights {
        match &self.weight_overrides {
            Some(overrides) => self.weights.with_overrides(overrides),
            None => self.weights.clone(),
        }
    }

    fn validate_weights(weights: &VersionedWeights) -> Result<(), ConfigError> {
        let named = [
            ("token", weights.token_weight),
            ("layout", weights.layout_weight),
            ("roi", weights.roi_weight),
            ("plausibility", weights.plausibility_weight),
        ];
        for (signal, value) in named {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidWeight { signal, value });
            }
        }
        if weights.total() <= 0.0 {
            return Err(ConfigError::ZeroTotalWeight);
        }
        Ok(())
    }

    /// The decision policy these settings describe.
    pub fn policy(&self) -> DecisionPolicy {
        DecisionPolicy {
            thresholds: self.thresholds,
            ambiguity_gap: self.ambiguity_gap,
            low_confidence_action: self.low_confidence_action,
        }
    }

    /// A ranker for the configured mode, thresholds and weights.
    pub fn ranker(&self) -> CandidateRanker {
        let ranker = CandidateRanker::new(self.scoring_mode)
            .thresholds(self.thresholds)
            .weights(self.weights.clone());
        match self.weight_overrides {
            Some(overrides) => ranker.overrides(overrides),
            None => ranker,
        }
    }

    /// Returns a short `key=value` summary (useful for logging).
    pub fn summary(&self) -> String {
        format!(
            "mode={} high={} medium={} gap={} low_confidence={:?} weights={}",
            self.scoring_mode,
            self.thresholds.high,
            self.thresholds.medium,
            self.ambiguity_gap,
            self.low_confidence_action,
            self.weights.version
        )
    }

    fn parse_weights_from_env(default: VersionedWeights) -> Result<VersionedWeights, ConfigError> {
        let effective_at = match Self::read_env(Self::ENV_WEIGHTS_EFFECTIVE_AT) {
            Some(value) => DateTime::parse_from_rfc3339(&value)
                .map(|at| at.with_timezone(&Utc))
                .map_err(|source| ConfigError::InvalidTimestamp {
                    var: Self::ENV_WEIGHTS_EFFECTIVE_AT,
                    value,
                    source,
                })?,
            None => default.effective_at,
        };

        Ok(VersionedWeights {
            token_weight: Self::parse_f64_from_env(Self::ENV_TOKEN_WEIGHT, default.token_weight)?,
            layout_weight: Self::parse_f64_from_env(Self::ENV_LAYOUT_WEIGHT, default.layout_weight)?,
            roi_weight: Self::parse_f64_from_env(Self::ENV_ROI_WEIGHT, default.roi_weight)?,
            plausibility_weight: Self::parse_f64_from_env(
                Self::ENV_PLAUSIBILITY_WEIGHT,
                default.plausibility_weight,
            )?,
            version: Self::read_env(Self::ENV_WEIGHTS_VERSION)
                .unwrap_or_else(|| SIGNAL_WEIGHTS_VERSION.to_string()),
            effective_at,
        })
    }

    /// Trimmed value, with blank treated as unset.
    fn read_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_u32_from_env(var: &'static str, default: u32) -> Result<u32, ConfigError> {
        match Self::read_env(var) {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidInteger { var, value, source }),
            None => Ok(default),
        }
    }

    fn parse_f64_from_env(var: &'static str, default: f64) -> Result<f64, ConfigError> {
        match Self::read_env(var) {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidFloat { var, value, source }),
            None => Ok(default),
        }
    }
}
