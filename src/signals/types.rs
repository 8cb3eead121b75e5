use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{
    DEFAULT_LAYOUT_WEIGHT, DEFAULT_PLAUSIBILITY_WEIGHT, DEFAULT_ROI_WEIGHT, DEFAULT_TOKEN_WEIGHT,
    SIGNAL_WEIGHTS_EFFECTIVE_AT_SECS, SIGNAL_WEIGHTS_VERSION,
};
use crate::decision::ConfidenceBand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Token,
    Layout,
    Roi,
    Plausibility,
}

impl SignalType {
    pub const ALL: [SignalType; 4] = [
        SignalType::Token,
        SignalType::Layout,
        SignalType::Roi,
        SignalType::Plausibility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::Token => "token",
            SignalType::Layout => "layout",
            SignalType::Roi => "roi",
            SignalType::Plausibility => "plausibility",
        }
    }
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a signal saw. `details` is a sorted map so serialized evidence is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub details: BTreeMap<String, Value>,
}

impl Evidence {
    pub fn detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty() && self.missing.is_empty() && self.details.is_empty()
    }
}

/// Output of one extractor for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub score: u32,
    /// Informational only; the combiner always takes weights from [`VersionedWeights`].
    pub weight: f64,
    pub confidence: ConfidenceBand,
    pub evidence: Evidence,
}

impl SignalResult {
    pub fn new(signal_type: SignalType, score: u32, evidence: Evidence) -> Self {
        Self {
            signal_type,
            score,
            weight: VersionedWeights::default().weight_for(signal_type),
            confidence: ConfidenceBand::classify(score),
            evidence,
        }
    }

    /// A signal with nothing to compare against. It still takes part in the
    /// weighted average at the neutral value.
    pub fn neutral(signal_type: SignalType) -> Self {
        Self::new(
            signal_type,
            crate::constants::NEUTRAL_SCORE,
            Evidence::default(),
        )
    }
}

/// Named, versioned signal weights.
///
/// A stored decision records the version it was made under, so any change to the
/// numbers must come with a new `version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedWeights {
    pub token_weight: f64,
    pub layout_weight: f64,
    pub roi_weight: f64,
    pub plausibility_weight: f64,
    pub version: String,
    pub effective_at: DateTime<Utc>,
}

impl Default for VersionedWeights {
    fn default() -> Self {
        Self {
            token_weight: DEFAULT_TOKEN_WEIGHT,
            layout_weight: DEFAULT_LAYOUT_WEIGHT,
            roi_weight: DEFAULT_ROI_WEIGHT,
            plausibility_weight: DEFAULT_PLAUSIBILITY_WEIGHT,
            version: SIGNAL_WEIGHTS_VERSION.to_string(),
            effective_at: DateTime::from_timestamp(SIGNAL_WEIGHTS_EFFECTIVE_AT_SECS, 0)
                .unwrap_or_default(),
        }
    }
}

impl VersionedWeights {
    pub fn weight_for(&self, signal_type: SignalType) -> f64 {
        match signal_type {
            SignalType::Token => self.token_weight,
            SignalType::Layout => self.layout_weight,
            SignalType::Roi => self.roi_weight,
            SignalType::Plausibility => self.plausibility_weight,
        }
    }

    pub fn total(&self) -> f64 {
        SignalType::ALL.iter().map(|t| self.weight_for(*t)).sum()
    }

    /// Returns `true` if the numeric weights equal `other`'s, ignoring version data.
    pub fn same_values(&self, other: &VersionedWeights) -> bool {
        SignalType::ALL
            .iter()
            .all(|t| (self.weight_for(*t) - other.weight_for(*t)).abs() < f64::EPSILON)
    }

    /// Applies per-call overrides. The result carries a `+override` version suffix
    /// so it can never be confused with the published set.
    pub fn with_overrides(&self, overrides: &WeightOverrides) -> VersionedWeights {
        if overrides.is_empty() {
            return self.clone();
        }

        VersionedWeights {
            token_weight: overrides.token.unwrap_or(self.token_weight),
            layout_weight: overrides.layout.unwrap_or(self.layout_weight),
            roi_weight: overrides.roi.unwrap_or(self.roi_weight),
            plausibility_weight: overrides.plausibility.unwrap_or(self.plausibility_weight),
            version: format!("{}+override", self.version),
            effective_at: self.effective_at,
        }
    }
}

/// Per-call replacements for individual signal weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plausibility: Option<f64>,
}

impl WeightOverrides {
    pub fn is_empty(&self) -> bool {
        self.token.is_none()
            && self.layout.is_none()
            && self.roi.is_none()
            && self.plausibility.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedEvidence {
    pub signal_count: usize,
    pub high_confidence_signals: usize,
    /// Signal types whose own confidence is LOW.
    pub weak_signals: Vec<SignalType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSignalResult {
    pub combined_score: u32,
    pub signals: Vec<SignalResult>,
    pub confidence: ConfidenceBand,
    pub combined_evidence: CombinedEvidence,
    pub weights_used: VersionedWeights,
}

impl MultiSignalResult {
    pub fn signal(&self, signal_type: SignalType) -> Option<&SignalResult> {
        self.signals.iter().find(|s| s.signal_type == signal_type)
    }
}
