use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HIGH_THRESHOLD, DEFAULT_MEDIUM_THRESHOLD};

/// Band boundaries, both inclusive lower bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub high: u32,
    pub medium: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_THRESHOLD,
            medium: DEFAULT_MEDIUM_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

impl ConfidenceBand {
    pub fn from_score(score: u32, thresholds: &Thresholds) -> Self {
        if score >= thresholds.high {
            Self::High
        } else if score >= thresholds.medium {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Band under the default 80/50 thresholds, as used by individual signals.
    #[inline]
    pub fn classify(score: u32) -> Self {
        Self::from_score(score, &Thresholds::default())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl std::fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
