use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::decision::ConfidenceBand;
use crate::signals::MultiSignalResult;

/// How candidate scores are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Token signal alone, with metadata boosting.
    #[default]
    Legacy,
    /// Weighted combination of all four signals.
    MultiSignal,
}

impl std::str::FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" | "token" => Ok(Self::Legacy),
            "multi_signal" | "multi-signal" | "multisignal" => Ok(Self::MultiSignal),
            _ => Err(format!("Unknown scoring mode: {}", s)),
        }
    }
}

impl std::fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringMode::Legacy => f.write_str("legacy"),
            ScoringMode::MultiSignal => f.write_str("multi_signal"),
        }
    }
}

/// One template version scored against one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub template_id: String,
    pub version_id: String,
    pub template_slug: String,
    pub score: u32,
    pub matched_tokens: Vec<String>,
    pub missing_required: Vec<String>,
    pub confidence: ConfidenceBand,
    /// Metadata boosts applied in legacy mode, e.g. `client+10`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub boosts: Vec<String>,
    /// Per-signal breakdown in multi-signal mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signals: Option<MultiSignalResult>,
}

impl Candidate {
    /// Ranking order: score descending, then slug ascending, then version id
    /// ascending, so equal inputs always sort identically.
    pub fn rank_cmp(&self, other: &Candidate) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.template_slug.cmp(&other.template_slug))
            .then_with(|| self.version_id.cmp(&other.version_id))
    }

    pub fn answers_to(&self, id: &str) -> bool {
        self.template_id == id || self.version_id == id
    }
}
