use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_AMBIGUITY_GAP;

use super::band::Thresholds;

/// Machine-readable reason for not auto-selecting. The set is closed: downstream
/// routing branches on these three values only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    LowConfidence,
    Conflict,
    PipelineError,
}

impl ReasonCode {
    pub const ALL: [ReasonCode; 3] = [
        ReasonCode::LowConfidence,
        ReasonCode::Conflict,
        ReasonCode::PipelineError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::LowConfidence => "LOW_CONFIDENCE",
            ReasonCode::Conflict => "CONFLICT",
            ReasonCode::PipelineError => "PIPELINE_ERROR",
        }
    }

    /// Codes the review queue accepts. `PIPELINE_ERROR` is fatal and surfaces
    /// through the orchestrator instead.
    pub fn is_reviewable(&self) -> bool {
        matches!(self, ReasonCode::LowConfidence | ReasonCode::Conflict)
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the decision policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum SelectionDecision {
    AutoSelect {
        template_id: String,
        version_id: String,
        reason: String,
    },
    ReviewQueue {
        reason: String,
        reason_code: ReasonCode,
    },
    HardStop {
        reason: String,
        reason_code: ReasonCode,
        fix_path: String,
    },
}

impl SelectionDecision {
    pub(crate) fn hard_stop(reason: impl Into<String>, fix_path: impl Into<String>) -> Self {
        SelectionDecision::HardStop {
            reason: reason.into(),
            reason_code: ReasonCode::PipelineError,
            fix_path: fix_path.into(),
        }
    }

    pub fn is_auto_select(&self) -> bool {
        matches!(self, SelectionDecision::AutoSelect { .. })
    }

    pub fn is_hard_stop(&self) -> bool {
        matches!(self, SelectionDecision::HardStop { .. })
    }

    pub fn reason(&self) -> &str {
        match self {
            SelectionDecision::AutoSelect { reason, .. }
            | SelectionDecision::ReviewQueue { reason, .. }
            | SelectionDecision::HardStop { reason, .. } => reason,
        }
    }

    pub fn reason_code(&self) -> Option<ReasonCode> {
        match self {
            SelectionDecision::AutoSelect { .. } => None,
            SelectionDecision::ReviewQueue { reason_code, .. }
            | SelectionDecision::HardStop { reason_code, .. } => Some(*reason_code),
        }
    }

    /// Human-readable block reason prefixed with its code, `None` for auto-selects.
    pub fn block_reason(&self) -> Option<String> {
        match self {
            SelectionDecision::AutoSelect { .. } => None,
            SelectionDecision::ReviewQueue {
                reason,
                reason_code,
            } => Some(format!("{reason_code}: {reason}")),
            SelectionDecision::HardStop {
                reason,
                reason_code,
                fix_path,
            } => Some(format!("{reason_code}: {reason} (fix: {fix_path})")),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SelectionDecision::AutoSelect { .. } => "AUTO_SELECT",
            SelectionDecision::ReviewQueue { .. } => "REVIEW_QUEUE",
            SelectionDecision::HardStop { .. } => "HARD_STOP",
        }
    }
}

impl std::fmt::Display for SelectionDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.kind(), self.reason())
    }
}

/// How a LOW-confidence top candidate is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowConfidenceAction {
    /// Soft block: `REVIEW_QUEUE` with `LOW_CONFIDENCE`.
    #[default]
    Review,
    /// Pipeline failure: `HARD_STOP` with `PIPELINE_ERROR`.
    HardStop,
}

impl std::str::FromStr for LowConfidenceAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "review" | "review_queue" => Ok(Self::Review),
            "hard_stop" | "hardstop" => Ok(Self::HardStop),
            _ => Err(format!("Unknown low confidence action: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionPolicy {
    pub thresholds: Thresholds,
    pub ambiguity_gap: u32,
    pub low_confidence_action: LowConfidenceAction,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            ambiguity_gap: DEFAULT_AMBIGUITY_GAP,
            low_confidence_action: LowConfidenceAction::default(),
        }
    }
}
