use serde::{Deserialize, Serialize};

use crate::decision::{ConfidenceBand, ReasonCode, SelectionDecision};
use crate::ranking::Candidate;
use crate::trace::SelectionTrace;

/// What the orchestrator consumes after a selection call.
///
/// Built from the same [`SelectionDecision`] that is recorded in the trace, so the
/// two never disagree. `selected` implies `auto_processing_allowed` and no
/// `block_reason`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResult {
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_slug: Option<String>,
    pub confidence_band: ConfidenceBand,
    pub top_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner_up_score: Option<u32>,
    /// `None` when there is no runner-up (an unbounded gap).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_gap: Option<u32>,
    pub candidates: Vec<Candidate>,
    pub matched_tokens: Vec<String>,
    pub auto_processing_allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<ReasonCode>,
    /// Weights version the scores were computed under, in multi-signal mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights_version: Option<String>,
}

impl SelectionResult {
    /// `candidates` must be in ranking order.
    pub fn from_decision(
        decision: &SelectionDecision,
        candidates: Vec<Candidate>,
        weights_version: Option<String>,
    ) -> Self {
        let top = candidates.first();
        let runner_up_score = candidates.get(1).map(|c| c.score);
        let top_score = top.map_or(0, |c| c.score);
        let score_gap = runner_up_score.map(|r| top_score.saturating_sub(r));

        // Explicit overrides select a candidate that may not be on top. Version
        // ids are only unique per registry, so the template id is matched too.
        let (template_id, version_id, auto_selected) = match decision {
            SelectionDecision::AutoSelect {
                template_id,
                version_id,
                ..
            } => (
                Some(template_id.clone()),
                Some(version_id.clone()),
                candidates
                    .iter()
                    .find(|c| c.template_id == *template_id && c.version_id == *version_id),
            ),
            _ => (None, None, None),
        };
        let selected = decision.is_auto_select();
        let template_slug = auto_selected.map(|c| c.template_slug.clone());

        let chosen = auto_selected.or(top);
        let confidence_band = chosen.map_or(ConfidenceBand::Low, |c| c.confidence);
        let matched_tokens = chosen.map(|c| c.matched_tokens.clone()).unwrap_or_default();

        Self {
            selected,
            template_id,
            version_id,
            template_slug,
            confidence_band,
            top_score,
            runner_up_score,
            score_gap,
            candidates,
            matched_tokens,
            auto_processing_allowed: selected,
            block_reason: decision.block_reason(),
            reason_code: decision.reason_code(),
            weights_version,
        }
    }

    /// Reason code for the review queue. Only `LOW_CONFIDENCE` and `CONFLICT` are
    /// reviewable; pipeline errors go to the fix path instead.
    pub fn review_reason(&self) -> Option<ReasonCode> {
        self.reason_code.filter(|code| code.is_reviewable())
    }

    pub fn is_blocked(&self) -> bool {
        !self.auto_processing_allowed
    }
}

/// Everything one selection call produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionOutcome {
    pub result: SelectionResult,
    pub decision: SelectionDecision,
    pub trace: SelectionTrace,
}
