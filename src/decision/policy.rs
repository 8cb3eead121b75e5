use tracing::debug;

use crate::ranking::Candidate;

use super::band::ConfidenceBand;
use super::types::{DecisionPolicy, LowConfidenceAction, ReasonCode, SelectionDecision};

pub const FIX_UNKNOWN_TEMPLATE: &str = "verify templateId exists and is active";
pub const FIX_NO_CANDIDATES: &str =
    "ensure at least one template is active and matches document fingerprint";
pub const FIX_LOW_CONFIDENCE: &str = "provide explicit templateId or improve document quality";

/// Turns a ranked candidate list into a decision.
///
/// `candidates` must already be in ranking order. Precedence: explicit override,
/// then the empty-list hard stop, then the confidence band of the top candidate
/// and its gap to the runner-up. Bands are recomputed from scores with the policy's
/// thresholds.
pub fn decide(
    candidates: &[Candidate],
    explicit_template_id: Option<&str>,
    policy: &DecisionPolicy,
) -> SelectionDecision {
    if let Some(id) = explicit_template_id {
        return match candidates.iter().find(|c| c.answers_to(id)) {
            Some(chosen) => SelectionDecision::AutoSelect {
                template_id: chosen.template_id.clone(),
                version_id: chosen.version_id.clone(),
                reason: "explicit templateId provided".to_string(),
            },
            None => SelectionDecision::hard_stop(
                format!("explicit templateId '{id}' is not among the active templates"),
                FIX_UNKNOWN_TEMPLATE,
            ),
        };
    }

    let Some(top) = candidates.first() else {
        return SelectionDecision::hard_stop("no active templates to select from", FIX_NO_CANDIDATES);
    };

    let runner_up = candidates.get(1);
    let gap = runner_up.map(|r| top.score.saturating_sub(r.score));
    let band = ConfidenceBand::from_score(top.score, &policy.thresholds);

    debug!(
        top = %top.template_slug,
        top_score = top.score,
        gap = ?gap,
        band = %band,
        "Applying decision policy"
    );

    match band {
        ConfidenceBand::High => SelectionDecision::AutoSelect {
            template_id: top.template_id.clone(),
            version_id: top.version_id.clone(),
            reason: format!(
                "high confidence match '{}' (score {})",
                top.template_slug, top.score
            ),
        },
        ConfidenceBand::Medium => match (gap, runner_up) {
            (Some(gap), Some(runner_up)) if gap < policy.ambiguity_gap => {
                SelectionDecision::ReviewQueue {
                    reason: conflict_reason(candidates, top, runner_up, gap, policy),
                    reason_code: ReasonCode::Conflict,
                }
            }
            (Some(gap), _) => SelectionDecision::AutoSelect {
                template_id: top.template_id.clone(),
                version_id: top.version_id.clone(),
                reason: format!(
                    "medium confidence match '{}' (score {}) with gap {} >= {}",
                    top.template_slug, top.score, gap, policy.ambiguity_gap
                ),
            },
            (None, _) => SelectionDecision::AutoSelect {
                template_id: top.template_id.clone(),
                version_id: top.version_id.clone(),
                reason: format!(
                    "medium confidence match '{}' (score {}) with no runner-up",
                    top.template_slug, top.score
                ),
            },
        },
        ConfidenceBand::Low => {
            let summary = format!(
                "cannot auto-select: top candidate '{}' scored {} (below {})",
                top.template_slug, top.score, policy.thresholds.medium
            );
            match policy.low_confidence_action {
                LowConfidenceAction::Review => SelectionDecision::ReviewQueue {
                    reason: format!("{summary}; {FIX_LOW_CONFIDENCE}"),
                    reason_code: ReasonCode::LowConfidence,
                },
                LowConfidenceAction::HardStop => {
                    SelectionDecision::hard_stop(summary, FIX_LOW_CONFIDENCE)
                }
            }
        }
    }
}

/// Names the leader, the runner-up and every slug within the ambiguity gap.
fn conflict_reason(
    candidates: &[Candidate],
    top: &Candidate,
    runner_up: &Candidate,
    gap: u32,
    policy: &DecisionPolicy,
) -> String {
    let contenders: Vec<&str> = candidates
        .iter()
        .take_while(|c| top.score.saturating_sub(c.score) < policy.ambiguity_gap)
        .map(|c| c.template_slug.as_str())
        .collect();

    format!(
        "ambiguous gap {} < {} between '{}' ({}) and runner-up '{}' ({}); candidates within gap: {}",
        gap,
        policy.ambiguity_gap,
        top.template_slug,
        top.score,
        runner_up.template_slug,
        runner_up.score,
        contenders.join(", ")
    )
}
