use tracing::{debug, warn};

use crate::constants::clamp_score;
use crate::decision::ConfidenceBand;

use super::types::{
    CombinedEvidence, MultiSignalResult, SignalResult, SignalType, VersionedWeights,
    WeightOverrides,
};

/// Weighted average of the supplied signals.
///
/// Weights come from `weights` (after `overrides`) by signal type; a signal's own
/// `weight` field is ignored and rewritten to the weight actually applied. Any
/// subset of signal types is accepted. An empty list, or one whose weights sum to
/// zero, combines to 0 with LOW confidence.
pub fn combine_signals(
    signals: &[SignalResult],
    weights: &VersionedWeights,
    overrides: Option<&WeightOverrides>,
) -> MultiSignalResult {
    let weights_used = match overrides {
        Some(o) => weights.with_overrides(o),
        None => weights.clone(),
    };

    let applied: Vec<SignalResult> = signals
        .iter()
        .map(|s| SignalResult {
            weight: usable_weight(s.signal_type, weights_used.weight_for(s.signal_type)),
            ..s.clone()
        })
        .collect();

    let total_weight: f64 = applied.iter().map(|s| s.weight).sum();
    let (combined_score, confidence) = if applied.is_empty() || total_weight <= 0.0 {
        (0, ConfidenceBand::Low)
    } else {
        let weighted: f64 = applied.iter().map(|s| s.score as f64 * s.weight).sum();
        let score = clamp_score(weighted / total_weight);
        (score, ConfidenceBand::classify(score))
    };

    let combined_evidence = CombinedEvidence {
        signal_count: applied.len(),
        high_confidence_signals: applied
            .iter()
            .filter(|s| s.confidence == ConfidenceBand::High)
            .count(),
        weak_signals: applied
            .iter()
            .filter(|s| s.confidence == ConfidenceBand::Low)
            .map(|s| s.signal_type)
            .collect(),
    };

    debug!(
        combined_score,
        signal_count = combined_evidence.signal_count,
        weights_version = %weights_used.version,
        "Combined signals"
    );

    MultiSignalResult {
        combined_score,
        signals: applied,
        confidence,
        combined_evidence,
        weights_used,
    }
}

fn usable_weight(signal_type: SignalType, weight: f64) -> f64 {
    if weight.is_finite() && weight >= 0.0 {
        weight
    } else {
        warn!(signal = %signal_type, weight, "Ignoring unusable signal weight");
        0.0
    }
}
