use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::decision::{ConfidenceBand, SelectionDecision};
use crate::hashing::hash_input;
use crate::ranking::{Candidate, ScoringMode};
use crate::signals::VersionedWeights;

use super::SelectionTrace;

/// Assembles a [`SelectionTrace`] once the decision is known.
///
/// The trace id defaults to a fresh UUID v4 and the timestamp to the current UTC
/// time; both can be pinned so that replays serialize byte for byte.
#[derive(Debug, Clone, Default)]
pub struct TraceBuilder {
    trace_id: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    input_hash: Option<String>,
    explicit_template_id: Option<String>,
    duration_ms: u64,
    scoring_mode: ScoringMode,
    weights_used: VersionedWeights,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Hashes the document text; see [`hash_input`].
    pub fn input(mut self, document_text: &str) -> Self {
        self.input_hash = Some(hash_input(document_text));
        self
    }

    pub fn explicit_template_id(mut self, id: Option<&str>) -> Self {
        self.explicit_template_id = id.map(str::to_string);
        self
    }

    pub fn duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn scoring(mut self, mode: ScoringMode, weights: VersionedWeights) -> Self {
        self.scoring_mode = mode;
        self.weights_used = weights;
        self
    }

    /// `candidates` must be in ranking order.
    pub fn build(self, candidates: Vec<Candidate>, decision: SelectionDecision) -> SelectionTrace {
        let top_candidate = candidates.first().cloned();
        let runner_up = candidates.get(1).cloned();
        let gap = match (&top_candidate, &runner_up) {
            (Some(top), Some(next)) => Some(top.score.saturating_sub(next.score)),
            _ => None,
        };
        let confidence_band = top_candidate
            .as_ref()
            .map_or(ConfidenceBand::Low, |top| top.confidence);

        SelectionTrace {
            trace_id: self
                .trace_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            input_hash: self.input_hash.unwrap_or_else(|| hash_input("")),
            candidates,
            top_candidate,
            runner_up,
            gap,
            confidence_band,
            decision,
            explicit_template_id: self.explicit_template_id,
            duration_ms: self.duration_ms,
            scoring_mode: self.scoring_mode,
            weights_used: self.weights_used,
        }
    }
}
