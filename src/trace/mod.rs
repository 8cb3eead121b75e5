//! Immutable audit record of one selection call.
//!
//! A [`SelectionTrace`] is produced for every decision variant. Its canonical JSON
//! form has lexicographically sorted keys at every depth, and
//! [`SelectionTrace::replay_fingerprint`] drops the fields that legitimately
//! differ between replays (`traceId`, `timestamp`, `durationMs`) so two runs over
//! the same inputs can be compared by a single hash.

pub mod builder;


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::decision::{ConfidenceBand, SelectionDecision};
use crate::hashing::hash_parts;
use crate::ranking::{Candidate, ScoringMode};
use crate::signals::VersionedWeights;

pub use builder::TraceBuilder;

/// Fields excluded from [`SelectionTrace::replay_fingerprint`].
pub const VOLATILE_FIELDS: [&str; 3] = ["traceId", "timestamp", "durationMs"];

const FINGERPRINT_DOMAIN: &[u8] = b"selection-trace/v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionTrace {
    pub trace_id: String,
    pub timestamp: DateTime<Utc>,
    /// 16 hex digits of blake3 over the normalized document text.
    pub input_hash: String,
    /// Every scored candidate in ranking order.
    pub candidates: Vec<Candidate>,
    pub top_candidate: Option<Candidate>,
    pub runner_up: Option<Candidate>,
    /// `None` when there is no runner-up.
    pub gap: Option<u32>,
    pub confidence_band: ConfidenceBand,
    pub decision: SelectionDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_template_id: Option<String>,
    pub duration_ms: u64,
    pub scoring_mode: ScoringMode,
    pub weights_used: VersionedWeights,
}

impl SelectionTrace {
    /// Serializes with sorted keys at every level.
    pub fn canonical_json(&self) -> serde_json::Result<String> {
        let value = serde_json::to_value(self)?;
        serde_json::to_string(&canonicalize(value))
    }

    /// blake3 hex over the canonical JSON without [`VOLATILE_FIELDS`].
    ///
    /// Equal fingerprints mean two selections saw the same input, ranked the same
    /// candidates identically and reached the same decision.
    pub fn replay_fingerprint(&self) -> serde_json::Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            for field in VOLATILE_FIELDS {
                map.remove(field);
            }
        }
        let canonical = serde_json::to_string(&canonicalize(value))?;
        Ok(hash_parts(&[FINGERPRINT_DOMAIN, canonical.as_bytes()]))
    }
}

/// Rebuilds every object with its keys in lexicographic order.
pub fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
