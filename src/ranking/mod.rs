//! Candidate scoring and deterministic ordering.

pub mod ranker;
pub mod types;


pub use ranker::{CandidateRanker, apply_metadata_boost, sort_candidates};
pub use types::{Candidate, ScoringMode};
