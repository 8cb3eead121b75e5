//! Confidence bands and the decision policy.
//!
//! [`decide`] is a pure function of the ranked candidates, an optional explicit
//! override and a [`DecisionPolicy`]. It never retries and has no side effects;
//! every terminal state is a [`SelectionDecision`] variant.
//!
//! # LOW confidence routing
//!
//! A LOW top candidate is routed by [`LowConfidenceAction`]. The default sends it
//! to the review queue as `LOW_CONFIDENCE`; `HardStop` reports it as a
//! `PIPELINE_ERROR`. The selection result is derived from the same decision value,
//! so the two never disagree.

pub mod band;
pub mod policy;
pub mod types;


pub use band::{ConfidenceBand, Thresholds};
pub use policy::{FIX_LOW_CONFIDENCE, FIX_NO_CANDIDATES, FIX_UNKNOWN_TEMPLATE, decide};
pub use types::{DecisionPolicy, LowConfidenceAction, ReasonCode, SelectionDecision};
