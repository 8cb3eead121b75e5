//! Template selection library crate (used by the `selector` binary and integration
//! tests).
//!
//! Assigns an OCR'd document to one of several competing template versions and
//! decides whether the assignment may proceed automatically. A wrong or uncertain
//! assignment is never made silently: every call ends in exactly one
//! [`SelectionDecision`] (auto-select, review queue or hard stop) and an immutable
//! [`SelectionTrace`].
//!
//! # Pipeline
//!
//! Tokenizer → signal extractors (token, layout, ROI, plausibility) → combiner →
//! [`CandidateRanker`] → [`decide`] → [`TraceBuilder`]. [`TemplateSelector`] runs
//! the whole thing.
//!
//! # Public API Surface
//!
//! ## Engine
//! - [`TemplateSelector`], [`SelectionOutcome`], [`SelectionResult`]
//! - [`SelectorConfig`], [`ConfigError`] - Environment-backed settings
//!
//! ## Inputs
//! - [`DocumentContext`], [`DocumentMetadata`], [`MatchingMetadata`]
//! - [`TemplateCandidate`], [`SelectionConfig`] and the [`TemplateRegistry`] seam
//! - [`SelectionRequest`] - JSON request files for batch callers
//!
//! ## Scoring & decisions
//! - [`Candidate`], [`ScoringMode`], [`VersionedWeights`], [`MultiSignalResult`]
//! - [`ConfidenceBand`], [`ReasonCode`], [`DecisionPolicy`], [`LowConfidenceAction`]
//!
//! ## Utilities
//! - Hashing functions for input hashes and replay fingerprints
//! - Scoring constants in [`constants`]

pub mod config;
pub mod constants;
pub mod decision;
pub mod document;
pub mod hashing;
pub mod ranking;
pub mod request;
pub mod selector;
pub mod signals;
pub mod template;
pub mod tokenize;
pub mod trace;

pub use config::{ConfigError, SelectorConfig};
pub use decision::{
    ConfidenceBand, DecisionPolicy, LowConfidenceAction, ReasonCode, SelectionDecision,
    Thresholds, decide,
};
pub use document::{DocumentContext, DocumentMetadata, FormType, MatchingMetadata};
pub use hashing::{hash_input, hash_parts, hash_to_u64};
pub use ranking::{Candidate, CandidateRanker, ScoringMode};
pub use request::{RequestError, SelectionRequest, load_request, parse_request};
pub use selector::{SelectionOutcome, SelectionResult, TemplateSelector};
pub use signals::{
    Evidence, MultiSignalResult, SignalResult, SignalType, VersionedWeights, WeightOverrides,
};
pub use template::{
    FieldExpectation, FieldType, InMemoryRegistry, LayoutExpectations, RoiConfig, RoiRegion,
    SelectionConfig, TemplateCandidate, TemplateError, TemplateRegistry,
};
pub use tokenize::{TokenizedDocument, tokenize};
pub use trace::{SelectionTrace, TraceBuilder};
