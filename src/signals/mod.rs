//! Independent evidence sources scored per candidate, and their weighted combination.
//!
//! Every extractor is a pure function of the document and one candidate's
//! configuration, returning a fresh [`SignalResult`] on a 0–100 scale:
//!
//! - [`token_signal`]: required/optional tokens and form-code regex
//! - [`layout_signal`]: page count, detected sections, form type
//! - [`roi_signal`]: expected content in configured regions
//! - [`plausibility_signal`]: presence of critical fields
//!
//! [`combine_signals`] merges them under a [`VersionedWeights`] set, which is
//! recorded in the result so a stored score can be reproduced later.

pub mod combiner;
pub mod layout;
pub mod patterns;
pub mod plausibility;
pub mod regex_cache;
pub mod roi;
pub mod token;
pub mod types;


pub use combiner::combine_signals;
pub use layout::layout_signal;
pub use patterns::{field_variants, split_words};
pub use plausibility::plausibility_signal;
pub use roi::roi_signal;
pub use token::token_signal;
pub use types::{
    CombinedEvidence, Evidence, MultiSignalResult, SignalResult, SignalType, VersionedWeights,
    WeightOverrides,
};
