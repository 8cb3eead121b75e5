//! Cross-cutting, shared constants.
//!
//! Scoring points are part of the published scoring contract: a change here changes
//! every stored score, so bump [`SIGNAL_WEIGHTS_VERSION`] alongside any edit.

/// Lower bound (inclusive) of the HIGH confidence band.
pub const DEFAULT_HIGH_THRESHOLD: u32 = 80;
/// Lower bound (inclusive) of the MEDIUM confidence band.
pub const DEFAULT_MEDIUM_THRESHOLD: u32 = 50;
/// Minimum margin between the top two candidates to auto-select at MEDIUM.
pub const DEFAULT_AMBIGUITY_GAP: u32 = 10;

/// Upper bound of every score in the engine.
pub const MAX_SCORE: u32 = 100;
/// Score reported by a signal that has nothing to compare against.
pub const NEUTRAL_SCORE: u32 = 50;

pub const REQUIRED_TOKEN_POINTS: f64 = 10.0;
pub const REQUIRED_MISSING_PENALTY: f64 = 50.0;
pub const ANY_TOKEN_POINTS: f64 = 5.0;
pub const ANY_MISSING_PENALTY: f64 = 30.0;
pub const FORM_CODE_POINTS: f64 = 15.0;
pub const OPTIONAL_TOKEN_POINTS: f64 = 2.0;

pub const LAYOUT_PAGE_ADJUSTMENT: i64 = 20;
pub const LAYOUT_SECTION_MAX_BONUS: f64 = 30.0;
pub const LAYOUT_FORM_TYPE_ADJUSTMENT: i64 = 10;

/// Page text longer than this counts as content for an ROI region without fields.
pub const ROI_MIN_CONTENT_CHARS: usize = 50;

pub const CLIENT_MATCH_BOOST: u32 = 10;
pub const ASSET_TYPE_MATCH_BOOST: u32 = 5;
pub const WORK_TYPE_MATCH_BOOST: u32 = 5;

pub const DEFAULT_TOKEN_WEIGHT: f64 = 0.40;
pub const DEFAULT_LAYOUT_WEIGHT: f64 = 0.20;
pub const DEFAULT_ROI_WEIGHT: f64 = 0.20;
pub const DEFAULT_PLAUSIBILITY_WEIGHT: f64 = 0.20;

/// Version tag of the default weight set.
pub const SIGNAL_WEIGHTS_VERSION: &str = "2024-06.1";
/// Unix seconds from which the default weight set applies (2024-06-01T00:00:00Z).
pub const SIGNAL_WEIGHTS_EFFECTIVE_AT_SECS: i64 = 1_717_200_000;

/// Clamps a rounded score into `0..=MAX_SCORE`.
#[inline]
pub fn clamp_score(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        (value.round() as u32).min(MAX_SCORE)
    }
}
