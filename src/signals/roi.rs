use crate::constants::{ROI_MIN_CONTENT_CHARS, clamp_score};
use crate::template::RoiConfig;
use crate::tokenize::{contains_phrase, normalize_text};

use super::patterns::field_variants;
use super::types::{Evidence, SignalResult, SignalType};

/// Checks that each configured region's page carries the content the region expects.
///
/// OCR text is not positioned, so the region's page stands in for the region itself:
/// a region with fields has content when any field variant appears on its page, and a
/// region without fields has content when its page holds more than a trivial amount
/// of text.
pub fn roi_signal(page_texts: &[&str], roi: Option<&RoiConfig>) -> SignalResult {
    let Some(config) = roi.filter(|c| !c.regions.is_empty()) else {
        return SignalResult::neutral(SignalType::Roi);
    };

    let mut evidence = Evidence::default();
    let mut with_content = 0usize;

    for region in &config.regions {
        let page_text = (region.page as usize)
            .checked_sub(1)
            .and_then(|idx| page_texts.get(idx))
            .copied()
            .unwrap_or("");
        let label = format!("{}@p{}", region.name, region.page);

        let has_content = match region.fields.as_deref() {
            Some(fields) if !fields.is_empty() => {
                let normalized = normalize_text(page_text);
                fields.iter().any(|field| {
                    field_variants(field)
                        .iter()
                        .any(|variant| contains_phrase(&normalized, variant))
                })
            }
            _ => page_text.chars().count() > ROI_MIN_CONTENT_CHARS,
        };

        if has_content {
            with_content += 1;
            evidence.matched.push(label);
        } else {
            evidence.missing.push(label);
        }
    }

    let total = config.regions.len();
    let score = clamp_score(100.0 * with_content as f64 / total as f64);
    evidence = evidence
        .detail("regionsWithContent", with_content)
        .detail("totalRegions", total);

    SignalResult::new(SignalType::Roi, score, evidence)
}
