use crate::constants::{
    LAYOUT_FORM_TYPE_ADJUSTMENT, LAYOUT_PAGE_ADJUSTMENT, LAYOUT_SECTION_MAX_BONUS, NEUTRAL_SCORE,
    clamp_score,
};
use crate::document::DocumentMetadata;
use crate::template::LayoutExpectations;

use super::types::{Evidence, SignalResult, SignalType};

/// Compares document shape (page count, sections, form type) with a template's
/// expectations, starting from the neutral score.
pub fn layout_signal(
    metadata: Option<&DocumentMetadata>,
    expectations: Option<&LayoutExpectations>,
) -> SignalResult {
    let Some(expected) = expectations else {
        return SignalResult::neutral(SignalType::Layout);
    };

    let mut score = NEUTRAL_SCORE as f64;
    let mut evidence = Evidence::default();

    if expected.min_pages.is_some() || expected.max_pages.is_some() {
        if let Some(meta) = metadata {
            let min = expected.min_pages.unwrap_or(0);
            let max = expected.max_pages.unwrap_or(u32::MAX);
            let label = format!("pageCount={}", meta.page_count);
            if (min..=max).contains(&meta.page_count) {
                score += LAYOUT_PAGE_ADJUSTMENT as f64;
                evidence.matched.push(label);
            } else {
                score -= LAYOUT_PAGE_ADJUSTMENT as f64;
                evidence.missing.push(label);
            }
        }
    }

    if let Some(sections) = expected.expected_sections.as_ref().filter(|s| !s.is_empty()) {
        let detected: Vec<String> = metadata
            .and_then(|m| m.detected_sections.as_ref())
            .map(|s| s.iter().map(|d| d.trim().to_lowercase()).collect())
            .unwrap_or_default();

        let mut found = 0usize;
        for section in sections {
            if detected.contains(&section.trim().to_lowercase()) {
                found += 1;
                evidence.matched.push(format!("section:{section}"));
            } else {
                evidence.missing.push(format!("section:{section}"));
            }
        }

        let fraction = found as f64 / sections.len() as f64;
        score += LAYOUT_SECTION_MAX_BONUS * fraction;
        evidence = evidence.detail("sectionCoverage", fraction);
    }

    if let (Some(expected_type), Some(actual)) =
        (expected.form_type, metadata.and_then(|m| m.form_type))
    {
        let label = format!("formType={}", actual.as_str());
        if expected_type == actual {
            score += LAYOUT_FORM_TYPE_ADJUSTMENT as f64;
            evidence.matched.push(label);
        } else {
            score -= LAYOUT_FORM_TYPE_ADJUSTMENT as f64;
            evidence.missing.push(label);
        }
    }

    SignalResult::new(SignalType::Layout, clamp_score(score), evidence)
}
