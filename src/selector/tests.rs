use chrono::DateTime;

use super::*;
use crate::config::SelectorConfig;
use crate::decision::{ConfidenceBand, FIX_UNKNOWN_TEMPLATE, LowConfidenceAction, ReasonCode, SelectionDecision};
use crate::document::DocumentContext;
use crate::ranking::ScoringMode;
use crate::template::{InMemoryRegistry, SelectionConfig, TemplateCandidate};
use crate::trace::TraceBuilder;

const JOB_SHEET_TEXT: &str = "JOB SHEET\nJob Reference: JOB-123456\nWork carried out: boiler repair";

fn job_sheet() -> TemplateCandidate {
    TemplateCandidate::new(
        "tpl-job-sheet",
        "ver-job-sheet-2",
        "job-sheet",
        SelectionConfig::new()
            .require_all(["job", "sheet"])
            .require_any(["repair", "maintenance"]),
    )
}

fn invoice() -> TemplateCandidate {
    TemplateCandidate::new(
        "tpl-invoice",
        "ver-invoice-1",
        "invoice",
        SelectionConfig::new().require_all(["invoice", "total"]),
    )
}

#[test]
fn test_selector_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TemplateSelector>();
    assert_send_sync::<SelectionOutcome>();
}

#[test]
fn test_high_confidence_result_is_selected() {
    let selector = TemplateSelector::default();
    let outcome = selector.select_from(&DocumentContext::new(JOB_SHEET_TEXT), &[invoice(), job_sheet()]);
    let result = &outcome.result;

    assert!(result.selected);
    assert!(result.auto_processing_allowed);
    assert!(result.block_reason.is_none());
    assert!(result.reason_code.is_none());
    assert_eq!(result.template_id.as_deref(), Some("tpl-job-sheet"));
    assert_eq!(result.version_id.as_deref(), Some("ver-job-sheet-2"));
    assert_eq!(result.template_slug.as_deref(), Some("job-sheet"));
    assert_eq!(result.confidence_band, ConfidenceBand::High);
    assert_eq!(result.top_score, 83);
    assert_eq!(result.runner_up_score, Some(0));
    assert_eq!(result.score_gap, Some(83));
    assert_eq!(result.matched_tokens, vec!["job", "sheet", "repair"]);
    assert!(result.weights_version.is_none());
    assert!(outcome.decision.is_auto_select());
}

#[test]
fn test_result_and_trace_share_decision() {
    let outcome = TemplateSelector::default()
        .select_from(&DocumentContext::new("completely unrelated"), &[job_sheet()]);

    assert_eq!(outcome.trace.decision, outcome.decision);
    assert_eq!(outcome.result.reason_code, outcome.decision.reason_code());
    assert_eq!(outcome.result.block_reason, outcome.decision.block_reason());
    assert_eq!(outcome.trace.candidates, outcome.result.candidates);
}

#[test]
fn test_low_confidence_is_reviewable() {
    let outcome = TemplateSelector::default()
        .select_from(&DocumentContext::new("completely unrelated"), &[job_sheet()]);

    assert!(!outcome.result.selected);
    assert!(outcome.result.is_blocked());
    assert_eq!(outcome.result.review_reason(), Some(ReasonCode::LowConfidence));
    assert!(
        outcome
            .result
            .block_reason
            .as_deref()
            .is_some_and(|r| r.starts_with("LOW_CONFIDENCE: cannot auto-select"))
    );
}

#[test]
fn test_low_confidence_hard_stop_is_not_reviewable() {
    let selector = TemplateSelector::new(SelectorConfig {
        low_confidence_action: LowConfidenceAction::HardStop,
        ..Default::default()
    });
    let outcome = selector.select_from(&DocumentContext::new("completely unrelated"), &[job_sheet()]);

    assert!(outcome.decision.is_hard_stop());
    assert_eq!(outcome.result.reason_code, Some(ReasonCode::PipelineError));
    assert_eq!(outcome.result.review_reason(), None);
}

#[test]
fn test_no_templates_is_hard_stop_with_trace() {
    let outcome = TemplateSelector::default().select_from(&DocumentContext::new(JOB_SHEET_TEXT), &[]);

    assert!(outcome.decision.is_hard_stop());
    assert_eq!(outcome.result.top_score, 0);
    assert_eq!(outcome.result.confidence_band, ConfidenceBand::Low);
    assert!(outcome.result.candidates.is_empty());
    assert!(outcome.trace.top_candidate.is_none());
}

#[test]
fn test_explicit_override_reports_chosen_candidate() {
    let ctx = DocumentContext::new(JOB_SHEET_TEXT).with_explicit_template("tpl-invoice");
    let outcome = TemplateSelector::default().select_from(&ctx, &[job_sheet(), invoice()]);
    let result = &outcome.result;

    assert!(result.selected);
    assert_eq!(result.template_id.as_deref(), Some("tpl-invoice"));
    assert_eq!(result.template_slug.as_deref(), Some("invoice"));
    assert_eq!(result.confidence_band, ConfidenceBand::Low);
    assert_eq!(result.top_score, 83);
    assert_eq!(outcome.decision.reason(), "explicit templateId provided");
    assert_eq!(
        outcome.trace.explicit_template_id.as_deref(),
        Some("tpl-invoice")
    );
}

#[test]
fn test_explicit_override_with_shared_version_id() {
    let sheet = TemplateCandidate::new(
        "tpl-a",
        "v1",
        "a-sheet",
        SelectionConfig::new().require_all(["job", "sheet"]),
    );
    let other = TemplateCandidate::new(
        "tpl-b",
        "v1",
        "b-invoice",
        SelectionConfig::new().require_all(["invoice", "total"]),
    );
    let ctx = DocumentContext::new(JOB_SHEET_TEXT).with_explicit_template("tpl-b");
    let outcome = TemplateSelector::default().select_from(&ctx, &[sheet, other]);
    let result = &outcome.result;

    assert_eq!(result.candidates[0].template_slug, "a-sheet");
    assert_eq!(result.template_id.as_deref(), Some("tpl-b"));
    assert_eq!(result.template_slug.as_deref(), Some("b-invoice"));
    assert_eq!(result.confidence_band, ConfidenceBand::Low);
    assert!(result.matched_tokens.is_empty());
}

#[test]
fn test_blank_explicit_id_is_ignored() {
    let ctx = DocumentContext::new(JOB_SHEET_TEXT).with_explicit_template("   ");
    let outcome = TemplateSelector::default().select_from(&ctx, &[job_sheet()]);

    assert!(outcome.result.selected);
    assert!(outcome.trace.explicit_template_id.is_none());
    assert!(outcome.decision.reason().starts_with("high confidence"));
}

#[test]
fn test_explicit_inactive_version_is_hard_stop() {
    let old = TemplateCandidate::new(
        "tpl-job-sheet",
        "ver-job-sheet-1",
        "job-sheet",
        SelectionConfig::new().require_all(["job"]),
    );
    let registry = InMemoryRegistry::new(vec![job_sheet()])
        .and_then(|r| r.with_inactive(old))
        .expect("valid registry");

    let ctx = DocumentContext::new(JOB_SHEET_TEXT).with_explicit_template("ver-job-sheet-1");
    let outcome = TemplateSelector::default().select(&ctx, &registry);

    match &outcome.decision {
        SelectionDecision::HardStop { fix_path, reason, .. } => {
            assert_eq!(fix_path, FIX_UNKNOWN_TEMPLATE);
            assert!(reason.contains("ver-job-sheet-1"));
        }
        other => panic!("expected hard stop, got {other}"),
    }
    assert_eq!(outcome.result.candidates.len(), 1);
}

#[test]
fn test_multi_signal_records_weights_version() {
    let selector = TemplateSelector::new(SelectorConfig {
        scoring_mode: ScoringMode::MultiSignal,
        ..Default::default()
    });
    let outcome = selector.select_from(&DocumentContext::new(JOB_SHEET_TEXT), &[job_sheet()]);

    assert_eq!(outcome.result.weights_version.as_deref(), Some("2024-06.1"));
    assert_eq!(outcome.trace.scoring_mode, ScoringMode::MultiSignal);
    assert_eq!(outcome.trace.weights_used.version, "2024-06.1");
    // 63 with no runner-up: MEDIUM, auto-selected
    assert_eq!(outcome.result.top_score, 63);
    assert!(outcome.result.selected);
}

#[test]
fn test_select_with_pinned_trace_is_reproducible() {
    let at = DateTime::from_timestamp(1_718_000_000, 0).expect("valid timestamp");
    let ctx = DocumentContext::new(JOB_SHEET_TEXT);
    let templates = vec![job_sheet(), invoice()];
    let selector = TemplateSelector::default();

    let run = || {
        selector
            .select_with(
                &ctx,
                &templates,
                TraceBuilder::new().trace_id("trace-1").timestamp(at),
            )
            .trace
    };
    let mut first = run();
    let mut second = run();
    first.duration_ms = 0;
    second.duration_ms = 0;

    assert_eq!(
        first.canonical_json().expect("serialize"),
        second.canonical_json().expect("serialize")
    );
}

#[test]
fn test_result_serializes_camel_case() {
    let outcome = TemplateSelector::default()
        .select_from(&DocumentContext::new("completely unrelated"), &[job_sheet()]);
    let json = serde_json::to_value(&outcome.result).expect("serialize");

    assert_eq!(json["autoProcessingAllowed"], false);
    assert_eq!(json["reasonCode"], "LOW_CONFIDENCE");
    assert_eq!(json["confidenceBand"], "LOW");
    assert!(json.get("scoreGap").is_none());
    assert!(json.get("templateId").is_none());
}
