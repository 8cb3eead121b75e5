use std::time::Instant;

use tracing::{info, warn};

use crate::config::SelectorConfig;
use crate::decision::{DecisionPolicy, SelectionDecision, decide};
use crate::document::DocumentContext;
use crate::ranking::{CandidateRanker, ScoringMode};
use crate::template::{TemplateCandidate, TemplateRegistry};
use crate::tokenize::TokenizedDocument;
use crate::trace::TraceBuilder;

use super::types::{SelectionOutcome, SelectionResult};

/// The selection engine: tokenize, rank, decide, trace.
///
/// Holds only immutable configuration, so one instance can be shared across
/// threads and called concurrently.
#[derive(Debug, Clone)]
pub struct TemplateSelector {
    config: SelectorConfig,
    ranker: CandidateRanker,
    policy: DecisionPolicy,
}

impl Default for TemplateSelector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

impl TemplateSelector {
    /// Callers are expected to have run [`SelectorConfig::validate`].
    pub fn new(config: SelectorConfig) -> Self {
        let ranker = config.ranker();
        let policy = config.policy();
        Self {
            config,
            ranker,
            policy,
        }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Selects against the registry's active templates.
    pub fn select<R>(&self, ctx: &DocumentContext, registry: &R) -> SelectionOutcome
    where
        R: TemplateRegistry + ?Sized,
    {
        self.select_with(ctx, registry, TraceBuilder::new())
    }

    /// Like [`TemplateSelector::select`], with a caller-prepared trace builder
    /// (pinned trace id or timestamp for replays).
    pub fn select_with<R>(
        &self,
        ctx: &DocumentContext,
        registry: &R,
        trace: TraceBuilder,
    ) -> SelectionOutcome
    where
        R: TemplateRegistry + ?Sized,
    {
        let started = Instant::now();
        let templates = registry.list_active_templates();
        let explicit = ctx.explicit_id();

        if let Some(id) = explicit {
            if !templates.iter().any(|t| t.answers_to(id)) {
                match registry.find_version(id) {
                    Some(inactive) => warn!(
                        explicit_template_id = id,
                        template_slug = %inactive.template_slug,
                        version_id = %inactive.version_id,
                        "Explicit template is not active"
                    ),
                    None => warn!(explicit_template_id = id, "Explicit template is unknown"),
                }
            }
        }

        self.run(ctx, &templates, trace, started)
    }

    /// Selects from an explicit slice of active templates.
    pub fn select_from(
        &self,
        ctx: &DocumentContext,
        templates: &[TemplateCandidate],
    ) -> SelectionOutcome {
        self.run(ctx, templates, TraceBuilder::new(), Instant::now())
    }

    fn run(
        &self,
        ctx: &DocumentContext,
        templates: &[TemplateCandidate],
        trace: TraceBuilder,
        started: Instant,
    ) -> SelectionOutcome {
        let explicit = ctx.explicit_id();
        let doc = TokenizedDocument::new(&ctx.document_text);

        let candidates = self.ranker.rank(ctx, &doc, templates);
        let decision = decide(&candidates, explicit, &self.policy);

        let weights = self.ranker.effective_weights();
        let weights_version = match self.ranker.mode() {
            ScoringMode::MultiSignal => Some(weights.version.clone()),
            ScoringMode::Legacy => None,
        };
        let result = SelectionResult::from_decision(&decision, candidates.clone(), weights_version);

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let trace = trace
            .input(&ctx.document_text)
            .explicit_template_id(explicit)
            .duration_ms(duration_ms)
            .scoring(self.ranker.mode(), weights)
            .build(candidates, decision.clone());

        log_decision(&decision, &result, duration_ms);

        SelectionOutcome {
            result,
            decision,
            trace,
        }
    }
}

fn log_decision(decision: &SelectionDecision, result: &SelectionResult, duration_ms: u64) {
    info!(
        decision = decision.kind(),
        template_id = result.template_id.as_deref().unwrap_or("-"),
        top_score = result.top_score,
        score_gap = ?result.score_gap,
        confidence = %result.confidence_band,
        reason_code = ?result.reason_code,
        candidates = result.candidates.len(),
        duration_ms,
        "Template selection decided"
    );
}
