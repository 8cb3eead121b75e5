use tracing::debug;

use crate::constants::{
    ASSET_TYPE_MATCH_BOOST, CLIENT_MATCH_BOOST, MAX_SCORE, WORK_TYPE_MATCH_BOOST,
};
use crate::decision::{ConfidenceBand, Thresholds};
use crate::document::{DocumentContext, MatchingMetadata};
use crate::signals::{
    SignalResult, VersionedWeights, WeightOverrides, combine_signals, layout_signal,
    plausibility_signal, roi_signal, token_signal,
};
use crate::template::TemplateCandidate;
use crate::tokenize::TokenizedDocument;

use super::types::{Candidate, ScoringMode};

/// Scores every supplied template version against one document and sorts them.
#[derive(Debug, Clone)]
pub struct CandidateRanker {
    mode: ScoringMode,
    thresholds: Thresholds,
    weights: VersionedWeights,
    overrides: Option<WeightOverrides>,
}

impl Default for CandidateRanker {
    fn default() -> Self {
        Self::new(ScoringMode::Legacy)
    }
}

impl CandidateRanker {
    pub fn new(mode: ScoringMode) -> Self {
        Self {
            mode,
            thresholds: Thresholds::default(),
            weights: VersionedWeights::default(),
            overrides: None,
        }
    }

    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn weights(mut self, weights: VersionedWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn overrides(mut self, overrides: WeightOverrides) -> Self {
        self.overrides = (!overrides.is_empty()).then_some(overrides);
        self
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    /// Weights after overrides, as recorded with every multi-signal score.
    pub fn effective_weights(&self) -> VersionedWeights {
        match &self.overrides {
            Some(o) => self.weights.with_overrides(o),
            None => self.weights.clone(),
        }
    }

    /// Returns candidates in ranking order (see [`Candidate::rank_cmp`]).
    pub fn rank(
        &self,
        ctx: &DocumentContext,
        doc: &TokenizedDocument,
        templates: &[TemplateCandidate],
    ) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = templates
            .iter()
            .map(|template| self.score_template(ctx, doc, template))
            .collect();

        sort_candidates(&mut candidates);
        candidates
    }

    pub fn score_template(
        &self,
        ctx: &DocumentContext,
        doc: &TokenizedDocument,
        template: &TemplateCandidate,
    ) -> Candidate {
        let token = token_signal(doc, &template.selection_config);
        let matched_tokens = token.evidence.matched.clone();
        let missing_required = token.evidence.missing.clone();

        let (score, boosts, signals) = match self.mode {
            ScoringMode::Legacy => {
                let (score, boosts) =
                    apply_metadata_boost(token.score, template, ctx.matching_metadata.as_ref());
                (score, boosts, None)
            }
            ScoringMode::MultiSignal => {
                let combined = self.combine_for(ctx, template, token);
                (combined.combined_score, Vec::new(), Some(combined))
            }
        };

        let confidence = ConfidenceBand::from_score(score, &self.thresholds);

        debug!(
            template_slug = %template.template_slug,
            score,
            confidence = %confidence,
            mode = %self.mode,
            "Scored candidate"
        );

        Candidate {
            template_id: template.template_id.clone(),
            version_id: template.version_id.clone(),
            template_slug: template.template_slug.clone(),
            score,
            matched_tokens,
            missing_required,
            confidence,
            boosts,
            signals,
        }
    }

    fn combine_for(
        &self,
        ctx: &DocumentContext,
        template: &TemplateCandidate,
        token: SignalResult,
    ) -> crate::signals::MultiSignalResult {
        let pages = ctx.pages();
        let signals = [
            token,
            layout_signal(ctx.metadata.as_ref(), template.layout_expectations.as_ref()),
            roi_signal(&pages, template.roi_config.as_ref()),
            plausibility_signal(&ctx.document_text, &template.field_expectations),
        ];

        combine_signals(&signals, &self.weights, self.overrides.as_ref())
    }
}

/// Sorts in place into ranking order.
pub fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(Candidate::rank_cmp);
}

/// Legacy-mode boosts for templates that share the job's client, asset type or work
/// type. Each boost is clamped to the maximum on its own.
///
/// A candidate whose token score is 0 is left alone: metadata can favour a
/// plausible template but must not rescue one whose required tokens failed.
pub fn apply_metadata_boost(
    score: u32,
    template: &TemplateCandidate,
    matching: Option<&MatchingMetadata>,
) -> (u32, Vec<String>) {
    let Some(matching) = matching else {
        return (score, Vec::new());
    };
    if score == 0 {
        return (score, Vec::new());
    }

    let checks = [
        (
            "client",
            matching.client.as_deref(),
            template.client.as_deref(),
            CLIENT_MATCH_BOOST,
        ),
        (
            "assetType",
            matching.asset_type.as_deref(),
            template.asset_type.as_deref(),
            ASSET_TYPE_MATCH_BOOST,
        ),
        (
            "workType",
            matching.work_type.as_deref(),
            template.work_type.as_deref(),
            WORK_TYPE_MATCH_BOOST,
        ),
    ];

    let mut boosted = score;
    let mut boosts = Vec::new();
    for (label, wanted, offered, points) in checks {
        if let (Some(wanted), Some(offered)) = (wanted, offered) {
            if same_attribute(wanted, offered) {
                boosted = (boosted + points).min(MAX_SCORE);
                boosts.push(format!("{label}+{points}"));
            }
        }
    }

    (boosted, boosts)
}

fn same_attribute(a: &str, b: &str) -> bool {
    let a = a.trim();
    !a.is_empty() && a.eq_ignore_ascii_case(b.trim())
}
