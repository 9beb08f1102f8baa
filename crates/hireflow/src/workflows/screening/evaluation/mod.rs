mod adjustment;
mod feedback;
mod rules;

pub use adjustment::{
    resume_seed, AdjustmentSource, SeededAdjustment, ADJUSTMENT_MAX, ADJUSTMENT_MIN,
};
pub use feedback::NOMINAL_MAX_SCORE;

use std::sync::Arc;

use super::domain::{AnalysisResult, JobRequirement, ScoreContribution, ScoreRule};

/// Fixed acceptance cutoff.
pub const SELECTION_THRESHOLD: i32 = 8;

/// Keyword scorer. Stateless apart from the adjustment source, so one engine
/// is shared by every session.
#[derive(Clone)]
pub struct ScoringEngine {
    adjustment: Arc<dyn AdjustmentSource>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(Arc::new(SeededAdjustment))
    }
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine").finish_non_exhaustive()
    }
}

impl ScoringEngine {
    pub fn new(adjustment: Arc<dyn AdjustmentSource>) -> Self {
        Self { adjustment }
    }

    /// Scores `resume_text` for `role`. The requirement is accepted so callers
    /// prove the role exists; the keyword table does not read its content.
    pub fn analyze(
        &self,
        resume_text: &str,
        _requirement: &JobRequirement,
        role: &str,
    ) -> AnalysisResult {
        let base = rules::score_text(resume_text);
        let adjustment = self.adjustment.adjustment(resume_seed(resume_text));

        let score = base.total + adjustment;
        let is_selected = score >= SELECTION_THRESHOLD;

        let mut breakdown = base.contributions;
        if adjustment != 0 {
            breakdown.push(ScoreContribution {
                rule: ScoreRule::Adjustment,
                label: "deterministic variance".to_string(),
                points: adjustment,
            });
        }

        AnalysisResult {
            role: role.to_string(),
            score,
            is_selected,
            feedback: feedback::render_feedback(is_selected, role, score),
            breakdown,
        }
    }
}

/// Inclusive range of scores `analyze` can produce.
pub fn score_bounds() -> (i32, i32) {
    (ADJUSTMENT_MIN, rules::max_base_score() + ADJUSTMENT_MAX)
}
