//! Merged lead assessment: score, tier and triggers computed side by side
//! over one signal bundle.

use crate::guidance::{map_guidance, GuidanceEntry};
use crate::priority::{classify, PriorityTier};
use crate::scoring::{compute_score, ScoreResult};
use crate::signals::SignalBundle;
use crate::triggers::{detect_triggers, TriggerSet};

#[derive(Debug, Clone, PartialEq)]
pub struct LeadAssessment {
    pub score: ScoreResult,
    pub priority: PriorityTier,
    pub triggers: TriggerSet,
}

impl LeadAssessment {
    pub fn evaluate(bundle: &SignalBundle) -> Self {
        let score = compute_score(bundle);
        let priority = classify(i64::from(score.score));
        let triggers = detect_triggers(bundle);
        Self {
            score,
            priority,
            triggers,
        }
    }

    pub fn guidance(&self) -> &'static GuidanceEntry {
        map_guidance(&self.triggers)
    }
}
