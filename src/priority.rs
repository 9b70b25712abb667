//! Priority tiers derived from the behavioral score.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Urgency classification, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityTier {
    Cold,
    Warm,
    Hot,
    SuperHot,
    Critical,
}

impl PriorityTier {
    /// All tiers in ascending order.
    pub const ALL: [PriorityTier; 5] = [
        PriorityTier::Cold,
        PriorityTier::Warm,
        PriorityTier::Hot,
        PriorityTier::SuperHot,
        PriorityTier::Critical,
    ];

    /// Inclusive lower bound of the tier.
    pub fn min_score(self) -> i64 {
        match self {
            PriorityTier::Cold => 0,
            PriorityTier::Warm => 30,
            PriorityTier::Hot => 45,
            PriorityTier::SuperHot => 60,
            PriorityTier::Critical => 75,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityTier::Cold => "COLD",
            PriorityTier::Warm => "WARM",
            PriorityTier::Hot => "HOT",
            PriorityTier::SuperHot => "SUPER_HOT",
            PriorityTier::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a score. Highest threshold wins; scores outside `[0, 100]`
/// land in the nearest tier.
pub fn classify(score: i64) -> PriorityTier {
    let score = score.clamp(0, 100);
    PriorityTier::ALL
        .iter()
        .rev()
        .copied()
        .find(|tier| score >= tier.min_score())
        .unwrap_or(PriorityTier::Cold)
}
