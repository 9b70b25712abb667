//! Behavioral score engine
//!
//! Weighted blend of four signal sources, each capped at 100 before
//! weighting:
//!
//! | Source   | Raw input                          | Weight |
//! |----------|------------------------------------|--------|
//! | Fello    | lead score                         | 0.35   |
//! | CloudCMA | CMA requests x 20                  | 0.25   |
//! | Willow   | email clicks x 5                   | 0.25   |
//! | Sierra   | property views x 2 + saved x 5     | 0.15   |
//!
//! The total is rounded once from the unrounded sum. The breakdown rounds
//! each component on its own, so the breakdown can sum to a value one or two
//! points away from the total. Display consumers rely on that behavior; do
//! not derive the breakdown from the rounded total.

use serde::{Deserialize, Serialize};

use crate::signals::SignalBundle;

pub const FELLO_WEIGHT: f64 = 0.35;
pub const CLOUD_CMA_WEIGHT: f64 = 0.25;
pub const WILLOW_WEIGHT: f64 = 0.25;
pub const SIERRA_WEIGHT: f64 = 0.15;

const COMPONENT_CAP: f64 = 100.0;
const CMA_REQUEST_POINTS: f64 = 20.0;
const EMAIL_CLICK_POINTS: f64 = 5.0;
const PROPERTY_VIEW_POINTS: f64 = 2.0;
const SAVED_LISTING_POINTS: f64 = 5.0;

/// Unrounded weighted contribution of each source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComponentScores {
    pub fello: f64,
    pub cloud_cma: f64,
    pub willow: f64,
    pub sierra: f64,
}

impl ComponentScores {
    pub fn total(&self) -> f64 {
        self.fello + self.cloud_cma + self.willow + self.sierra
    }

    /// Round each component independently for display.
    pub fn rounded(&self) -> ScoreBreakdown {
        ScoreBreakdown {
            fello: round_points(self.fello),
            cloud_cma: round_points(self.cloud_cma),
            willow: round_points(self.willow),
            sierra: round_points(self.sierra),
        }
    }
}

/// Per-source contribution as shown to agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub fello: u32,
    pub cloud_cma: u32,
    pub willow: u32,
    pub sierra: u32,
}

impl ScoreBreakdown {
    pub fn sum(&self) -> u32 {
        self.fello + self.cloud_cma + self.willow + self.sierra
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    /// Rounded total in `[0, 100]`.
    pub score: u32,
    pub breakdown: ScoreBreakdown,
    pub components: ComponentScores,
}

/// Stateless engine; kept as a type so callers can hold it behind a seam.
#[derive(Debug, Clone, Copy, Default)]
pub struct BehavioralScoreEngine;

impl BehavioralScoreEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn compute_score(&self, bundle: &SignalBundle) -> ScoreResult {
        let components = Self::components(bundle);
        ScoreResult {
            score: round_points(components.total()).min(100),
            breakdown: components.rounded(),
            components,
        }
    }

    pub fn components(bundle: &SignalBundle) -> ComponentScores {
        let fello = capped(f64::from(bundle.fello_score));
        let cloud_cma = capped(f64::from(bundle.cloud_cma_request_count) * CMA_REQUEST_POINTS);
        let willow = capped(f64::from(bundle.fello_email_clicks) * EMAIL_CLICK_POINTS);
        let sierra = capped(
            f64::from(bundle.sierra_property_views) * PROPERTY_VIEW_POINTS
                + f64::from(bundle.sierra_saved_listings) * SAVED_LISTING_POINTS,
        );

        ComponentScores {
            fello: fello * FELLO_WEIGHT,
            cloud_cma: cloud_cma * CLOUD_CMA_WEIGHT,
            willow: willow * WILLOW_WEIGHT,
            sierra: sierra * SIERRA_WEIGHT,
        }
    }
}

/// Convenience wrapper around [`BehavioralScoreEngine::compute_score`].
pub fn compute_score(bundle: &SignalBundle) -> ScoreResult {
    BehavioralScoreEngine.compute_score(bundle)
}

fn capped(points: f64) -> f64 {
    points.clamp(0.0, COMPONENT_CAP)
}

// Half-up rounding; inputs are never negative.
fn round_points(value: f64) -> u32 {
    value.max(0.0).round() as u32
}
