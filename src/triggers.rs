//! Trigger detection
//!
//! A trigger is a named condition over the signal bundle that gives the agent
//! a reason to re-engage. Several can fire at once. The declaration order of
//! [`Trigger`] is the evaluation order and also the primacy order: the
//! primary trigger of a set is its lowest-ranked member, which is what the
//! guidance table is keyed on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::signals::SignalBundle;

pub const HIGH_FELLO_SCORE_MIN: u32 = 70;
pub const SUSTAINED_EMAIL_CLICKS_MIN: u32 = 5;
pub const MULTI_CMA_REQUESTS_MIN: u32 = 2;
pub const PROPERTY_COLLECTION_SAVED_MIN: u32 = 3;
pub const FORM_SUBMISSIONS_MIN: u32 = 1;

/// Fixed trigger vocabulary. `Ord` follows declaration order, which is the
/// evaluation and primacy order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trigger {
    HighFelloScore,
    SustainedEmailEngagement,
    MultiCmaRequest,
    PropertyCollectionBehavior,
    FormSubmission,
}

impl Trigger {
    pub const EVALUATION_ORDER: [Trigger; 5] = [
        Trigger::HighFelloScore,
        Trigger::SustainedEmailEngagement,
        Trigger::MultiCmaRequest,
        Trigger::PropertyCollectionBehavior,
        Trigger::FormSubmission,
    ];

    /// Position in the primacy order; 0 is the most important.
    pub fn rank(self) -> usize {
        match self {
            Trigger::HighFelloScore => 0,
            Trigger::SustainedEmailEngagement => 1,
            Trigger::MultiCmaRequest => 2,
            Trigger::PropertyCollectionBehavior => 3,
            Trigger::FormSubmission => 4,
        }
    }

    pub fn is_active(self, bundle: &SignalBundle) -> bool {
        match self {
            Trigger::HighFelloScore => bundle.fello_score >= HIGH_FELLO_SCORE_MIN,
            Trigger::SustainedEmailEngagement => {
                bundle.fello_email_clicks >= SUSTAINED_EMAIL_CLICKS_MIN
            }
            Trigger::MultiCmaRequest => bundle.cloud_cma_request_count >= MULTI_CMA_REQUESTS_MIN,
            Trigger::PropertyCollectionBehavior => {
                bundle.sierra_saved_listings >= PROPERTY_COLLECTION_SAVED_MIN
            }
            Trigger::FormSubmission => bundle.fello_form_submissions >= FORM_SUBMISSIONS_MIN,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::HighFelloScore => "HIGH_FELLO_SCORE",
            Trigger::SustainedEmailEngagement => "SUSTAINED_EMAIL_ENGAGEMENT",
            Trigger::MultiCmaRequest => "MULTI_CMA_REQUEST",
            Trigger::PropertyCollectionBehavior => "PROPERTY_COLLECTION_BEHAVIOR",
            Trigger::FormSubmission => "FORM_SUBMISSION",
        }
    }

    /// Human label, e.g. `HIGH_FELLO_SCORE` -> `High Fello Score`.
    pub fn label(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active triggers, always held in primacy order without duplicates.
///
/// Deserialization goes through [`FromIterator`], so incoming lists are
/// reordered and deduplicated as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Trigger>")]
pub struct TriggerSet(Vec<Trigger>);

impl TriggerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most important active trigger, if any.
    pub fn primary(&self) -> Option<Trigger> {
        self.0.iter().copied().min_by_key(|t| t.rank())
    }

    pub fn contains(&self, trigger: Trigger) -> bool {
        self.0.contains(&trigger)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Trigger> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Trigger] {
        &self.0
    }
}

impl From<Vec<Trigger>> for TriggerSet {
    fn from(triggers: Vec<Trigger>) -> Self {
        triggers.into_iter().collect()
    }
}

impl FromIterator<Trigger> for TriggerSet {
    fn from_iter<I: IntoIterator<Item = Trigger>>(iter: I) -> Self {
        let mut triggers: Vec<Trigger> = iter.into_iter().collect();
        triggers.sort_by_key(|t| t.rank());
        triggers.dedup();
        Self(triggers)
    }
}

/// Evaluate every trigger against the bundle in evaluation order.
pub fn detect_triggers(bundle: &SignalBundle) -> TriggerSet {
    Trigger::EVALUATION_ORDER
        .iter()
        .copied()
        .filter(|trigger| trigger.is_active(bundle))
        .collect()
}
