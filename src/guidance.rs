//! Agent guidance table
//!
//! Maps the primary trigger of a lead to a pre-approved talk track. Each
//! entry has two audiences:
//!
//! - `rationale` and `action` are agent-only. They name the internal signal
//!   ("High Fello Engagement Score") and must never reach a client.
//! - `script` is the only client-safe text. It is wrapped in
//!   [`ClientScript`], which can only be constructed inside this module, and
//!   the client-visible renderers in [`crate::channels`] accept nothing else.
//!   Script text is stored exactly as approved; renderers add the quotes.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::triggers::{Trigger, TriggerSet};

/// Pre-approved text that is safe to show, say, or send to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientScript(&'static str);

impl ClientScript {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ClientScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for ClientScript {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

/// Lookup key: one variant per trigger plus the default for quiet leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuidanceKey {
    Trigger(Trigger),
    Default,
}

impl GuidanceKey {
    pub const ALL: [GuidanceKey; 6] = [
        GuidanceKey::Trigger(Trigger::HighFelloScore),
        GuidanceKey::Trigger(Trigger::SustainedEmailEngagement),
        GuidanceKey::Trigger(Trigger::MultiCmaRequest),
        GuidanceKey::Trigger(Trigger::PropertyCollectionBehavior),
        GuidanceKey::Trigger(Trigger::FormSubmission),
        GuidanceKey::Default,
    ];

    /// Key for the primary trigger of the set, or `Default` when empty.
    pub fn for_triggers(triggers: &TriggerSet) -> Self {
        triggers
            .primary()
            .map(GuidanceKey::Trigger)
            .unwrap_or(GuidanceKey::Default)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GuidanceKey::Trigger(trigger) => trigger.as_str(),
            GuidanceKey::Default => "DEFAULT",
        }
    }
}

impl Serialize for GuidanceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One row of the guidance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceEntry {
    pub key: GuidanceKey,
    /// Why the lead surfaced. Agent-only.
    #[serde(rename = "whyNow")]
    pub rationale: &'static str,
    /// Suggested channel. Agent-only.
    pub action: &'static str,
    pub script: ClientScript,
}

const HIGH_FELLO_SCORE: GuidanceEntry = GuidanceEntry {
    key: GuidanceKey::Trigger(Trigger::HighFelloScore),
    rationale: "High Fello Engagement Score",
    action: "Call Now",
    script: ClientScript(
        "I noticed your property is in a high-demand zone this week. We’re seeing a shift in buyer activity—wanted to share those insights.",
    ),
};

const SUSTAINED_EMAIL_ENGAGEMENT: GuidanceEntry = GuidanceEntry {
    key: GuidanceKey::Trigger(Trigger::SustainedEmailEngagement),
    rationale: "Sustained Email Interest",
    action: "Personal Email",
    script: ClientScript(
        "You’ve been receiving our market updates. I’m curating a specific report on [Neighborhood Name] trends—would that be valuable to you?",
    ),
};

const MULTI_CMA_REQUEST: GuidanceEntry = GuidanceEntry {
    key: GuidanceKey::Trigger(Trigger::MultiCmaRequest),
    rationale: "Multiple Valuation Requests",
    action: "Call Now",
    script: ClientScript(
        "I see you’re keeping a close eye on your home’s value. The automated models vary wildly—I’d like to manually adjust it for you.",
    ),
};

const PROPERTY_COLLECTION_BEHAVIOR: GuidanceEntry = GuidanceEntry {
    key: GuidanceKey::Trigger(Trigger::PropertyCollectionBehavior),
    rationale: "Saving Multiple Similar Listings",
    action: "Text Message",
    script: ClientScript(
        "Noticing market activity in [Area]. Are you comparing these against your own value, or looking for an investment move?",
    ),
};

const FORM_SUBMISSION: GuidanceEntry = GuidanceEntry {
    key: GuidanceKey::Trigger(Trigger::FormSubmission),
    rationale: "Direct Inquiry / Form Fill",
    action: "Call Immediately",
    script: ClientScript(
        "Received your request regarding [Topic]. I have the file open right now—do you have two minutes to review the details?",
    ),
};

const DEFAULT: GuidanceEntry = GuidanceEntry {
    key: GuidanceKey::Default,
    rationale: "Periodic Review",
    action: "Check In",
    script: ClientScript(
        "Just reviewing my priority client list and wanted to ensure our valuation of your home is still accurate given this months market changes.",
    ),
};

/// Fixed table lookup. Exhaustive over [`Trigger`], so a new trigger does not
/// compile until it has an entry.
pub fn guidance_for(key: GuidanceKey) -> &'static GuidanceEntry {
    match key {
        GuidanceKey::Trigger(Trigger::HighFelloScore) => &HIGH_FELLO_SCORE,
        GuidanceKey::Trigger(Trigger::SustainedEmailEngagement) => &SUSTAINED_EMAIL_ENGAGEMENT,
        GuidanceKey::Trigger(Trigger::MultiCmaRequest) => &MULTI_CMA_REQUEST,
        GuidanceKey::Trigger(Trigger::PropertyCollectionBehavior) => &PROPERTY_COLLECTION_BEHAVIOR,
        GuidanceKey::Trigger(Trigger::FormSubmission) => &FORM_SUBMISSION,
        GuidanceKey::Default => &DEFAULT,
    }
}

/// Guidance for the primary trigger of the set.
pub fn map_guidance(triggers: &TriggerSet) -> &'static GuidanceEntry {
    guidance_for(GuidanceKey::for_triggers(triggers))
}
