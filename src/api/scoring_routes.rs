//! Lead scoring, agent guidance and audio briefing endpoints.

use axum::{extract::State, response::Json};
use serde::Serialize;

use super::{ApiError, ApiState, PersonRequest};
use crate::assessment::LeadAssessment;
use crate::channels::AgentBriefing;
use crate::guidance::{ClientScript, GuidanceKey};
use crate::priority::PriorityTier;
use crate::scoring::ScoreBreakdown;
use crate::signals::PersonSignals;
use crate::triggers::{Trigger, TriggerSet};

const BRIEFING_NOTE: &str = "Listened to Audio Lead Review";

// ============================================================================
// RESPONSE TYPES
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResponse {
    pub person_id: String,
    pub score: u32,
    pub priority: PriorityTier,
    pub triggers: TriggerSet,
    pub breakdown: ScoreBreakdown,
    pub raw_data: PersonSignals,
}

/// Agent panel payload. `whyNow` is agent-only context.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceResponse {
    pub person_id: String,
    pub priority: PriorityTier,
    pub primary_trigger: GuidanceKey,
    /// Display labels for every active trigger, in primacy order.
    pub trigger_labels: Vec<String>,
    pub why_now: &'static str,
    pub action: &'static str,
    pub script: ClientScript,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefingResponse {
    pub person_id: String,
    #[serde(flatten)]
    pub briefing: AgentBriefing,
    pub momentum: u32,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// POST /api/behavioral-scoring
pub async fn behavioral_scoring(
    State(state): State<ApiState>,
    Json(request): Json<PersonRequest>,
) -> Result<Json<ScoringResponse>, ApiError> {
    let person_id = request.require_person_id()?;
    let signals = load_signals(&state, &person_id, "Failed to calculate behavioral score").await?;
    let assessment = LeadAssessment::evaluate(&signals.bundle);

    tracing::info!(
        person_id = %person_id,
        score = assessment.score.score,
        priority = %assessment.priority,
        triggers = assessment.triggers.len(),
        "lead scored"
    );

    Ok(Json(ScoringResponse {
        person_id,
        score: assessment.score.score,
        priority: assessment.priority,
        triggers: assessment.triggers,
        breakdown: assessment.score.breakdown,
        raw_data: signals,
    }))
}

/// POST /api/agent-guidance
pub async fn agent_guidance(
    State(state): State<ApiState>,
    Json(request): Json<PersonRequest>,
) -> Result<Json<GuidanceResponse>, ApiError> {
    let person_id = request.require_person_id()?;
    let signals = load_signals(&state, &person_id, "Failed to build agent guidance").await?;
    let assessment = LeadAssessment::evaluate(&signals.bundle);
    let entry = assessment.guidance();

    Ok(Json(GuidanceResponse {
        person_id,
        priority: assessment.priority,
        primary_trigger: entry.key,
        trigger_labels: assessment.triggers.iter().map(Trigger::label).collect(),
        why_now: entry.rationale,
        action: entry.action,
        script: entry.script,
    }))
}

/// POST /api/briefing
///
/// Counts toward today's momentum. The CRM note is best effort.
pub async fn briefing(
    State(state): State<ApiState>,
    Json(request): Json<PersonRequest>,
) -> Result<Json<BriefingResponse>, ApiError> {
    let person_id = request.require_person_id()?;
    let signals = load_signals(&state, &person_id, "Failed to build briefing").await?;
    let assessment = LeadAssessment::evaluate(&signals.bundle);
    let briefing = AgentBriefing::compose(assessment.guidance());

    if let Ok(numeric_id) = person_id.parse::<u64>() {
        if let Err(e) = state.notes.create_note(numeric_id, BRIEFING_NOTE).await {
            tracing::warn!(person_id = %person_id, error = %e, "briefing note not logged");
        }
    }
    let momentum = state.momentum.increment();

    Ok(Json(BriefingResponse {
        person_id,
        briefing,
        momentum: momentum.count,
    }))
}

async fn load_signals(
    state: &ApiState,
    person_id: &str,
    context: &'static str,
) -> Result<PersonSignals, ApiError> {
    let record = state
        .people
        .fetch_person(person_id)
        .await
        .map_err(|e| ApiError::upstream(context, e))?;
    Ok(PersonSignals::from_record(&record))
}
