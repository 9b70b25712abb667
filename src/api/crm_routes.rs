//! CRM write-back endpoints and the agent momentum counter.

use axum::{extract::State, response::Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{non_empty, normalize_person_id, ApiError, ApiState};
use crate::momentum::MomentumRecord;
use crate::providers::CmaSyncUpdate;
use crate::signals::lenient_timestamp;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FubSyncRequest {
    #[serde(default)]
    pub person_id: Option<Value>,
    #[serde(default)]
    pub cma_url: Option<String>,
    #[serde(default)]
    pub cma_generated_date: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FubSyncResponse {
    pub success: bool,
    pub person_id: String,
    pub fields_updated: Vec<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogActionRequest {
    #[serde(default)]
    pub person_id: Option<Value>,
    #[serde(default)]
    pub note_body: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogActionResponse {
    pub success: bool,
    pub note_id: Option<Value>,
    pub message: &'static str,
    pub momentum: u32,
}

/// POST /api/fub-sync
pub async fn fub_sync(
    State(state): State<ApiState>,
    Json(request): Json<FubSyncRequest>,
) -> Result<Json<FubSyncResponse>, ApiError> {
    let person_id = normalize_person_id(request.person_id.as_ref())
        .ok_or_else(|| ApiError::InvalidRequest("personId required".to_string()))?;

    let now = Utc::now();
    let update = CmaSyncUpdate {
        cma_requested_at: lenient_timestamp(request.cma_generated_date.as_ref()).unwrap_or(now),
        synced_at: now,
    };

    state
        .crm
        .update_person(&person_id, &update.fields())
        .await
        .map_err(|e| ApiError::upstream("Failed to sync CMA data to FUB", e))?;

    tracing::info!(
        person_id = %person_id,
        cma_url = request.cma_url.as_deref().unwrap_or("-"),
        "CMA activity synced"
    );

    Ok(Json(FubSyncResponse {
        success: true,
        person_id,
        fields_updated: CmaSyncUpdate::FIELD_NAMES.to_vec(),
    }))
}

/// POST /api/log-action
pub async fn log_action(
    State(state): State<ApiState>,
    Json(request): Json<LogActionRequest>,
) -> Result<Json<LogActionResponse>, ApiError> {
    let missing = || ApiError::InvalidRequest("personId and noteBody required".to_string());
    let person_id = normalize_person_id(request.person_id.as_ref()).ok_or_else(missing)?;
    let note_body = non_empty(request.note_body.as_deref()).ok_or_else(missing)?;
    let numeric_id = person_id
        .parse::<u64>()
        .map_err(|_| ApiError::InvalidRequest("personId must be numeric".to_string()))?;

    let receipt = state
        .notes
        .create_note(numeric_id, note_body)
        .await
        .map_err(|e| ApiError::upstream("Failed to log action", e))?;
    let momentum = state.momentum.increment();

    tracing::info!(person_id = numeric_id, momentum = momentum.count, "action logged");

    Ok(Json(LogActionResponse {
        success: true,
        note_id: receipt.note_id,
        message: "Note logged successfully",
        momentum: momentum.count,
    }))
}

/// GET /api/momentum
pub async fn momentum(State(state): State<ApiState>) -> Json<MomentumRecord> {
    Json(state.momentum.current())
}
