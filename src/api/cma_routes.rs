//! CMA protocol selection and report generation endpoints.

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{non_empty, normalize_person_id, ApiError, ApiState};
use crate::error::ProviderError;
use crate::property::{PropertyIntelligence, PropertyRecord};
use crate::protocol::{select_or_fallback, CmaDefaults, CmaOverrides, CmaProtocol, CmaRequest};

const NO_RECORD: &str = "No property record found for address";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartDefaultsRequest {
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartDefaultsResponse {
    pub protocol: CmaProtocol,
    pub defaults: CmaDefaults,
    pub property_intelligence: Option<PropertyIntelligence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCmaRequest {
    #[serde(default)]
    pub person_id: Option<Value>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(flatten)]
    pub overrides: CmaOverrides,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCmaResponse {
    pub success: bool,
    pub cma: Value,
    pub person_id: Option<String>,
}

/// POST /api/cma-smart-defaults
///
/// Lookup failures degrade to the FALLBACK protocol; only a missing address
/// is an error.
pub async fn cma_smart_defaults(
    State(state): State<ApiState>,
    Json(request): Json<SmartDefaultsRequest>,
) -> Result<Json<SmartDefaultsResponse>, ApiError> {
    let address = non_empty(request.address.as_deref())
        .ok_or_else(|| ApiError::InvalidRequest("address required".to_string()))?;

    let (record, error) = match lookup_record(&state, address).await {
        Ok(Some(record)) => (Some(record), None),
        Ok(None) => {
            tracing::info!(address, "no property record; using fallback protocol");
            (None, Some(NO_RECORD.to_string()))
        }
        Err(e) => {
            tracing::warn!(address, error = %e, "property lookup failed; using fallback protocol");
            (None, Some(e.to_string()))
        }
    };

    let geo = record.as_ref().map(PropertyRecord::geo);
    let selection = select_or_fallback(geo.as_ref());
    tracing::info!(
        address,
        protocol = %selection.protocol,
        radius = selection.defaults.radius_miles,
        "protocol selected"
    );

    Ok(Json(SmartDefaultsResponse {
        protocol: selection.protocol,
        defaults: selection.defaults,
        property_intelligence: record.as_ref().map(PropertyRecord::intelligence),
        error,
    }))
}

async fn lookup_record(
    state: &ApiState,
    address: &str,
) -> Result<Option<PropertyRecord>, ProviderError> {
    let response = state.properties.lookup_property(address).await?;
    Ok(PropertyRecord::from_lookup(&response))
}

/// POST /api/cloudcma-generate
pub async fn cloudcma_generate(
    State(state): State<ApiState>,
    Json(request): Json<GenerateCmaRequest>,
) -> Result<Json<GenerateCmaResponse>, ApiError> {
    let address = non_empty(request.address.as_deref())
        .ok_or_else(|| ApiError::InvalidRequest("address required".to_string()))?;
    let person_id = normalize_person_id(request.person_id.as_ref());

    let cma_request = CmaRequest::new(address, request.overrides);
    let cma = state
        .cma
        .generate_cma(&cma_request)
        .await
        .map_err(|e| ApiError::upstream("Failed to generate CMA", e))?;

    tracing::info!(
        address,
        person_id = person_id.as_deref().unwrap_or("-"),
        "CMA generated"
    );

    Ok(Json(GenerateCmaResponse {
        success: true,
        cma,
        person_id,
    }))
}
