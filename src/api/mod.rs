//! REST API module
//!
//! Thin handlers: validate the request, fetch raw data through the provider
//! traits, normalize, run the decision components, serialize. All routes
//! live under `/api` and accept JSON bodies.

pub mod cma_routes;
pub mod crm_routes;
pub mod error;
pub mod scoring_routes;

use std::sync::Arc;

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::error::ProviderError;
use crate::momentum::MomentumCounter;
use crate::providers::{
    AttomClient, CloudCmaClient, CmaGenerator, CrmSync, FubClient, NoteLogger, PersonDataProvider,
    PropertyDataProvider,
};

pub use error::{ApiError, ErrorResponse};

/// Shared handler state: one handle per collaborator plus the momentum counter.
#[derive(Clone)]
pub struct ApiState {
    pub people: Arc<dyn PersonDataProvider>,
    pub properties: Arc<dyn PropertyDataProvider>,
    pub crm: Arc<dyn CrmSync>,
    pub notes: Arc<dyn NoteLogger>,
    pub cma: Arc<dyn CmaGenerator>,
    pub momentum: Arc<MomentumCounter>,
}

impl ApiState {
    /// Wire the real HTTP clients from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let fub = Arc::new(FubClient::new(&config.fub, config.http_timeout)?);
        let attom = Arc::new(AttomClient::new(&config.attom, config.http_timeout)?);
        let cloudcma = Arc::new(CloudCmaClient::new(&config.cloudcma, config.http_timeout)?);

        Ok(Self {
            people: fub.clone(),
            properties: attom,
            crm: fub.clone(),
            notes: fub,
            cma: cloudcma,
            momentum: Arc::new(MomentumCounter::in_memory()),
        })
    }
}

/// Build the full router with CORS and request tracing.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route(
            "/api/behavioral-scoring",
            post(scoring_routes::behavioral_scoring),
        )
        .route("/api/agent-guidance", post(scoring_routes::agent_guidance))
        .route("/api/briefing", post(scoring_routes::briefing))
        .route(
            "/api/cma-smart-defaults",
            post(cma_routes::cma_smart_defaults),
        )
        .route("/api/cloudcma-generate", post(cma_routes::cloudcma_generate))
        .route("/api/fub-sync", post(crm_routes::fub_sync))
        .route("/api/log-action", post(crm_routes::log_action))
        .route("/api/momentum", get(crm_routes::momentum))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Body shared by the person-keyed endpoints. The id may arrive as a JSON
/// number or string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRequest {
    #[serde(default)]
    pub person_id: Option<Value>,
}

impl PersonRequest {
    pub fn require_person_id(&self) -> Result<String, ApiError> {
        normalize_person_id(self.person_id.as_ref())
            .ok_or_else(|| ApiError::InvalidRequest("personId required".to_string()))
    }
}

pub(crate) fn normalize_person_id(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::Number(n) => n
            .as_u64()
            .map(|id| id.to_string())
            .or_else(|| n.as_i64().map(|id| id.to_string()))
            // whole part of a float id, e.g. 999.0 -> "999"
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| (f.trunc() as i64).to_string())
            }),
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        _ => None,
    }
}

pub(crate) fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}
