//! HTTP error mapping
//!
//! Handlers return `Result<Json<T>, ApiError>`; this module turns the error
//! side into `{ "error": ..., "details": ... }` with the matching status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::error::ProviderError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or incomplete request body.
    #[error("{0}")]
    InvalidRequest(String),

    /// A collaborator call failed while serving the request.
    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: ProviderError,
    },
}

impl ApiError {
    pub fn upstream(context: &'static str, source: ProviderError) -> Self {
        Self::Upstream { context, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::InvalidRequest(message) => ErrorResponse {
                error: message,
                details: None,
            },
            Self::Upstream { context, source } => {
                tracing::error!(error = %source, transient = source.is_transient(), "{}", context);
                ErrorResponse {
                    error: context.to_string(),
                    details: Some(source.to_string()),
                }
            }
        };
        (status, Json(body)).into_response()
    }
}
