//! External collaborators
//!
//! The decision components never call these directly. Request handlers
//! fetch raw records through the provider traits, normalize them, run the
//! engine, and hand results to the outbound CRM traits.
//!
//! - [`PersonDataProvider`] / [`CrmSync`] / [`NoteLogger`]: Follow Up Boss
//! - [`PropertyDataProvider`]: ATTOM property API
//! - [`CmaGenerator`]: CloudCMA report drafts

pub mod attom;
pub mod cloudcma;
pub mod fub;

pub use attom::AttomClient;
pub use cloudcma::CloudCmaClient;
pub use fub::FubClient;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Response};
use serde_json::{json, Map, Value};
use url::Url;

use crate::error::ProviderError;
use crate::protocol::CmaRequest;

// ============================================================================
// COLLABORATOR TRAITS
// ============================================================================

/// Raw person lookup by CRM id.
#[async_trait]
pub trait PersonDataProvider: Send + Sync {
    async fn fetch_person(&self, person_id: &str) -> Result<Value, ProviderError>;
}

/// Raw property lookup by free-text address.
#[async_trait]
pub trait PropertyDataProvider: Send + Sync {
    async fn lookup_property(&self, address: &str) -> Result<Value, ProviderError>;
}

/// Writes computed fields back onto a CRM person.
#[async_trait]
pub trait CrmSync: Send + Sync {
    async fn update_person(
        &self,
        person_id: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), ProviderError>;
}

/// Appends a free-text note to a CRM person.
#[async_trait]
pub trait NoteLogger: Send + Sync {
    async fn create_note(&self, person_id: u64, body: &str) -> Result<NoteReceipt, ProviderError>;
}

/// Drafts a CMA report.
#[async_trait]
pub trait CmaGenerator: Send + Sync {
    async fn generate_cma(&self, request: &CmaRequest) -> Result<Value, ProviderError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteReceipt {
    pub note_id: Option<Value>,
}

// ============================================================================
// CMA SYNC PAYLOAD
// ============================================================================

/// Custom fields written to the lead after a CMA is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmaSyncUpdate {
    pub cma_requested_at: DateTime<Utc>,
    pub synced_at: DateTime<Utc>,
}

impl CmaSyncUpdate {
    pub const FIELD_NAMES: [&'static str; 6] = [
        "customCloudCMALastRequest",
        "customWillowLastCMAGenerated",
        "customCloudCMARequestCount",
        "customWillowStatus",
        "customWillowWhyNowTrigger",
        "customWillowRecommendedAction",
    ];

    pub fn fields(&self) -> Map<String, Value> {
        let stamp = |ts: DateTime<Utc>| ts.to_rfc3339_opts(SecondsFormat::Millis, true);
        let values = [
            json!(stamp(self.cma_requested_at)),
            json!(stamp(self.synced_at)),
            // CRM-side increment
            json!("INCREMENT"),
            json!("Active"),
            json!("CMA Generated"),
            json!("Review CMA with Client"),
        ];
        Self::FIELD_NAMES
            .iter()
            .map(|name| name.to_string())
            .zip(values)
            .collect()
    }
}

// ============================================================================
// SHARED HTTP PLUMBING
// ============================================================================

pub(crate) fn build_http_client(timeout: Duration) -> Result<Client, ProviderError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Append path segments to a base URL, escaping each one.
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, ProviderError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ProviderError::InvalidInput(format!("invalid base URL {}: {}", base_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| ProviderError::InvalidInput(format!("base URL {} cannot have a path", base_url)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Check status and decode a JSON body. An empty 2xx body decodes to `null`.
pub(crate) async fn read_json(
    provider: &'static str,
    response: Response,
) -> Result<Value, ProviderError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!(provider, status = status.as_u16(), "provider returned error status");
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| ProviderError::Decode {
        provider,
        message: e.to_string(),
    })
}

pub(crate) fn require_key<'a>(
    provider: &'static str,
    key: &'a Option<String>,
) -> Result<&'a str, ProviderError> {
    key.as_deref()
        .ok_or(ProviderError::MissingCredential { provider })
}
