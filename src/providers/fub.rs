//! Follow Up Boss CRM client
//!
//! HTTP Basic auth with the API key as the username and an empty password.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};

use super::{
    build_http_client, endpoint, read_json, require_key, CrmSync, NoteLogger, NoteReceipt,
    PersonDataProvider,
};
use crate::config::ProviderConfig;
use crate::error::ProviderError;

const PROVIDER: &str = "FUB";

pub struct FubClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl FubClient {
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        require_key(PROVIDER, &self.api_key)
    }
}

#[async_trait]
impl PersonDataProvider for FubClient {
    async fn fetch_person(&self, person_id: &str) -> Result<Value, ProviderError> {
        let key = self.api_key()?;
        let url = endpoint(&self.base_url, &["people", person_id])?;
        tracing::debug!(person_id, "fetching FUB person");

        let response = self
            .client
            .get(url)
            .basic_auth(key, Some(""))
            .send()
            .await?;
        read_json(PROVIDER, response).await
    }
}

#[async_trait]
impl CrmSync for FubClient {
    async fn update_person(
        &self,
        person_id: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), ProviderError> {
        let key = self.api_key()?;
        let url = endpoint(&self.base_url, &["people", person_id])?;
        tracing::debug!(person_id, fields = fields.len(), "updating FUB person fields");

        let response = self
            .client
            .put(url)
            .basic_auth(key, Some(""))
            .json(fields)
            .send()
            .await?;
        read_json(PROVIDER, response).await.map(|_| ())
    }
}

#[async_trait]
impl NoteLogger for FubClient {
    async fn create_note(&self, person_id: u64, body: &str) -> Result<NoteReceipt, ProviderError> {
        let key = self.api_key()?;
        let url = endpoint(&self.base_url, &["notes"])?;
        tracing::debug!(person_id, "creating FUB note");

        let response = self
            .client
            .post(url)
            .basic_auth(key, Some(""))
            .json(&json!({ "personId": person_id, "body": body }))
            .send()
            .await?;
        let created = read_json(PROVIDER, response).await?;
        Ok(NoteReceipt {
            note_id: created.get("id").cloned().filter(|id| !id.is_null()),
        })
    }
}
