//! ATTOM property data client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;

use super::{build_http_client, endpoint, read_json, require_key, PropertyDataProvider};
use crate::config::ProviderConfig;
use crate::error::ProviderError;

const PROVIDER: &str = "ATTOM";

pub struct AttomClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AttomClient {
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl PropertyDataProvider for AttomClient {
    /// `GET /property/address?address1=...`
    async fn lookup_property(&self, address: &str) -> Result<Value, ProviderError> {
        let key = require_key(PROVIDER, &self.api_key)?;
        let url = endpoint(&self.base_url, &["property", "address"])?;
        tracing::debug!(address, "looking up ATTOM property");

        let response = self
            .client
            .get(url)
            .query(&[("address1", address)])
            .header("apikey", key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        read_json(PROVIDER, response).await
    }
}
