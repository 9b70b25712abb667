//! CloudCMA report client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{build_http_client, endpoint, read_json, require_key, CmaGenerator};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::protocol::CmaRequest;

const PROVIDER: &str = "CloudCMA";

pub struct CloudCmaClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CloudCmaClient {
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl CmaGenerator for CloudCmaClient {
    /// Returns the `cma` member of the response, or the whole body when the
    /// API answers unwrapped.
    async fn generate_cma(&self, request: &CmaRequest) -> Result<Value, ProviderError> {
        let key = require_key(PROVIDER, &self.api_key)?;
        let url = endpoint(&self.base_url, &["cmas", "new"])?;
        tracing::info!(
            address = %request.address,
            radius = request.radius,
            days_back = request.days_back,
            "requesting CloudCMA draft"
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(key)
            .json(request)
            .send()
            .await?;
        let mut body = read_json(PROVIDER, response).await?;
        let cma = body.get_mut("cma").map(Value::take);
        Ok(cma.unwrap_or(body))
    }
}
