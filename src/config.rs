//! Environment configuration
//!
//! Reads from the process environment (after loading `.env` via dotenvy):
//!   FUB_API_KEY / FUB_API_BASE           - Follow Up Boss CRM
//!   ATTOM_API_KEY / ATTOM_API_BASE       - ATTOM property data
//!   CLOUDCMA_API_KEY / CLOUDCMA_API_BASE - CloudCMA report generation
//!   WILLOW_BIND_ADDR                     - listen address (default: 0.0.0.0:8888)
//!   WILLOW_HTTP_TIMEOUT_SECS             - outbound request timeout (default: 30)
//!
//! Missing API keys are not fatal here; the affected client reports
//! `MissingCredential` when it is used.

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_FUB_API_BASE: &str = "https://api.followupboss.com/v1";
pub const DEFAULT_ATTOM_API_BASE: &str = "https://api.gateway.attomdata.com/propertyapi/v1.0.0";
pub const DEFAULT_CLOUDCMA_API_BASE: &str = "https://cloudcma.com";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8888";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub http_timeout: Duration,
    pub fub: ProviderConfig,
    pub attom: ProviderConfig,
    pub cloudcma: ProviderConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("WILLOW_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "WILLOW_BIND_ADDR",
                reason: format!("{}: {}", bind_raw, e),
            })?;

        let http_timeout = match get("WILLOW_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: "WILLOW_HTTP_TIMEOUT_SECS",
                    reason: format!("{}: {}", raw, e),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        var: "WILLOW_HTTP_TIMEOUT_SECS",
                        reason: "must be at least 1".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let provider = |base_var: &str, default_base: &str, key_var: &str| {
            ProviderConfig::new(
                get(base_var).unwrap_or_else(|| default_base.to_string()),
                get(key_var),
            )
        };

        Ok(Self {
            bind_addr,
            http_timeout,
            fub: provider("FUB_API_BASE", DEFAULT_FUB_API_BASE, "FUB_API_KEY"),
            attom: provider("ATTOM_API_BASE", DEFAULT_ATTOM_API_BASE, "ATTOM_API_KEY"),
            cloudcma: provider(
                "CLOUDCMA_API_BASE",
                DEFAULT_CLOUDCMA_API_BASE,
                "CLOUDCMA_API_KEY",
            ),
        })
    }
}
