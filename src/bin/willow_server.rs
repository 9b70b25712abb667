//! willow_server - REST server for lead scoring and CMA configuration.
//!
//! See `willow_leads::config` for the environment variables it reads.

use anyhow::Context;
use tokio::net::TcpListener;

use willow_leads::api::{create_router, ApiState};
use willow_leads::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "willow_leads=debug,tower_http=debug".into()),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    for (name, provider) in [
        ("FUB", &config.fub),
        ("ATTOM", &config.attom),
        ("CloudCMA", &config.cloudcma),
    ] {
        if provider.api_key.is_none() {
            tracing::warn!(provider = name, "API key not set; calls will fail");
        }
    }

    let state = ApiState::from_config(&config).context("failed to build provider clients")?;
    let app = create_router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("willow_server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
