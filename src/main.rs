use anyhow::Result;
use rmcp::ServiceExt;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod aggregator;
mod boundary;
mod config;
mod constants;
mod error;
mod fetcher;
mod formatters;
mod icons;
mod map;
mod models;
mod service;

use config::PortalConfig;
use constants::DEFAULT_CONFIG_PATH;
use service::ForecastPortal;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phoenix_forecast=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Phoenix forecast server");

    let config = PortalConfig::load_or_default(Path::new(DEFAULT_CONFIG_PATH))?;
    let portal = ForecastPortal::new(config)?;
    let server = portal.serve(rmcp::transport::stdio()).await?;
    server.waiting().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
