//! Customer API entry-point: loads settings, initialises tracing, and runs
//! the HTTP server.

mod server;

use std::sync::Arc;

use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use customer_api::config::AppSettings;
use customer_api::inbound::http::health::HealthState;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = ServerConfig::from_settings(&settings).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let health = Arc::new(HealthState::new());
    let server = create_server(Arc::clone(&health), config)?;
    let result = server.await;
    health.mark_unhealthy();
    result
}
