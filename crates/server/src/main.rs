//! Flow inference server
//!
//! Serves predictions from a classifier loaded lazily from a remote model
//! registry, and records positive predictions for later audit.

use anyhow::Result;
use inference_lib::{
    AuditLogger, HttpModelLoader, PredictionService, RegistryClient, ServiceMetrics,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!(version = SERVER_VERSION, "Starting inference-server");

    // A missing registry URI is the one unrecoverable startup failure.
    let config = config::ServerConfig::load()?;
    info!(
        registry_uri = %config.registry_uri,
        model = %config.model_name,
        stage = %config.model_stage,
        log_dir = %config.log_dir.display(),
        "Server configured"
    );

    let metrics = ServiceMetrics::new();
    let loader = HttpModelLoader::new(config.registry_config())?;
    let registry = Arc::new(RegistryClient::new(Box::new(loader), metrics.clone()));
    let audit = AuditLogger::new(config.audit_config());
    let service = Arc::new(PredictionService::new(registry.clone(), audit, metrics));

    // Warm load attempt; failure is tolerated and retried lazily on the
    // first prediction request.
    if let Err(e) = registry.ensure_loaded().await {
        warn!(error = %e, "Model not available at startup");
    }

    let state = Arc::new(api::AppState::new(service, registry));
    let _server = tokio::spawn(api::serve(config.api_port, state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    Ok(())
}
