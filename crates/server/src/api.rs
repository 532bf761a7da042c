//! HTTP API for predictions, health checks, and Prometheus metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use inference_lib::{HealthResponse, PredictError, PredictionService, RegistryClient};
use prometheus::{Encoder, TextEncoder};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub registry: Arc<RegistryClient>,
}

impl AppState {
    pub fn new(service: Arc<PredictionService>, registry: Arc<RegistryClient>) -> Self {
        Self { service, registry }
    }
}

/// Root banner
async fn root() -> impl IntoResponse {
    Json(json!({"message": "Inference server is running."}))
}

/// Health probe - pure read of the initialization state, never loads
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse::healthy(state.registry.is_ready()))
}

/// Prediction endpoint - 422 for caller errors, 503 when no model can serve
async fn predict(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    match state.service.predict(&payload).await {
        Ok(prediction) => (
            StatusCode::OK,
            Json(json!({"prediction": prediction.label})),
        ),
        Err(e) => {
            let status = match &e {
                PredictError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
                PredictError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            };
            (status, Json(json!({"detail": e.to_string()})))
        }
    }
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
