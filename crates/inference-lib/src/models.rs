//! Core data models for the inference server

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record of one served prediction, appended to the audit log.
///
/// Written, never read back by this service; ordering is insertion order
/// within a single log target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub timestamp: DateTime<Utc>,
    pub label: i64,
    /// The raw caller payload, before feature translation.
    pub features: Value,
}

impl PredictionRecord {
    pub fn new(label: i64, features: Value) -> Self {
        Self {
            timestamp: Utc::now(),
            label,
            features,
        }
    }
}

/// Health probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_initialized: bool,
}

impl HealthResponse {
    pub fn healthy(model_initialized: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            model_initialized,
        }
    }
}

/// Result of a successful prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub label: i64,
    pub model_version: String,
}
