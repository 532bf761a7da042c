//! Per-request prediction pipeline
//!
//! Orchestrates validation, lazy model loading, feature translation,
//! inference, and the audit side effect. Stateless across requests; the
//! registry client is the only shared collaborator with state.

use crate::audit::AuditLogger;
use crate::error::PredictError;
use crate::models::{Prediction, PredictionRecord};
use crate::observability::ServiceMetrics;
use crate::registry::RegistryClient;
use crate::translate::translate;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Orchestrates one prediction per call
pub struct PredictionService {
    registry: Arc<RegistryClient>,
    audit: AuditLogger,
    metrics: ServiceMetrics,
}

impl PredictionService {
    pub fn new(registry: Arc<RegistryClient>, audit: AuditLogger, metrics: ServiceMetrics) -> Self {
        Self {
            registry,
            audit,
            metrics,
        }
    }

    /// Run the full pipeline for one caller payload.
    ///
    /// `InvalidRequest` is returned for a payload that is not a JSON object
    /// or that matches no schema column; `ModelUnavailable` covers both a
    /// failed lazy load and a predictor failure. The lazy load inside
    /// `ensure_loaded` is the only retry this pipeline ever performs.
    pub async fn predict(&self, payload: &Value) -> Result<Prediction, PredictError> {
        let result = self.run(payload).await;
        match &result {
            Ok(_) => self.metrics.inc_served(),
            Err(PredictError::InvalidRequest(_)) => self.metrics.inc_invalid_request(),
            Err(PredictError::ModelUnavailable(_)) => self.metrics.inc_model_unavailable(),
        }
        result
    }

    async fn run(&self, payload: &Value) -> Result<Prediction, PredictError> {
        let features = payload
            .as_object()
            .ok_or_else(|| PredictError::invalid("no features provided"))?;

        let model = self.registry.ensure_loaded().await?;

        let row = translate(features, &model.schema);
        if row.usable_columns() == 0 {
            return Err(PredictError::invalid(
                "features did not match any known schema column",
            ));
        }
        debug!(
            usable = row.usable_columns(),
            width = row.width(),
            "Translated request payload"
        );

        let start = Instant::now();
        let label = model
            .classifier
            .predict(&row)
            .map_err(PredictError::ModelUnavailable)?;
        self.metrics
            .observe_inference_latency(start.elapsed().as_secs_f64());

        if self.audit.is_positive(label) {
            self.metrics.inc_positive_prediction();
        }

        // Audit is a side effect of the response, never a gate on it.
        let record = PredictionRecord::new(label, Value::Object(features.clone()));
        if let Err(e) = self.audit.record(&record) {
            self.metrics.inc_audit_write_error();
            warn!(error = %e, "Failed to append prediction record");
        }

        Ok(Prediction {
            label,
            model_version: model.version.clone(),
        })
    }
}
