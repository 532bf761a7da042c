//! Observability infrastructure for the inference server
//!
//! Prometheus metrics for prediction outcomes, inference latency, model
//! loading, and audit log health. Structured logging itself is configured
//! by the binary; this module only carries the metric handles.

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    GaugeVec, Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;

/// Histogram buckets for inference latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

struct ServiceMetricsInner {
    inference_latency_seconds: Histogram,
    predictions_total: IntCounterVec,
    positive_predictions_total: IntCounter,
    model_load_errors_total: IntCounter,
    audit_write_errors_total: IntCounter,
    model_version_info: GaugeVec,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            inference_latency_seconds: register_histogram!(
                "inference_server_inference_latency_seconds",
                "Time spent running model inference per request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register inference_latency_seconds"),

            predictions_total: register_int_counter_vec!(
                "inference_server_predictions_total",
                "Prediction requests by outcome",
                &["outcome"]
            )
            .expect("Failed to register predictions_total"),

            positive_predictions_total: register_int_counter!(
                "inference_server_positive_predictions_total",
                "Predictions with a non-benign label"
            )
            .expect("Failed to register positive_predictions_total"),

            model_load_errors_total: register_int_counter!(
                "inference_server_model_load_errors_total",
                "Failed model load attempts against the registry"
            )
            .expect("Failed to register model_load_errors_total"),

            audit_write_errors_total: register_int_counter!(
                "inference_server_audit_write_errors_total",
                "Failed appends to the prediction audit log"
            )
            .expect("Failed to register audit_write_errors_total"),

            model_version_info: register_gauge_vec!(
                "inference_server_model_version_info",
                "Information about the currently loaded model",
                &["version"]
            )
            .expect("Failed to register model_version_info"),
        }
    }
}

/// Metrics handle for the inference service
///
/// Lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_inference_latency(&self, duration_secs: f64) {
        self.inner().inference_latency_seconds.observe(duration_secs);
    }

    pub fn inc_served(&self) {
        self.inner()
            .predictions_total
            .with_label_values(&["served"])
            .inc();
    }

    pub fn inc_invalid_request(&self) {
        self.inner()
            .predictions_total
            .with_label_values(&["invalid_request"])
            .inc();
    }

    pub fn inc_model_unavailable(&self) {
        self.inner()
            .predictions_total
            .with_label_values(&["model_unavailable"])
            .inc();
    }

    pub fn inc_positive_prediction(&self) {
        self.inner().positive_predictions_total.inc();
    }

    pub fn inc_model_load_error(&self) {
        self.inner().model_load_errors_total.inc();
    }

    pub fn inc_audit_write_error(&self) {
        self.inner().audit_write_errors_total.inc();
    }

    pub fn set_model_version(&self, version: &str) {
        self.inner().model_version_info.reset();
        self.inner()
            .model_version_info
            .with_label_values(&[version])
            .set(1.0);
    }
}
