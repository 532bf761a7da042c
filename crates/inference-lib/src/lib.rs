//! Core library for the flow inference server
//!
//! This crate provides:
//! - Lazy, single-flight model loading from a remote registry
//! - Feature translation from caller keys to canonical model columns
//! - The per-request prediction pipeline and its error contract
//! - Append-only audit logging of served predictions
//! - Metrics and observability handles

pub mod audit;
pub mod classifier;
pub mod error;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod registry;
pub mod translate;

pub use audit::{AuditConfig, AuditLogger};
pub use classifier::{Classifier, OnnxClassifier};
pub use error::PredictError;
pub use models::{HealthResponse, Prediction, PredictionRecord};
pub use observability::ServiceMetrics;
pub use pipeline::PredictionService;
pub use registry::{
    HttpModelLoader, LoadedModel, ModelLoader, ModelManifest, RegistryClient, RegistryConfig,
};
pub use translate::{translate, InputRow};
