//! Server configuration
//!
//! All connection parameters come from the environment (`INFERENCE_*`
//! variables); nothing is embedded in code. The registry URI has no
//! default on purpose: without it the service cannot serve at all and
//! must refuse to start.

use anyhow::{Context, Result};
use inference_lib::{AuditConfig, RegistryConfig};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Inference server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Model registry base URI (required)
    pub registry_uri: String,

    /// Registered model name
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Registry stage to serve from
    #[serde(default = "default_model_stage")]
    pub model_stage: String,

    /// Artifact storage endpoint; the registry URI is used when unset
    #[serde(default)]
    pub storage_endpoint: Option<String>,

    /// Bearer token for registry and storage requests; never logged
    #[serde(default)]
    pub registry_token: Option<String>,

    /// Directory for the prediction audit logs
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Whether benign predictions are recorded as well
    #[serde(default)]
    pub log_negative_predictions: bool,

    /// Label treated as "nothing detected"
    #[serde(default)]
    pub benign_label: i64,

    /// HTTP API port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Timeout for registry/storage requests in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

fn default_model_name() -> String {
    "flow-classifier".to_string()
}

fn default_model_stage() -> String {
    "production".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("/var/log/inference-server")
}

fn default_api_port() -> u16 {
    8080
}

fn default_http_timeout() -> u64 {
    30
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("INFERENCE"))
            .build()?;

        config
            .try_deserialize()
            .context("Invalid server configuration (INFERENCE_REGISTRY_URI is required)")
    }

    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            registry_uri: self.registry_uri.clone(),
            model_name: self.model_name.clone(),
            model_stage: self.model_stage.clone(),
            storage_endpoint: self.storage_endpoint.clone(),
            registry_token: self.registry_token.clone(),
            http_timeout: Duration::from_secs(self.http_timeout_secs),
        }
    }

    pub fn audit_config(&self) -> AuditConfig {
        AuditConfig {
            log_dir: self.log_dir.clone(),
            log_negative_predictions: self.log_negative_predictions,
            benign_label: self.benign_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config: ServerConfig =
            serde_json::from_str(r#"{"registry_uri": "http://registry:5000"}"#).unwrap();

        assert_eq!(config.model_name, "flow-classifier");
        assert_eq!(config.model_stage, "production");
        assert_eq!(config.api_port, 8080);
        assert!(!config.log_negative_predictions);
        assert_eq!(config.benign_label, 0);
        assert_eq!(config.http_timeout_secs, 30);
        assert!(config.storage_endpoint.is_none());
        assert!(config.registry_token.is_none());
    }

    #[test]
    fn test_registry_uri_is_required() {
        let result: Result<ServerConfig, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_registry_config_conversion() {
        let config: ServerConfig = serde_json::from_str(
            r#"{
                "registry_uri": "http://registry:5000",
                "storage_endpoint": "http://minio:9000",
                "http_timeout_secs": 5
            }"#,
        )
        .unwrap();

        let registry = config.registry_config();
        assert_eq!(registry.registry_uri, "http://registry:5000");
        assert_eq!(registry.storage_endpoint.as_deref(), Some("http://minio:9000"));
        assert_eq!(registry.http_timeout, Duration::from_secs(5));
    }
}
