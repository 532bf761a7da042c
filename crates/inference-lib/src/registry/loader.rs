//! Artifact download and validation for the model registry
//!
//! Fetches a version manifest from the registry, downloads the ONNX
//! artifact from the storage endpoint, and validates its checksum before
//! handing a runnable classifier to the registry client.

use crate::classifier::{Classifier, OnnxClassifier};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::info;
use url::Url;

/// Connection parameters for the model registry.
///
/// Supplied entirely by external configuration; nothing here is
/// hard-coded into the service.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Base URI of the registry API
    pub registry_uri: String,
    /// Registered model name
    pub model_name: String,
    /// Registry stage to serve from (e.g. "production")
    pub model_stage: String,
    /// Artifact storage endpoint; falls back to the registry URI when unset
    pub storage_endpoint: Option<String>,
    /// Bearer token for registry and storage requests
    pub registry_token: Option<String>,
    /// Timeout applied to every registry/storage request
    pub http_timeout: Duration,
}

/// Manifest describing the current artifact for a model stage
#[derive(Debug, Clone, Deserialize)]
pub struct ModelManifest {
    pub version: String,
    /// SHA256 hex digest of the artifact bytes
    pub checksum: String,
    /// Canonical column names the model was trained on, in input order
    pub feature_columns: Vec<String>,
    /// Artifact location, relative to the storage endpoint
    pub artifact_path: String,
}

/// A fully loaded model: runnable classifier plus its feature schema.
///
/// Read-only after load; the schema never changes for the lifetime of
/// the handle.
pub struct LoadedModel {
    pub classifier: Box<dyn Classifier>,
    pub schema: Vec<String>,
    pub version: String,
}

/// Trait for model loading implementations
#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Perform one load attempt against the registry
    async fn load(&self) -> Result<LoadedModel>;
}

/// Loader that talks to the registry over HTTP
pub struct HttpModelLoader {
    client: reqwest::Client,
    config: RegistryConfig,
}

impl HttpModelLoader {
    pub fn new(config: RegistryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn manifest_url(&self) -> Result<Url> {
        let base = Url::parse(&self.config.registry_uri).context("Invalid registry URI")?;
        base.join(&format!(
            "api/models/{}/{}/manifest",
            self.config.model_name, self.config.model_stage
        ))
        .context("Invalid manifest path")
    }

    fn artifact_url(&self, manifest: &ModelManifest) -> Result<Url> {
        let base = match &self.config.storage_endpoint {
            Some(endpoint) => Url::parse(endpoint).context("Invalid storage endpoint")?,
            None => Url::parse(&self.config.registry_uri).context("Invalid registry URI")?,
        };
        base.join(&manifest.artifact_path)
            .context("Invalid artifact path")
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.registry_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_manifest(&self) -> Result<ModelManifest> {
        let url = self.manifest_url()?;
        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .context("Registry unreachable")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Registry error ({}): {}", status, body);
        }

        response
            .json()
            .await
            .context("Malformed model manifest")
    }

    async fn fetch_artifact(&self, manifest: &ModelManifest) -> Result<Vec<u8>> {
        let url = self.artifact_url(manifest)?;
        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .context("Artifact storage unreachable")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Artifact download failed ({})", status);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read artifact body")?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ModelLoader for HttpModelLoader {
    async fn load(&self) -> Result<LoadedModel> {
        let manifest = self.fetch_manifest().await?;

        if manifest.feature_columns.is_empty() {
            anyhow::bail!("Manifest for version {} has no feature columns", manifest.version);
        }

        let bytes = self.fetch_artifact(&manifest).await?;

        let computed = compute_checksum(&bytes);
        if computed != manifest.checksum {
            anyhow::bail!(
                "Checksum mismatch for version {}: expected {}, got {}",
                manifest.version,
                manifest.checksum,
                computed
            );
        }

        let classifier = OnnxClassifier::from_bytes(&bytes, manifest.feature_columns.len())?;

        info!(
            version = %manifest.version,
            columns = manifest.feature_columns.len(),
            size = bytes.len(),
            "Model artifact loaded"
        );

        Ok(LoadedModel {
            classifier: Box::new(classifier),
            schema: manifest.feature_columns,
            version: manifest.version,
        })
    }
}

/// Compute SHA256 checksum of data
fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
