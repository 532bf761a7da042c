//! Lazy, single-flight model loading
//!
//! The registry client owns the only long-lived shared resource in the
//! service: the loaded model handle. The handle is read-only after a
//! successful load, so request handlers take a snapshot and run inference
//! without further synchronization. Only the load transition itself is
//! guarded.

use super::loader::{LoadedModel, ModelLoader};
use crate::error::PredictError;
use crate::observability::ServiceMetrics;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Holds the loaded model and performs at most one load at a time.
pub struct RegistryClient {
    loader: Box<dyn ModelLoader>,
    current: RwLock<Option<Arc<LoadedModel>>>,
    // Single-flight guard: concurrent callers wait for the in-flight load
    // and observe its outcome instead of starting their own.
    load_guard: Mutex<()>,
    metrics: ServiceMetrics,
}

impl RegistryClient {
    pub fn new(loader: Box<dyn ModelLoader>, metrics: ServiceMetrics) -> Self {
        Self {
            loader,
            current: RwLock::new(None),
            load_guard: Mutex::new(()),
            metrics,
        }
    }

    /// Pure read of the initialization state. Never blocks on a load and
    /// never triggers one.
    pub fn is_ready(&self) -> bool {
        self.current.read().map(|m| m.is_some()).unwrap_or(false)
    }

    /// Snapshot of the current model handle, if one is loaded.
    pub fn model(&self) -> Option<Arc<LoadedModel>> {
        self.current.read().ok().and_then(|m| m.clone())
    }

    /// Return the loaded model, attempting exactly one load if none is
    /// present. Idempotent once a load has succeeded.
    ///
    /// On failure the state stays uninitialized and the underlying cause is
    /// carried in the returned `ModelUnavailable`.
    pub async fn ensure_loaded(&self) -> Result<Arc<LoadedModel>, PredictError> {
        if let Some(model) = self.model() {
            return Ok(model);
        }

        let _guard = self.load_guard.lock().await;

        // A load may have finished while we waited for the guard.
        if let Some(model) = self.model() {
            return Ok(model);
        }

        self.load_and_store().await
    }

    /// Explicit full reload. Replaces the current handle on success; the
    /// last successful load wins. On failure the previous handle, if any,
    /// stays in place.
    pub async fn reload(&self) -> Result<Arc<LoadedModel>, PredictError> {
        let _guard = self.load_guard.lock().await;
        self.load_and_store().await
    }

    async fn load_and_store(&self) -> Result<Arc<LoadedModel>, PredictError> {
        match self.loader.load().await {
            Ok(loaded) => {
                let model = Arc::new(loaded);
                match self.current.write() {
                    Ok(mut current) => *current = Some(model.clone()),
                    Err(e) => {
                        return Err(PredictError::ModelUnavailable(anyhow::anyhow!(
                            "Model handle lock poisoned: {}",
                            e
                        )))
                    }
                }
                self.metrics.set_model_version(&model.version);
                info!(version = %model.version, columns = model.schema.len(), "Model loaded");
                Ok(model)
            }
            Err(e) => {
                self.metrics.inc_model_load_error();
                warn!(error = %e, "Model load failed");
                Err(PredictError::ModelUnavailable(e))
            }
        }
    }
}
