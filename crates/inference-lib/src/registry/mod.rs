//! Model registry access
//!
//! The registry owns the model lifecycle: fetching the versioned artifact,
//! validating it, and holding the loaded handle for request handlers.

mod client;
mod loader;

pub use client::RegistryClient;
pub use loader::{HttpModelLoader, LoadedModel, ModelLoader, ModelManifest, RegistryConfig};
