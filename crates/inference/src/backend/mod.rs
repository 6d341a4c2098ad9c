//! Pluggable generation backend abstraction
//!
//! This module provides a trait-based abstraction over text-generation
//! services (Gemini, Ollama). All backends implement the same interface,
//! allowing runtime switching between services.

pub mod registry;

#[cfg(feature = "backend-gemini")]
pub mod gemini;

#[cfg(feature = "backend-ollama")]
pub mod ollama;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::GenerationSettings;
use crate::constants::env;

#[cfg(feature = "backend-gemini")]
pub use gemini::GeminiBackend;

#[cfg(feature = "backend-ollama")]
pub use ollama::OllamaBackend;

pub use registry::{BackendFactory, BackendRegistry};

/// Error types for backend operations
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Backend not ready")]
    NotReady,

    #[error("Startup failed: {0}")]
    StartupFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Capabilities that a backend may or may not support
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendCapabilities {
    /// Supports streaming token output
    pub streaming: bool,
    /// Needs an API key to start
    pub requires_api_key: bool,
    /// Runs on the local machine
    pub local: bool,
}

/// Backend information for UI display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Backend identifier (e.g., "Gemini", "Ollama")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Backend capabilities
    pub capabilities: BackendCapabilities,
    /// Whether this backend is available (dependencies met)
    pub available: bool,
    /// Reason if unavailable
    pub unavailable_reason: Option<String>,
}

/// Configuration for starting a backend
#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    /// Model name (e.g., "gemini-1.5-flash", "llama3.2")
    pub model_name: Option<String>,
    /// API key for hosted services
    pub api_key: Option<String>,
    /// Override for the service base URL
    pub base_url: Option<String>,
    /// Sampling settings
    pub settings: GenerationSettings,
}

impl BackendConfig {
    /// Build a config from `GEMINI_API_KEY`, `SIGIL_MODEL` and `SIGIL_BASE_URL`
    ///
    /// Empty variables are treated as unset.
    pub fn from_env() -> Self {
        Self {
            model_name: read_env(env::MODEL),
            api_key: read_env(env::GEMINI_API_KEY),
            base_url: read_env(env::BASE_URL),
            settings: GenerationSettings::default(),
        }
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_name = Some(model.into());
        self
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The core trait that all generation backends must implement.
///
/// Backends are HTTP-based services. Application code talks to the
/// [`crate::InferenceGateway`] and never needs to know which one is active.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    // ─── IDENTITY ───────────────────────────────────────────────────

    /// Human-readable name for UI display
    fn name(&self) -> &'static str;

    /// Description of this backend
    fn description(&self) -> &'static str;

    /// What this backend supports
    fn capabilities(&self) -> BackendCapabilities;

    // ─── LIFECYCLE ──────────────────────────────────────────────────

    /// Validate configuration and prepare the backend for requests
    async fn start(&mut self, config: &BackendConfig) -> Result<(), BackendError>;

    /// Stop the backend and drop any held credentials
    fn stop(&mut self);

    /// Is the backend ready to accept requests?
    fn is_ready(&self) -> bool;

    /// Health check - verify the service is responding
    async fn health_check(&self) -> bool;

    /// Get the base URL for this backend
    fn base_url(&self) -> Option<String>;

    // ─── GENERATION ─────────────────────────────────────────────────

    /// Send one prompt and wait for the complete response text
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = BackendConfig::default()
            .with_model("gemini-1.5-pro")
            .with_api_key("secret")
            .with_base_url("http://localhost:9000");

        assert_eq!(config.model_name.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn test_api_error_display() {
        let err = BackendError::Api {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "API error 429: quota exceeded");
    }
}
