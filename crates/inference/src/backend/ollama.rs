//! Ollama backend implementation
//!
//! This backend integrates with a locally running Ollama daemon and uses
//! its native `/api/generate` endpoint with streaming disabled.

use async_trait::async_trait;

use super::{BackendCapabilities, BackendConfig, BackendError, InferenceBackend};
use crate::config::GenerationSettings;
use crate::constants::defaults;
use crate::types::{OllamaGenerateRequest, OllamaGenerateResponse, OllamaOptions};

/// Ollama backend using the Ollama daemon
///
/// This backend communicates with an Ollama server via HTTP. The daemon
/// must already be running; it is never started automatically.
pub struct OllamaBackend {
    /// HTTP client for API requests
    http_client: reqwest::Client,
    /// Base URL of the Ollama server
    base_url: Option<String>,
    /// Model used for generation
    model: String,
    /// Sampling settings
    settings: GenerationSettings,
    /// Whether the backend is ready
    ready: bool,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: None,
            model: defaults::OLLAMA_MODEL.to_string(),
            settings: GenerationSettings::default(),
            ready: false,
        }
    }

    /// Get static capabilities (for registry info before instantiation)
    pub fn static_capabilities() -> BackendCapabilities {
        BackendCapabilities {
            streaming: false,
            requires_api_key: false,
            local: true,
        }
    }

    /// Why the daemon cannot be used on this machine, if it cannot
    ///
    /// Only checks that the `ollama` binary is on `PATH`; the daemon itself
    /// is probed by `health_check`.
    pub fn unavailable_reason() -> Option<String> {
        match which::which("ollama") {
            Ok(path) => {
                log::debug!("Found ollama at {:?}", path);
                None
            }
            Err(_) => Some("Ollama not found in PATH. Install from ollama.com".to_string()),
        }
    }

    fn build_request(&self, prompt: &str) -> OllamaGenerateRequest {
        OllamaGenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: (!self.settings.is_empty()).then(|| OllamaOptions::from(&self.settings)),
        }
    }
}

impl Default for OllamaBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    fn description(&self) -> &'static str {
        "Local Ollama daemon. Models are pulled from the Ollama registry."
    }

    fn capabilities(&self) -> BackendCapabilities {
        Self::static_capabilities()
    }

    async fn start(&mut self, config: &BackendConfig) -> Result<(), BackendError> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| defaults::OLLAMA_BASE_URL.to_string());
        if let Some(model) = &config.model_name {
            self.model = model.clone();
        }
        self.settings = config.settings.clone();

        // Check if Ollama is already running
        let health_url = format!("{}/api/tags", base_url.trim_end_matches('/'));
        match self.http_client.get(&health_url).send().await {
            Ok(resp) if resp.status().is_success() => {
                self.base_url = Some(base_url);
                self.ready = true;
                log::info!("Connected to Ollama server (model: {})", self.model);
                Ok(())
            }
            _ => Err(BackendError::StartupFailed(
                "Ollama server not running. Start with 'ollama serve'".to_string(),
            )),
        }
    }

    fn stop(&mut self) {
        self.base_url = None;
        self.ready = false;
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn health_check(&self) -> bool {
        if let Some(ref base_url) = self.base_url {
            let health_url = format!("{}/api/tags", base_url.trim_end_matches('/'));
            match self.http_client.get(&health_url).send().await {
                Ok(resp) => resp.status().is_success(),
                Err(_) => false,
            }
        } else {
            false
        }
    }

    fn base_url(&self) -> Option<String> {
        self.base_url.clone()
    }

    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let base_url = self.base_url.as_ref().ok_or(BackendError::NotReady)?;
        let url = format!("{}/api/generate", base_url.trim_end_matches('/'));

        let response = self
            .http_client
            .post(&url)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(BackendError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        log::debug!("Ollama model {} finished (done: {})", parsed.model, parsed.done);
        Ok(parsed.response)
    }
}
