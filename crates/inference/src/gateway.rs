//! Inference Gateway - the one door generation requests go through
//!
//! Callers never hold a backend directly. The gateway owns the active backend
//! together with its registry name, swaps it on request and forwards each
//! prompt to it.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;

use crate::backend::{BackendConfig, BackendError, BackendInfo, BackendRegistry, InferenceBackend};

#[cfg(feature = "backend-gemini")]
use crate::backend::GeminiBackend;
#[cfg(feature = "backend-gemini")]
use crate::constants::backend_names;

/// Error types for gateway operations
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Backend switch failed: {0}")]
    SwitchFailed(String),
}

/// The active backend and the name it was registered under
struct Active {
    name: String,
    backend: Box<dyn InferenceBackend>,
}

/// Single entry point for generation requests
pub struct InferenceGateway {
    active: RwLock<Active>,
    registry: BackendRegistry,
}

impl InferenceGateway {
    /// Gateway starting on the Gemini backend
    #[cfg(feature = "backend-gemini")]
    pub fn new() -> Self {
        Self::with_backend(Box::new(GeminiBackend::new()), backend_names::GEMINI)
    }

    /// Gateway starting on a fresh instance of the registered backend `name`
    ///
    /// Works with whichever backend features are compiled in.
    pub fn for_backend(name: &str) -> Result<Self, GatewayError> {
        let registry = BackendRegistry::new();
        let backend = registry.create(name)?;
        Ok(Self {
            active: RwLock::new(Active {
                name: name.to_string(),
                backend,
            }),
            registry,
        })
    }

    /// Gateway starting on `backend`, registered as `name`
    pub fn with_backend(backend: Box<dyn InferenceBackend>, name: &str) -> Self {
        Self {
            active: RwLock::new(Active {
                name: name.to_string(),
                backend,
            }),
            registry: BackendRegistry::new(),
        }
    }

    /// Registry name of the active backend
    pub async fn backend_name(&self) -> String {
        self.active.read().await.name.clone()
    }

    /// Every backend this build can switch to
    pub fn available_backends(&self) -> Vec<BackendInfo> {
        self.registry.list()
    }

    /// Replace the active backend with a fresh instance of `name`
    ///
    /// The old backend is stopped. The new one is not started.
    pub async fn switch_backend(&self, name: &str) -> Result<(), GatewayError> {
        let backend = self
            .registry
            .create(name)
            .map_err(|e| GatewayError::SwitchFailed(e.to_string()))?;

        let mut active = self.active.write().await;
        active.backend.stop();
        *active = Active {
            name: name.to_string(),
            backend,
        };

        log::info!("Switched to backend: {}", name);
        Ok(())
    }

    // ─── LIFECYCLE ──────────────────────────────────────────────────

    /// Start the active backend
    pub async fn start(&self, config: &BackendConfig) -> Result<(), GatewayError> {
        let mut active = self.active.write().await;
        active.backend.start(config).await?;
        log::info!("Backend {} ready", active.name);
        Ok(())
    }

    /// Stop the active backend
    pub async fn stop(&self) {
        self.active.write().await.backend.stop();
    }

    /// Whether the active backend accepts requests
    pub async fn is_ready(&self) -> bool {
        self.active.read().await.backend.is_ready()
    }

    /// Probe the active backend's service
    pub async fn health_check(&self) -> bool {
        self.active.read().await.backend.health_check().await
    }

    // ─── GENERATION ─────────────────────────────────────────────────

    /// Send one prompt to the active backend and return the full response
    pub async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let active = self.active.read().await;
        if !active.backend.is_ready() {
            return Err(BackendError::NotReady.into());
        }

        let started = Instant::now();
        let text = active.backend.generate(prompt).await?;
        log::debug!(
            "{} generated {} chars in {:?}",
            active.name,
            text.len(),
            started.elapsed()
        );
        Ok(text)
    }
}

#[cfg(feature = "backend-gemini")]
impl Default for InferenceGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Gateway shared between tasks
pub type SharedGateway = Arc<InferenceGateway>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendCapabilities;
    use async_trait::async_trait;

    /// Backend that echoes the prompt back in upper case
    struct EchoBackend {
        ready: bool,
    }

    #[async_trait]
    impl InferenceBackend for EchoBackend {
        fn name(&self) -> &'static str {
            "Echo"
        }

        fn description(&self) -> &'static str {
            "Echoes prompts"
        }

        fn capabilities(&self) -> BackendCapabilities {
            BackendCapabilities::default()
        }

        async fn start(&mut self, _config: &BackendConfig) -> Result<(), BackendError> {
            self.ready = true;
            Ok(())
        }

        fn stop(&mut self) {
            self.ready = false;
        }

        fn is_ready(&self) -> bool {
            self.ready
        }

        async fn health_check(&self) -> bool {
            self.ready
        }

        fn base_url(&self) -> Option<String> {
            None
        }

        async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
            Ok(prompt.to_uppercase())
        }
    }

    fn echo(ready: bool) -> InferenceGateway {
        InferenceGateway::with_backend(Box::new(EchoBackend { ready }), "Echo")
    }

    #[tokio::test]
    async fn test_generate_requires_start() {
        let gateway = echo(false);
        let err = gateway.generate("hi").await.unwrap_err();
        assert!(matches!(err, GatewayError::Backend(BackendError::NotReady)));

        gateway.start(&BackendConfig::default()).await.unwrap();
        assert!(gateway.health_check().await);
        assert_eq!(gateway.generate("hi").await.unwrap(), "HI");

        gateway.stop().await;
        assert!(!gateway.is_ready().await);
    }

    #[tokio::test]
    async fn test_switch_to_unknown_backend_fails() {
        let gateway = echo(true);
        let err = gateway.switch_backend("Missing").await.unwrap_err();
        assert!(matches!(err, GatewayError::SwitchFailed(_)));
        // The active backend is untouched
        assert_eq!(gateway.backend_name().await, "Echo");
        assert!(gateway.is_ready().await);
    }

    #[test]
    fn test_for_unknown_backend_is_config_error() {
        let err = InferenceGateway::for_backend("Missing").err().unwrap();
        assert!(matches!(err, GatewayError::Backend(BackendError::Config(_))));
    }

    #[cfg(feature = "backend-ollama")]
    #[tokio::test]
    async fn test_for_backend_builds_from_registry() {
        let gateway = InferenceGateway::for_backend("Ollama").unwrap();
        assert_eq!(gateway.backend_name().await, "Ollama");
        assert!(!gateway.is_ready().await);
    }

    #[cfg(feature = "backend-gemini")]
    #[tokio::test]
    async fn test_switch_replaces_name_and_backend() {
        let gateway = echo(true);

        gateway.switch_backend("Gemini").await.unwrap();

        assert_eq!(gateway.backend_name().await, "Gemini");
        assert!(!gateway.is_ready().await);
    }

    #[cfg(feature = "backend-gemini")]
    #[tokio::test]
    async fn test_initial_backend_is_gemini() {
        let gateway = InferenceGateway::new();
        assert_eq!(gateway.backend_name().await, "Gemini");
        assert!(!gateway.is_ready().await);
        assert!(gateway
            .available_backends()
            .iter()
            .any(|info| info.name == "Gemini"));
    }
}
