//! Backend registry
//!
//! Maps backend names to factories. Which backends exist is decided at
//! compile time by feature flags; the registry keeps them in registration
//! order so listings are stable.

use super::{BackendCapabilities, BackendError, BackendInfo, InferenceBackend};

#[cfg(feature = "backend-gemini")]
use super::GeminiBackend;

#[cfg(feature = "backend-ollama")]
use super::OllamaBackend;

#[cfg(any(feature = "backend-gemini", feature = "backend-ollama"))]
use crate::constants::backend_names;

/// Builds fresh, unstarted backend instances
pub trait BackendFactory: Send + Sync {
    /// Create a new backend instance
    fn create(&self) -> Box<dyn InferenceBackend>;

    /// Describe the backend without instantiating it
    fn info(&self) -> BackendInfo;
}

fn describe(
    name: &str,
    description: &str,
    capabilities: BackendCapabilities,
    unavailable_reason: Option<String>,
) -> BackendInfo {
    BackendInfo {
        name: name.to_string(),
        description: description.to_string(),
        capabilities,
        available: unavailable_reason.is_none(),
        unavailable_reason,
    }
}

#[cfg(feature = "backend-gemini")]
pub struct GeminiFactory;

#[cfg(feature = "backend-gemini")]
impl BackendFactory for GeminiFactory {
    fn create(&self) -> Box<dyn InferenceBackend> {
        Box::new(GeminiBackend::new())
    }

    fn info(&self) -> BackendInfo {
        // Reachability and the key are only known at start
        describe(
            backend_names::GEMINI,
            "Google Gemini via the Generative Language API",
            GeminiBackend::static_capabilities(),
            None,
        )
    }
}

#[cfg(feature = "backend-ollama")]
pub struct OllamaFactory;

#[cfg(feature = "backend-ollama")]
impl BackendFactory for OllamaFactory {
    fn create(&self) -> Box<dyn InferenceBackend> {
        Box::new(OllamaBackend::new())
    }

    fn info(&self) -> BackendInfo {
        describe(
            backend_names::OLLAMA,
            "Local Ollama daemon",
            OllamaBackend::static_capabilities(),
            OllamaBackend::unavailable_reason(),
        )
    }
}

/// Named backend factories in registration order
pub struct BackendRegistry {
    entries: Vec<(String, Box<dyn BackendFactory>)>,
}

impl BackendRegistry {
    /// Registry holding every backend compiled into this build
    pub fn new() -> Self {
        let mut registry = Self::empty();

        #[cfg(feature = "backend-gemini")]
        registry.register(backend_names::GEMINI, Box::new(GeminiFactory));

        #[cfg(feature = "backend-ollama")]
        registry.register(backend_names::OLLAMA, Box::new(OllamaFactory));

        registry
    }

    /// Registry with no backends
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a factory, replacing any previous one with the same name
    pub fn register(&mut self, name: &str, factory: Box<dyn BackendFactory>) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = factory,
            None => self.entries.push((name.to_string(), factory)),
        }
    }

    fn factory(&self, name: &str) -> Option<&dyn BackendFactory> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f.as_ref())
    }

    /// Registered names
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factory(name).is_some()
    }

    /// Description of one backend
    pub fn info(&self, name: &str) -> Option<BackendInfo> {
        self.factory(name).map(|f| f.info())
    }

    /// Descriptions of every registered backend
    pub fn list(&self) -> Vec<BackendInfo> {
        self.entries.iter().map(|(_, f)| f.info()).collect()
    }

    /// Create an unstarted backend by name
    pub fn create(&self, name: &str) -> Result<Box<dyn InferenceBackend>, BackendError> {
        self.factory(name)
            .map(|f| f.create())
            .ok_or_else(|| {
                BackendError::Config(format!(
                    "Unknown backend: {} (known: {})",
                    name,
                    self.names().join(", ")
                ))
            })
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_backend_is_config_error() {
        let registry = BackendRegistry::empty();
        assert!(registry.list().is_empty());
        assert!(registry.info("Nope").is_none());
        assert!(matches!(
            registry.create("Nope"),
            Err(BackendError::Config(_))
        ));
    }

    #[cfg(all(feature = "backend-gemini", feature = "backend-ollama"))]
    #[test]
    fn test_names_keep_registration_order() {
        let registry = BackendRegistry::new();
        assert_eq!(registry.names(), vec!["Gemini", "Ollama"]);
    }

    #[cfg(feature = "backend-gemini")]
    #[test]
    fn test_registry_has_gemini() {
        let registry = BackendRegistry::new();
        assert!(registry.contains("Gemini"));

        let info = registry.info("Gemini").unwrap();
        assert!(info.available);
        assert!(info.capabilities.requires_api_key);

        let backend = registry.create("Gemini").unwrap();
        assert_eq!(backend.name(), "Gemini");
        assert!(!backend.is_ready());
    }

    #[cfg(feature = "backend-gemini")]
    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = BackendRegistry::new();
        let before = registry.names().len();

        registry.register("Gemini", Box::new(GeminiFactory));

        assert_eq!(registry.names().len(), before);
    }

    #[cfg(feature = "backend-ollama")]
    #[test]
    fn test_ollama_availability_matches_reason() {
        let info = OllamaFactory.info();
        assert_eq!(info.available, info.unavailable_reason.is_none());
        assert!(info.capabilities.local);
    }
}
