//! Application configuration storage
//!
//! Settings come from `config.json` in the config directory, then from the
//! environment. A missing file yields defaults; a malformed one is an error.

use std::path::{Path, PathBuf};

use inference::constants::{backend_names, defaults};
use inference::{BackendConfig, GenerationSettings};
use serde::{Deserialize, Serialize};
use sigil_canvas::SeedFragment;
use tokio::fs;

use crate::constants::{env, paths};

/// Full application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Registry name of the backend (e.g., "Gemini", "Ollama")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    /// Model name override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Service base URL override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// API key for hosted services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Sampling settings
    #[serde(default)]
    pub settings: GenerationSettings,
    /// Startup layout; the built-in layout is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<Vec<SeedFragment>>,
}

impl AppConfig {
    /// Directory holding `config.json`
    ///
    /// `SIGIL_CONFIG_DIR` wins, then the platform config directory, then the
    /// working directory.
    pub fn default_dir() -> PathBuf {
        if let Some(dir) = read_env(env::CONFIG_DIR) {
            return PathBuf::from(dir);
        }
        dirs::config_dir()
            .map(|dir| dir.join(paths::APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load configuration from disk
    pub async fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(paths::CONFIG_FILE);

        if !fs::try_exists(&config_path).await? {
            log::debug!("No config at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path).await?;
        serde_json::from_str(&contents).map_err(ConfigError::Parse)
    }

    /// Save configuration to disk
    pub async fn save(&self, dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(dir).await?;

        let config_path = dir.join(paths::CONFIG_FILE);
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(&config_path, contents).await?;

        log::info!("Configuration saved to {:?}", config_path);
        Ok(())
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(read_env);
    }

    /// Overlay values from `lookup`; unset variables leave the file value
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = lookup(env::BACKEND) {
            self.backend = Some(backend);
        }
        if let Some(model) = lookup(env::MODEL) {
            self.model = Some(model);
        }
        if let Some(url) = lookup(env::BASE_URL) {
            self.base_url = Some(url);
        }
        if let Some(key) = lookup(env::GEMINI_API_KEY) {
            self.api_key = Some(key);
        }
    }

    /// The configured backend, Gemini if unset
    pub fn backend_name(&self) -> &str {
        self.backend.as_deref().unwrap_or(backend_names::GEMINI)
    }

    /// Build the backend start configuration
    ///
    /// Fails when the hosted backend is selected without an API key.
    pub fn backend_config(&self) -> Result<BackendConfig, ConfigError> {
        let is_gemini = self.backend_name() == backend_names::GEMINI;
        if is_gemini && self.api_key.is_none() {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(BackendConfig {
            model_name: self.model.clone().or_else(|| {
                is_gemini.then(|| defaults::GEMINI_MODEL.to_string())
            }),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            settings: self.settings.clone(),
        })
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(serde_json::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(serde_json::Error),
    #[error("No API key configured; set {} or apiKey in {}", env::GEMINI_API_KEY, paths::CONFIG_FILE)]
    MissingApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path()).await.unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn test_load_reads_camel_case_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{
                "backend": "Ollama",
                "model": "llama3.2",
                "baseUrl": "http://127.0.0.1:11434",
                "settings": { "temperature": 0.9 },
                "seed": [ { "content": "A tower", "position": { "x": 0.0, "y": 10.0 } } ]
            }"#,
        )
        .unwrap();

        let config = AppConfig::load(dir.path()).await.unwrap();

        assert_eq!(config.backend_name(), "Ollama");
        assert_eq!(config.base_url.as_deref(), Some("http://127.0.0.1:11434"));
        assert_eq!(config.settings.temperature, Some(0.9));
        assert_eq!(
            config.seed,
            Some(vec![SeedFragment::new("A tower", 0.0, 10.0)])
        );
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();

        let err = AppConfig::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let config = AppConfig {
            backend: Some("Ollama".to_string()),
            model: Some("mistral".to_string()),
            ..Default::default()
        };

        config.save(&nested).await.unwrap();

        assert_eq!(AppConfig::load(&nested).await.unwrap(), config);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = AppConfig {
            model: Some("from-file".to_string()),
            api_key: Some("file-key".to_string()),
            ..Default::default()
        };

        config.apply_overrides(lookup(&[
            ("GEMINI_API_KEY", "env-key"),
            ("SIGIL_BACKEND", "Ollama"),
        ]));

        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.backend_name(), "Ollama");
        // Unset variables keep the file value
        assert_eq!(config.model.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_gemini_without_key_is_fatal() {
        let config = AppConfig::default();
        assert_eq!(config.backend_name(), "Gemini");
        assert!(matches!(
            config.backend_config(),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_gemini_config_defaults_model() {
        let config = AppConfig {
            api_key: Some("secret".to_string()),
            ..Default::default()
        };

        let backend = config.backend_config().unwrap();
        assert_eq!(backend.model_name.as_deref(), Some("gemini-1.5-flash"));
        assert_eq!(backend.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_local_backend_needs_no_key() {
        let config = AppConfig {
            backend: Some("Ollama".to_string()),
            ..Default::default()
        };

        let backend = config.backend_config().unwrap();
        assert!(backend.api_key.is_none());
        assert!(backend.model_name.is_none());
    }
}
