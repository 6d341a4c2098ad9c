//! Gemini backend implementation
//!
//! Talks to the Generative Language API with a single, non-streaming
//! `generateContent` call per prompt.

use std::time::Duration;

use async_trait::async_trait;

use super::{BackendCapabilities, BackendConfig, BackendError, InferenceBackend};
use crate::config::GenerationSettings;
use crate::constants::defaults;
use crate::types::{GenerateContentRequest, GenerateContentResponse};

/// Gemini backend using an API key
pub struct GeminiBackend {
    /// HTTP client for API requests (built on start)
    http_client: Option<reqwest::Client>,
    /// Base URL of the API (set on start)
    base_url: Option<String>,
    /// Model used for generation
    model: String,
    /// API key (set on start, cleared on stop)
    api_key: Option<String>,
    /// Sampling settings
    settings: GenerationSettings,
}

impl GeminiBackend {
    /// Create a new, unstarted Gemini backend
    pub fn new() -> Self {
        Self {
            http_client: None,
            base_url: None,
            model: defaults::GEMINI_MODEL.to_string(),
            api_key: None,
            settings: GenerationSettings::default(),
        }
    }

    /// Get static capabilities (for registry info before instantiation)
    pub fn static_capabilities() -> BackendCapabilities {
        BackendCapabilities {
            streaming: false,
            requires_api_key: true,
            local: false,
        }
    }

    /// Model currently configured
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, base_url: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl Default for GeminiBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the response text out of a `generateContent` body
pub(crate) fn parse_generate_response(body: &str) -> Result<String, BackendError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| BackendError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    response
        .text()
        .ok_or_else(|| BackendError::MalformedResponse("response contained no text".to_string()))
}

#[async_trait]
impl InferenceBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn description(&self) -> &'static str {
        "Google Gemini via the Generative Language API. Requires GEMINI_API_KEY."
    }

    fn capabilities(&self) -> BackendCapabilities {
        Self::static_capabilities()
    }

    async fn start(&mut self, config: &BackendConfig) -> Result<(), BackendError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| BackendError::Config("Gemini requires an API key".to_string()))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS))
            .build()?;

        if let Some(model) = &config.model_name {
            self.model = model.clone();
        }
        self.settings = config.settings.clone();
        self.api_key = Some(api_key);
        self.http_client = Some(http_client);
        self.base_url = Some(
            config
                .base_url
                .clone()
                .unwrap_or_else(|| defaults::GEMINI_BASE_URL.to_string()),
        );

        log::info!("Gemini backend ready (model: {})", self.model);
        Ok(())
    }

    fn stop(&mut self) {
        self.http_client = None;
        self.api_key = None;
        self.base_url = None;
    }

    fn is_ready(&self) -> bool {
        self.http_client.is_some() && self.api_key.is_some() && self.base_url.is_some()
    }

    async fn health_check(&self) -> bool {
        let (Some(client), Some(base_url), Some(api_key)) =
            (&self.http_client, &self.base_url, &self.api_key)
        else {
            return false;
        };

        let url = format!("{}/models/{}", base_url.trim_end_matches('/'), self.model);
        match client
            .get(&url)
            .header("x-goog-api-key", api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn base_url(&self) -> Option<String> {
        self.base_url.clone()
    }

    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let client = self.http_client.as_ref().ok_or(BackendError::NotReady)?;
        let base_url = self.base_url.as_ref().ok_or(BackendError::NotReady)?;
        let api_key = self.api_key.as_ref().ok_or(BackendError::NotReady)?;

        let request = GenerateContentRequest::user_prompt(prompt, &self.settings);
        log::debug!("Gemini request to model {} ({} chars)", self.model, prompt.len());

        let response = client
            .post(self.endpoint(base_url))
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(BackendError::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(BackendError::Http)?;

        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }

        parse_generate_response(&body)
    }
}
