//! Backend defaults
//!
//! Single source of truth for URLs, model names and environment variable
//! names used by the generation backends.

/// Default values for backend configuration
pub mod defaults {
    /// Base URL of the Generative Language API
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    /// Model used when none is configured
    pub const GEMINI_MODEL: &str = "gemini-1.5-flash";
    /// Base URL of a local Ollama daemon
    pub const OLLAMA_BASE_URL: &str = "http://127.0.0.1:11434";
    /// Model used for Ollama when none is configured
    pub const OLLAMA_MODEL: &str = "llama3.2";
    /// Request timeout for a single generation call
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
}

/// Backend names as registered in the registry
pub mod backend_names {
    pub const GEMINI: &str = "Gemini";
    pub const OLLAMA: &str = "Ollama";
}

/// Environment variables read by [`crate::BackendConfig::from_env`]
pub mod env {
    /// API key for the Gemini backend
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Overrides the backend base URL
    pub const BASE_URL: &str = "SIGIL_BASE_URL";
    /// Overrides the model name
    pub const MODEL: &str = "SIGIL_MODEL";
}
