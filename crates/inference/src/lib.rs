//! Text-generation boundary for Sigil
//!
//! This library provides a unified interface over hosted and local
//! text-generation services:
//! - **Gemini**: Google Generative Language API (default)
//! - **Ollama**: Integration with a local Ollama daemon
//!
//! # Example
//!
//! ```rust,ignore
//! use inference::{BackendConfig, InferenceGateway};
//!
//! let gateway = InferenceGateway::new();
//! gateway.start(&BackendConfig::from_env()).await?;
//! let text = gateway.generate("Describe a lone knight").await?;
//! ```

pub mod backend;
pub mod config;
pub mod constants;
pub mod gateway;
pub mod types;

// Re-exports for convenience
pub use backend::{
    BackendCapabilities, BackendConfig, BackendError, BackendFactory, BackendInfo,
    BackendRegistry, InferenceBackend,
};

#[cfg(feature = "backend-gemini")]
pub use backend::GeminiBackend;

#[cfg(feature = "backend-ollama")]
pub use backend::OllamaBackend;

pub use config::GenerationSettings;
pub use gateway::{GatewayError, InferenceGateway, SharedGateway};
