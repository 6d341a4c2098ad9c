//! Error types for the canvas
//!
//! Operations on absent fragments and rejected interactions are not errors;
//! they report `false` or a no-op outcome instead.

use thiserror::Error;

use crate::events::EventError;

/// Result type alias using CanvasError
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Errors that can occur in the canvas
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Event could not be delivered
    #[error("{0}")]
    Event(#[from] EventError),
}
