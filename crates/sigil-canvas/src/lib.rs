//! Sigil Canvas - spatial prompt composition
//!
//! This crate holds the model behind the Sigil canvas: free-floating text
//! fragments that the user places, edits and drags, and that are read top to
//! bottom into a single prompt. It supports:
//!
//! - An owned fragment store with stable, never-reused ids
//! - Drag gestures that commit their net offset exactly once
//! - Single edit sessions with text-surface key routing
//! - Casting the composed prompt through an [`inference::InferenceGateway`]
//!
//! # Architecture
//!
//! - `CanvasSession`: Owns the store and interaction mode; the only entry point
//!   for a rendering layer
//! - `PendingCast`: A snapshot of the canvas that can be awaited without
//!   holding the session
//! - `EventSink`: Generic event streaming (not tied to any UI toolkit)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sigil_canvas::{CanvasSession, NullEventSink};
//!
//! let session = CanvasSession::seeded(Arc::new(NullEventSink));
//! if let Some(pending) = session.submit() {
//!     let result = pending.cast(&gateway).await;
//!     println!("{}", result.text);
//! }
//! ```

pub mod composer;
pub mod drag;
pub mod edit;
pub mod error;
pub mod events;
pub mod interaction;
pub mod session;
pub mod store;
pub mod types;

// Re-export key types
pub use composer::{
    compose_prompt, reading_order, wrap_prompt, CastResult, CastStatus, PendingCast,
    FALLBACK_MESSAGE, PROMPT_PREAMBLE,
};
pub use drag::DragOutcome;
pub use edit::{ArrowKey, Key, KeyInput, KeyOutcome};
pub use error::{CanvasError, Result};
pub use events::{CanvasEvent, EditEndReason, EventError, EventSink, NullEventSink, VecEventSink};
pub use interaction::InteractionMode;
pub use session::CanvasSession;
pub use store::FragmentStore;
pub use types::{default_seed, Fragment, FragmentId, Position, SeedFragment};
