//! Event types for streaming canvas changes
//!
//! Events are sent from the session to the rendering layer (or any consumer)
//! to report committed changes to fragments, interaction mode transitions,
//! and cast progress.

use serde::{Deserialize, Serialize};

use crate::types::{Fragment, FragmentId, Position};

/// Trait for sending canvas events
///
/// This abstracts over the transport mechanism (UI channel, mpsc, etc.)
/// allowing the session to be driven from different front ends.
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be sent (e.g., channel closed)
    fn send(&self, event: CanvasEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// Why an edit session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditEndReason {
    /// Confirmation key pressed without modifier
    Confirmed,
    /// The editing surface lost focus
    FocusLost,
    /// The edited fragment was removed
    Removed,
    /// Another fragment entered edit mode
    Superseded,
    /// Explicit `end_edit` call
    Requested,
}

/// Events emitted by a canvas session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CanvasEvent {
    /// A fragment was created
    #[serde(rename_all = "camelCase")]
    FragmentAdded { fragment: Fragment },

    /// A fragment was deleted
    #[serde(rename_all = "camelCase")]
    FragmentRemoved { id: FragmentId },

    /// A fragment's text changed
    #[serde(rename_all = "camelCase")]
    ContentUpdated { id: FragmentId, content: String },

    /// A drag gesture committed a move
    #[serde(rename_all = "camelCase")]
    FragmentMoved {
        id: FragmentId,
        delta: Position,
        position: Position,
    },

    /// A drag gesture ended without movement
    #[serde(rename_all = "camelCase")]
    FragmentClicked { id: FragmentId },

    /// A fragment entered edit mode
    #[serde(rename_all = "camelCase")]
    EditStarted { id: FragmentId },

    /// A fragment left edit mode
    #[serde(rename_all = "camelCase")]
    EditEnded { id: FragmentId, reason: EditEndReason },

    /// A drag gesture began
    #[serde(rename_all = "camelCase")]
    DragStarted { id: FragmentId },

    /// A drag gesture was abandoned
    #[serde(rename_all = "camelCase")]
    DragCancelled { id: FragmentId },

    /// A prompt was submitted to the generation service
    #[serde(rename_all = "camelCase")]
    CastStarted { cast_id: String, prompt: String },

    /// The generation service returned text
    #[serde(rename_all = "camelCase")]
    CastCompleted { cast_id: String, text: String },

    /// The generation call failed; `message` is what the user sees
    #[serde(rename_all = "camelCase")]
    CastFailed { cast_id: String, message: String },
}

impl CanvasEvent {
    /// The fragment this event concerns, if any
    pub fn fragment_id(&self) -> Option<&str> {
        match self {
            Self::FragmentAdded { fragment } => Some(&fragment.id),
            Self::FragmentRemoved { id }
            | Self::ContentUpdated { id, .. }
            | Self::FragmentMoved { id, .. }
            | Self::FragmentClicked { id }
            | Self::EditStarted { id }
            | Self::EditEnded { id, .. }
            | Self::DragStarted { id }
            | Self::DragCancelled { id } => Some(id),
            Self::CastStarted { .. } | Self::CastCompleted { .. } | Self::CastFailed { .. } => {
                None
            }
        }
    }
}

/// Send an event, logging instead of failing when the sink is gone
pub(crate) fn emit(sink: &dyn EventSink, event: CanvasEvent) {
    if let Err(e) = sink.send(event) {
        log::warn!("Dropped canvas event: {}", e);
    }
}

/// A no-op event sink that discards all events
///
/// Useful for testing or when events aren't needed.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: CanvasEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: parking_lot::Mutex<Vec<CanvasEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<CanvasEvent> {
        self.events.lock().clone()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: CanvasEvent) -> Result<(), EventError> {
        self.events.lock().push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedSink;

    impl EventSink for ClosedSink {
        fn send(&self, _event: CanvasEvent) -> Result<(), EventError> {
            Err(EventError::channel_closed())
        }
    }

    #[test]
    fn test_vec_event_sink() {
        let sink = VecEventSink::new();

        sink.send(CanvasEvent::DragStarted {
            id: "sigil-1".to_string(),
        })
        .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].fragment_id(), Some("sigil-1"));

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = CanvasEvent::EditEnded {
            id: "sigil-2".to_string(),
            reason: EditEndReason::FocusLost,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "editEnded");
        assert_eq!(json["reason"], "focus_lost");
    }

    #[test]
    fn test_emit_swallows_closed_channel() {
        // Should not panic
        emit(
            &ClosedSink,
            CanvasEvent::FragmentRemoved {
                id: "sigil-9".to_string(),
            },
        );
    }
}
