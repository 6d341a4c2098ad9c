//! The single pointer/keyboard interaction mode
//!
//! At most one fragment is dragged and at most one is edited, and never the
//! same fragment both ways. Holding both in one enum makes those rules a
//! property of the type.

use crate::drag::DragState;
use crate::types::{FragmentId, Position};

/// What the user is currently doing on the canvas
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionMode {
    /// Nothing in progress
    #[default]
    Idle,
    /// A drag gesture is in progress
    Dragging(DragState),
    /// A fragment's text is being edited
    Editing(FragmentId),
}

impl InteractionMode {
    /// Whether nothing is in progress
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The fragment being dragged, if any
    pub fn dragging_id(&self) -> Option<&str> {
        match self {
            Self::Dragging(drag) => Some(drag.fragment_id()),
            _ => None,
        }
    }

    /// The fragment being edited, if any
    pub fn editing_id(&self) -> Option<&str> {
        match self {
            Self::Editing(id) => Some(id),
            _ => None,
        }
    }

    /// Pending drag offset for rendering feedback
    pub fn drag_offset(&self) -> Option<(&str, Position)> {
        match self {
            Self::Dragging(drag) => Some((drag.fragment_id(), drag.offset())),
            _ => None,
        }
    }

    /// Whether `id` is involved in the current interaction
    pub fn involves(&self, id: &str) -> bool {
        self.dragging_id() == Some(id) || self.editing_id() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let idle = InteractionMode::default();
        assert!(idle.is_idle());
        assert!(idle.dragging_id().is_none());
        assert!(idle.editing_id().is_none());

        let editing = InteractionMode::Editing("sigil-1".to_string());
        assert_eq!(editing.editing_id(), Some("sigil-1"));
        assert!(editing.involves("sigil-1"));
        assert!(!editing.involves("sigil-2"));

        let mut drag = DragState::new("sigil-2");
        drag.update(Position::new(3.0, 4.0));
        let dragging = InteractionMode::Dragging(drag);
        assert_eq!(dragging.dragging_id(), Some("sigil-2"));
        assert_eq!(
            dragging.drag_offset(),
            Some(("sigil-2", Position::new(3.0, 4.0)))
        );
    }
}
