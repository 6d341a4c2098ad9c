//! Drag gesture accumulation
//!
//! A drag tracks the pointer's offset from where the gesture started and
//! only writes it to the store when the gesture is released. Each move
//! reports the whole offset so far, not a step, so a gesture that returns
//! to its start point releases with an exact zero. Intermediate moves are
//! visible through [`DragState::offset`] for rendering feedback but never
//! reach the store, so other readers only ever see the pre-drag or the final
//! position.

use serde::Serialize;

use crate::types::{FragmentId, Position};

/// An in-progress drag of one fragment
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    fragment_id: FragmentId,
    offset: Position,
    moves: u32,
}

impl DragState {
    /// Begin a drag of `fragment_id` with no offset
    pub fn new(fragment_id: impl Into<FragmentId>) -> Self {
        Self {
            fragment_id: fragment_id.into(),
            offset: Position::ZERO,
            moves: 0,
        }
    }

    /// The fragment being dragged
    pub fn fragment_id(&self) -> &str {
        &self.fragment_id
    }

    /// Total offset accumulated so far
    pub fn offset(&self) -> Position {
        self.offset
    }

    /// Number of pointer moves seen
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Record the pointer's current offset from the drag start
    pub fn update(&mut self, offset: Position) {
        self.offset = offset;
        self.moves += 1;
    }

    /// Finish the gesture
    ///
    /// A gesture whose net offset is zero in both axes is a click, not a move.
    pub fn release(self) -> DragRelease {
        if self.offset.is_zero() {
            DragRelease::Click(self.fragment_id)
        } else {
            DragRelease::Move(self.fragment_id, self.offset)
        }
    }
}

/// What a released gesture asks the store to do
#[derive(Debug, Clone, PartialEq)]
pub enum DragRelease {
    /// No movement; leave the store alone
    Click(FragmentId),
    /// Apply this delta exactly once
    Move(FragmentId, Position),
}

/// Result of ending or cancelling a drag, as reported to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DragOutcome {
    /// The fragment was moved by `delta` and now sits at `position`
    #[serde(rename_all = "camelCase")]
    Moved {
        id: FragmentId,
        delta: Position,
        position: Position,
    },
    /// Released without net movement
    Clicked { id: FragmentId },
    /// Abandoned; the offset was discarded
    Cancelled { id: FragmentId },
    /// There was no drag to finish
    NoDrag,
}

impl DragOutcome {
    /// Whether the store was mutated
    pub fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}
