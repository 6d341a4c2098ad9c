//! Canvas session - the top-level controller
//!
//! A [`CanvasSession`] owns the fragment store, the current interaction mode
//! and the cast state, and is the only thing a rendering layer talks to.
//! Every intent the user can express (add, remove, edit, drag, submit) is a
//! method here; every committed change is reported through the session's
//! [`EventSink`].
//!
//! # Interaction rules
//!
//! - One drag at a time. A drag cannot start on the fragment being edited;
//!   starting it on another fragment moves focus away and ends that edit.
//! - One edit at a time. `begin_edit` supersedes the previous edit, and is
//!   rejected while any drag is in progress.
//! - Removing a fragment releases any edit or drag that referred to it.

use std::sync::Arc;

use crate::composer::{CastResult, ComposerState, PendingCast};
use crate::drag::{DragOutcome, DragRelease, DragState};
use crate::edit::{route_edit_key, KeyInput, KeyOutcome};
use crate::error::Result;
use crate::events::{emit, CanvasEvent, EditEndReason, EventSink, NullEventSink};
use crate::interaction::InteractionMode;
use crate::store::FragmentStore;
use crate::types::{Fragment, FragmentId, Position, SeedFragment};

/// Explicit owned state for one canvas
pub struct CanvasSession {
    store: FragmentStore,
    mode: InteractionMode,
    composer: Arc<ComposerState>,
    events: Arc<dyn EventSink>,
}

impl CanvasSession {
    /// Create a session over an existing store
    pub fn with_store(store: FragmentStore, events: Arc<dyn EventSink>) -> Self {
        Self {
            store,
            mode: InteractionMode::Idle,
            composer: Arc::new(ComposerState::default()),
            events,
        }
    }

    /// Create a session with an empty canvas
    pub fn new(events: Arc<dyn EventSink>) -> Self {
        Self::with_store(FragmentStore::new(), events)
    }

    /// Create a session holding the default starting layout
    pub fn seeded(events: Arc<dyn EventSink>) -> Self {
        Self::with_store(FragmentStore::seeded(), events)
    }

    /// Create a session from a startup layout
    pub fn with_seed(seed: impl IntoIterator<Item = SeedFragment>, events: Arc<dyn EventSink>) -> Self {
        Self::with_store(FragmentStore::with_seed(seed), events)
    }

    // ─── READ ───────────────────────────────────────────────────────

    /// Snapshot of all fragments in insertion order
    pub fn fragments(&self) -> Vec<Fragment> {
        self.store.list()
    }

    /// Find a fragment by id
    pub fn fragment(&self, id: &str) -> Option<&Fragment> {
        self.store.get(id)
    }

    /// The underlying store
    pub fn store(&self) -> &FragmentStore {
        &self.store
    }

    /// The current interaction mode
    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// The fragment in edit mode, if any
    pub fn editing_id(&self) -> Option<&str> {
        self.mode.editing_id()
    }

    /// The fragment being dragged, if any
    pub fn dragging_id(&self) -> Option<&str> {
        self.mode.dragging_id()
    }

    /// Fragments as JSON for the rendering layer
    pub fn view_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.store.list())?)
    }

    /// Send every current fragment to `sink` as `FragmentAdded`
    ///
    /// Used to bring a newly attached renderer up to date.
    pub fn replay_to(&self, sink: &dyn EventSink) -> Result<()> {
        for fragment in self.store.iter() {
            sink.send(CanvasEvent::FragmentAdded {
                fragment: fragment.clone(),
            })?;
        }
        Ok(())
    }

    // ─── FRAGMENTS ──────────────────────────────────────────────────

    /// Add a fragment and return its id
    pub fn add(&mut self, content: impl Into<String>, position: Position) -> FragmentId {
        let id = self.store.add(content, position);
        self.emit_added(&id);
        id
    }

    /// Add a fragment with the default content and position
    pub fn add_default(&mut self) -> FragmentId {
        let id = self.store.add_default();
        self.emit_added(&id);
        id
    }

    fn emit_added(&self, id: &str) {
        if let Some(fragment) = self.store.get(id) {
            log::debug!("Added fragment {}", id);
            self.emit(CanvasEvent::FragmentAdded {
                fragment: fragment.clone(),
            });
        }
    }

    /// Remove a fragment
    ///
    /// Ends the edit session or discards the drag that referred to it.
    /// Returns false (and does nothing) if the id is not present.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.store.remove(id).is_none() {
            return false;
        }

        if self.mode.editing_id() == Some(id) {
            self.finish_edit(EditEndReason::Removed);
        } else if self.mode.dragging_id() == Some(id) {
            self.mode = InteractionMode::Idle;
            self.emit(CanvasEvent::DragCancelled { id: id.to_string() });
        }

        log::debug!("Removed fragment {}", id);
        self.emit(CanvasEvent::FragmentRemoved { id: id.to_string() });
        true
    }

    /// Replace a fragment's content verbatim
    ///
    /// Called for every keystroke while editing. Returns false if the id is
    /// not present.
    pub fn update_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        let content = content.into();
        if !self.store.update_content(id, content.clone()) {
            return false;
        }
        self.emit(CanvasEvent::ContentUpdated {
            id: id.to_string(),
            content,
        });
        true
    }

    // ─── EDIT SESSION ───────────────────────────────────────────────

    /// Put a fragment into edit mode
    ///
    /// Supersedes any other edit session. Rejected while a drag is in
    /// progress or when the id is not present.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        if let Some(dragged) = self.mode.dragging_id() {
            log::debug!("Edit of {} rejected: {} is being dragged", id, dragged);
            return false;
        }
        if !self.store.contains(id) {
            return false;
        }
        if self.mode.editing_id() == Some(id) {
            return true;
        }

        if self.mode.editing_id().is_some() {
            self.finish_edit(EditEndReason::Superseded);
        }

        self.mode = InteractionMode::Editing(id.to_string());
        self.emit(CanvasEvent::EditStarted { id: id.to_string() });
        true
    }

    /// Leave edit mode
    ///
    /// Returns the id that was being edited, if any.
    pub fn end_edit(&mut self) -> Option<FragmentId> {
        self.finish_edit(EditEndReason::Requested)
    }

    /// The editing surface lost focus
    ///
    /// Ends the edit session and cancels any drag in progress.
    pub fn focus_lost(&mut self) {
        match self.mode {
            InteractionMode::Editing(_) => {
                self.finish_edit(EditEndReason::FocusLost);
            }
            InteractionMode::Dragging(_) => {
                self.drag_cancel();
            }
            InteractionMode::Idle => {}
        }
    }

    /// Route a key press that arrived while editing
    ///
    /// Enter without Shift ends the session here; everything else is left
    /// to the text surface, which reports changes through `update_content`.
    pub fn handle_edit_key(&mut self, input: &KeyInput) -> KeyOutcome {
        if self.mode.editing_id().is_none() {
            return KeyOutcome::Ignored;
        }

        let outcome = route_edit_key(input);
        if outcome == KeyOutcome::EndEdit {
            self.finish_edit(EditEndReason::Confirmed);
        }
        outcome
    }

    fn finish_edit(&mut self, reason: EditEndReason) -> Option<FragmentId> {
        if self.mode.editing_id().is_none() {
            return None;
        }
        let InteractionMode::Editing(id) = std::mem::take(&mut self.mode) else {
            return None;
        };
        self.emit(CanvasEvent::EditEnded {
            id: id.clone(),
            reason,
        });
        Some(id)
    }

    // ─── DRAG ───────────────────────────────────────────────────────

    /// Start dragging a fragment
    ///
    /// Rejected when another drag is active, when the fragment is being
    /// edited, or when the id is not present.
    pub fn drag_start(&mut self, id: &str) -> bool {
        if let Some(active) = self.mode.dragging_id() {
            log::debug!("Drag of {} rejected: {} already dragging", id, active);
            return false;
        }
        if self.mode.editing_id() == Some(id) {
            log::debug!("Drag of {} rejected: fragment is being edited", id);
            return false;
        }
        if !self.store.contains(id) {
            return false;
        }

        if self.mode.editing_id().is_some() {
            self.finish_edit(EditEndReason::FocusLost);
        }

        self.mode = InteractionMode::Dragging(DragState::new(id));
        self.emit(CanvasEvent::DragStarted { id: id.to_string() });
        true
    }

    /// Report the pointer's offset from where the active drag started
    ///
    /// Each call replaces the pending offset; nothing is written to the
    /// store. Returns false if no drag is active.
    pub fn drag_move(&mut self, offset: Position) -> bool {
        match &mut self.mode {
            InteractionMode::Dragging(drag) => {
                drag.update(offset);
                true
            }
            _ => false,
        }
    }

    /// Pending offset of the active drag, for rendering feedback
    pub fn drag_offset(&self) -> Option<(&str, Position)> {
        self.mode.drag_offset()
    }

    /// Release the active drag
    ///
    /// Commits the last reported offset with exactly one `update_position`,
    /// unless the net offset is zero (a click).
    pub fn drag_end(&mut self) -> DragOutcome {
        let drag = match std::mem::take(&mut self.mode) {
            InteractionMode::Dragging(drag) => drag,
            other => {
                self.mode = other;
                return DragOutcome::NoDrag;
            }
        };

        match drag.release() {
            DragRelease::Click(id) => {
                self.emit(CanvasEvent::FragmentClicked { id: id.clone() });
                DragOutcome::Clicked { id }
            }
            DragRelease::Move(id, delta) => match self.store.update_position(&id, delta) {
                Some(position) => {
                    log::debug!("Moved fragment {} by ({}, {})", id, delta.x, delta.y);
                    self.emit(CanvasEvent::FragmentMoved {
                        id: id.clone(),
                        delta,
                        position,
                    });
                    DragOutcome::Moved {
                        id,
                        delta,
                        position,
                    }
                }
                None => {
                    self.emit(CanvasEvent::DragCancelled { id: id.clone() });
                    DragOutcome::Cancelled { id }
                }
            },
        }
    }

    /// Abandon the active drag, discarding its offset
    pub fn drag_cancel(&mut self) -> DragOutcome {
        match std::mem::take(&mut self.mode) {
            InteractionMode::Dragging(drag) => {
                let id = drag.fragment_id().to_string();
                self.emit(CanvasEvent::DragCancelled { id: id.clone() });
                DragOutcome::Cancelled { id }
            }
            other => {
                self.mode = other;
                DragOutcome::NoDrag
            }
        }
    }

    // ─── CAST ───────────────────────────────────────────────────────

    /// Snapshot the canvas and prepare a cast
    ///
    /// Returns None while another cast is in flight.
    pub fn submit(&self) -> Option<PendingCast> {
        let Some(guard) = self.composer.try_claim() else {
            log::debug!("Submit ignored: a cast is already in flight");
            return None;
        };

        Some(PendingCast::new(
            &self.store.list(),
            Arc::clone(&self.composer),
            Arc::clone(&self.events),
            guard,
        ))
    }

    /// Whether a cast is in flight (the trigger should be disabled)
    pub fn is_casting(&self) -> bool {
        self.composer.is_in_flight()
    }

    /// The most recent cast result, if it has not been dismissed
    pub fn result(&self) -> Option<CastResult> {
        self.composer.result()
    }

    /// Close the result, returning it
    pub fn dismiss_result(&self) -> Option<CastResult> {
        self.composer.clear_result()
    }

    fn emit(&self, event: CanvasEvent) {
        emit(self.events.as_ref(), event);
    }
}

impl Default for CanvasSession {
    fn default() -> Self {
        Self::new(Arc::new(NullEventSink))
    }
}

impl std::fmt::Debug for CanvasSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasSession")
            .field("store", &self.store)
            .field("mode", &self.mode)
            .field("casting", &self.is_casting())
            .finish_non_exhaustive()
    }
}
