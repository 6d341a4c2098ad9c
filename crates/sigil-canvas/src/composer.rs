//! Prompt composition and casting
//!
//! Fragments are read top to bottom: the prompt is every fragment's content
//! ordered by ascending `y`, ties kept in insertion order, joined with single
//! spaces. Contents are not trimmed, so an empty fragment still contributes a
//! separator.
//!
//! A cast works on the snapshot taken when it was submitted. The session may
//! keep changing while the request is in flight; only one cast may be in
//! flight at a time.

use std::cmp;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use inference::InferenceGateway;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::events::{emit, CanvasEvent, EventSink};
use crate::types::Fragment;

/// Instruction placed before the composed fragments
pub const PROMPT_PREAMBLE: &str =
    "Describe, in a mystical and epic tone, the image that would be generated from the following concept: ";

/// Text shown when the generation service fails for any reason
pub const FALLBACK_MESSAGE: &str = "The spell failed. The connection to the oracle was lost.";

/// Fragments in reading order (ascending `y`, stable on ties)
pub fn reading_order(fragments: &[Fragment]) -> Vec<&Fragment> {
    let mut ordered: Vec<&Fragment> = fragments.iter().collect();
    // slice::sort_by is stable, so equal y keeps insertion order
    ordered.sort_by(|a, b| compare_y(a.position.y, b.position.y));
    ordered
}

/// Numeric order where `-0.0 == 0.0` and NaN sorts after every number
fn compare_y(a: f64, b: f64) -> cmp::Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

/// Join fragment contents in reading order
pub fn compose_prompt(fragments: &[Fragment]) -> String {
    reading_order(fragments)
        .into_iter()
        .map(|f| f.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wrap a composed prompt in the instruction template
pub fn wrap_prompt(composed: &str) -> String {
    format!("{}{}", PROMPT_PREAMBLE, composed)
}

/// How a cast ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastStatus {
    Succeeded,
    Failed,
}

/// What the user is shown after a cast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastResult {
    pub cast_id: String,
    pub status: CastStatus,
    /// Generated text, or [`FALLBACK_MESSAGE`] on failure
    pub text: String,
}

/// State shared between a session and its in-flight cast
#[derive(Debug, Default)]
pub(crate) struct ComposerState {
    in_flight: AtomicBool,
    result: Mutex<Option<CastResult>>,
}

impl ComposerState {
    /// Claim the in-flight flag; None if a cast is already running
    pub(crate) fn try_claim(self: &Arc<Self>) -> Option<InFlightGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                state: Arc::clone(self),
            })
    }

    pub(crate) fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub(crate) fn result(&self) -> Option<CastResult> {
        self.result.lock().clone()
    }

    pub(crate) fn clear_result(&self) -> Option<CastResult> {
        self.result.lock().take()
    }

    fn set_result(&self, result: CastResult) {
        *self.result.lock() = Some(result);
    }
}

/// Releases the in-flight flag when dropped
///
/// Dropping happens on every exit path of a cast: normal completion, a
/// panic inside the backend, or the cast future being dropped unfinished.
#[derive(Debug)]
pub(crate) struct InFlightGuard {
    state: Arc<ComposerState>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.state.in_flight.store(false, Ordering::Release);
    }
}

/// A submitted cast waiting to be sent
///
/// Holds its own snapshot of the prompt, so the session stays free for
/// edits and drags while [`PendingCast::cast`] is awaited.
pub struct PendingCast {
    cast_id: String,
    composed: String,
    prompt: String,
    state: Arc<ComposerState>,
    events: Arc<dyn EventSink>,
    _guard: InFlightGuard,
}

impl PendingCast {
    pub(crate) fn new(
        fragments: &[Fragment],
        state: Arc<ComposerState>,
        events: Arc<dyn EventSink>,
        guard: InFlightGuard,
    ) -> Self {
        let composed = compose_prompt(fragments);
        let prompt = wrap_prompt(&composed);
        let cast_id = uuid::Uuid::new_v4().to_string();

        Self {
            cast_id,
            composed,
            prompt,
            state,
            events,
            _guard: guard,
        }
    }

    /// Identifier of this cast
    pub fn cast_id(&self) -> &str {
        &self.cast_id
    }

    /// Fragment contents in reading order, before templating
    pub fn composed(&self) -> &str {
        &self.composed
    }

    /// Full prompt sent to the service
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Send the prompt and record what the user should see
    ///
    /// Never fails: a generation error is logged and replaced by
    /// [`FALLBACK_MESSAGE`]. The in-flight flag is released when this
    /// returns.
    pub async fn cast(self, gateway: &InferenceGateway) -> CastResult {
        log::info!("Casting {} ({} chars)", self.cast_id, self.prompt.len());
        emit(
            self.events.as_ref(),
            CanvasEvent::CastStarted {
                cast_id: self.cast_id.clone(),
                prompt: self.prompt.clone(),
            },
        );

        let result = match gateway.generate(&self.prompt).await {
            Ok(text) => {
                log::info!("Cast {} succeeded", self.cast_id);
                emit(
                    self.events.as_ref(),
                    CanvasEvent::CastCompleted {
                        cast_id: self.cast_id.clone(),
                        text: text.clone(),
                    },
                );
                CastResult {
                    cast_id: self.cast_id.clone(),
                    status: CastStatus::Succeeded,
                    text,
                }
            }
            Err(e) => {
                log::error!("Cast {} failed: {}", self.cast_id, e);
                emit(
                    self.events.as_ref(),
                    CanvasEvent::CastFailed {
                        cast_id: self.cast_id.clone(),
                        message: FALLBACK_MESSAGE.to_string(),
                    },
                );
                CastResult {
                    cast_id: self.cast_id.clone(),
                    status: CastStatus::Failed,
                    text: FALLBACK_MESSAGE.to_string(),
                }
            }
        };

        self.state.set_result(result.clone());
        result
    }
}

impl std::fmt::Debug for PendingCast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingCast")
            .field("cast_id", &self.cast_id)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}
