//! Event handling and modal state transitions.
//!
//! This module is the modal state machine. Every input the modal can
//! receive, whether a keystroke, a camera decode, a permission answer or a
//! lookup response, arrives as an [`Event`] and is processed one at a time
//! by [`handle_event`], which mutates [`ModalState`] and returns the side
//! effects for the embedder to execute.
//!
//! # Event Types
//!
//! - **Lifecycle**: `Open`, `Close`, `SelectFood`, `TapCreateFood`
//! - **Search**: `Input`, `Tick`
//! - **Camera**: `TapScanIcon`, `PermissionResult`, `PermissionRevoked`,
//!   `BarcodeDecoded`, `CloseCamera`
//! - **Backend**: `LookupCompleted`
//!
//! # Example
//!
//! ```rust
//! use food_lookup::{handle_event, Action, Event, ModalState, ModalView};
//!
//! let mut state = ModalState::default();
//! let (render, actions) = handle_event(&mut state, &Event::Open { recent_foods: vec![] })?;
//! assert!(render);
//! assert!(actions.is_empty());
//! assert_eq!(state.view(), ModalView::Listing);
//! # Ok::<(), food_lookup::FoodLookupError>(())
//! ```

use super::debounce::InputSignal;
use super::modes::{CloseReason, ModalView};
use super::permission::AccessDecision;
use super::results::{ApplyOutcome, Seq};
use super::scan::{ScanEvent, ScanVerdict};
use super::state::{ModalState, Notice};
use super::Action;
use crate::domain::{FoodRecord, Result};
use crate::lookup::{LookupRequest, LookupResponse};
use chrono::{DateTime, Utc};

/// Inputs to the modal state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Shows the modal with the caller's recent foods as the default list.
    Open {
        /// Snapshot supplied by the caller; never re-fetched.
        recent_foods: Vec<FoodRecord>,
    },

    /// The search field changed.
    Input {
        /// Full field contents after the change.
        text: String,
        /// When the change happened.
        at: DateTime<Utc>,
    },

    /// Time has advanced; due debounced input is committed.
    Tick {
        /// Current time.
        at: DateTime<Utc>,
    },

    /// The barcode icon next to the search field was tapped.
    TapScanIcon,

    /// The host answered the camera permission request.
    PermissionResult {
        /// Whether access was granted.
        granted: bool,
    },

    /// The user withdrew camera access from outside the app.
    PermissionRevoked,

    /// The camera decoded a barcode.
    BarcodeDecoded(ScanEvent),

    /// The "close camera" control on the camera overlay.
    CloseCamera,

    /// The "create new food" button.
    TapCreateFood,

    /// A row of the displayed list was tapped.
    SelectFood {
        /// Position in the displayed list.
        index: usize,
    },

    /// The modal is being dismissed.
    Close {
        /// Which dismissal path was taken.
        reason: CloseReason,
    },

    /// A lookup dispatched earlier has finished.
    LookupCompleted(LookupResponse),
}

impl Event {
    /// Short name used in tracing spans.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Open { .. } => "open",
            Self::Input { .. } => "input",
            Self::Tick { .. } => "tick",
            Self::TapScanIcon => "tap_scan_icon",
            Self::PermissionResult { .. } => "permission_result",
            Self::PermissionRevoked => "permission_revoked",
            Self::BarcodeDecoded(_) => "barcode_decoded",
            Self::CloseCamera => "close_camera",
            Self::TapCreateFood => "tap_create_food",
            Self::SelectFood { .. } => "select_food",
            Self::Close { .. } => "close",
            Self::LookupCompleted(_) => "lookup_completed",
        }
    }
}

/// Processes an event, mutates modal state, and returns actions to execute.
///
/// # Returns
///
/// `(should_render, actions)`. `should_render` is `true` when anything
/// visible changed. Actions must be executed in order.
///
/// # Errors
///
/// Event handling itself does not fail today: lookup failures, stale
/// responses, denied permissions and out-of-place events are all absorbed
/// into state. The `Result` keeps the embedder contract stable.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut ModalState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!(
        "handle_event",
        event_type = event.name(),
        view = %state.view()
    )
    .entered();

    match event {
        Event::Open { recent_foods } => {
            if state.view().is_open() {
                tracing::debug!("modal already open, ignoring");
                return Ok((false, vec![]));
            }
            state.open_session(recent_foods.clone());
            Ok((true, vec![]))
        }
        Event::Input { text, at } => {
            if state.view() != ModalView::Listing {
                tracing::debug!("input outside listing view, ignoring");
                return Ok((false, vec![]));
            }

            state.search_text.clone_from(text);
            match state.debouncer.submit_input(text, *at) {
                InputSignal::Cleared => {
                    tracing::debug!("search cleared, showing recent foods");
                    state.clear_results();
                    Ok((true, vec![]))
                }
                InputSignal::Scheduled { due_at } => Ok((true, vec![Action::WakeAt(due_at)])),
            }
        }
        Event::Tick { at } => {
            state.dedup.prune(*at);

            if !matches!(state.view(), ModalView::Listing | ModalView::ScanningCamera) {
                return Ok((false, vec![]));
            }

            let Some(query) = state.debouncer.poll(*at, &mut state.sequencer) else {
                return Ok((false, vec![]));
            };

            tracing::debug!(query = %query.text, seq = %query.seq, "dispatching text lookup");
            Ok((false, vec![Action::Lookup(LookupRequest::search(query.seq, query.text))]))
        }
        Event::TapScanIcon => {
            if state.view() != ModalView::Listing {
                return Ok((false, vec![]));
            }

            match state.permission.request_access() {
                AccessDecision::Granted => {
                    state.notice = None;
                    state.transition(ModalView::ScanningCamera);
                    Ok((true, vec![Action::StartCamera]))
                }
                AccessDecision::Pending { prompt_host } => {
                    state.scan_requested = true;
                    let actions = if prompt_host {
                        vec![Action::RequestCameraPermission]
                    } else {
                        vec![]
                    };
                    Ok((true, actions))
                }
                AccessDecision::Denied => {
                    tracing::warn!("scan requested but camera permission is denied");
                    state.notice = Some(Notice::PermissionDenied);
                    Ok((true, vec![]))
                }
            }
        }
        Event::PermissionResult { granted } => {
            state.permission.resolve(*granted);

            if !state.scan_requested {
                return Ok((false, vec![]));
            }
            state.scan_requested = false;

            if state.view() != ModalView::Listing {
                return Ok((false, vec![]));
            }

            if *granted {
                state.notice = None;
                state.transition(ModalView::ScanningCamera);
                Ok((true, vec![Action::StartCamera]))
            } else {
                state.notice = Some(Notice::PermissionDenied);
                Ok((true, vec![]))
            }
        }
        Event::PermissionRevoked => {
            state.permission.revoke();
            state.scan_requested = false;

            if state.view() == ModalView::ScanningCamera {
                tracing::warn!("camera permission revoked while scanning");
                state.notice = Some(Notice::CameraRevoked);
                state.transition(ModalView::Listing);
                return Ok((true, vec![Action::StopCamera]));
            }
            Ok((false, vec![]))
        }
        Event::BarcodeDecoded(scan) => {
            if state.view() != ModalView::ScanningCamera || !state.permission.accepts_decodes() {
                tracing::debug!("decode outside active camera, ignoring");
                return Ok((false, vec![]));
            }

            if !state.accepts_format(scan.format) {
                tracing::debug!(format = %scan.format, "barcode format not accepted, ignoring");
                return Ok((false, vec![]));
            }

            if state.dedup.observe(scan) == ScanVerdict::Suppress {
                return Ok((false, vec![]));
            }

            state.debouncer.cancel();
            let seq = state.sequencer.next_seq();
            state.pending_barcode = Some(seq);
            state.transition(ModalView::Listing);

            tracing::debug!(barcode = %scan.barcode, seq = %seq, "dispatching barcode lookup");
            Ok((
                true,
                vec![
                    Action::StopCamera,
                    Action::Lookup(LookupRequest::barcode(seq, scan.barcode.clone())),
                ],
            ))
        }
        Event::CloseCamera => {
            if state.view() != ModalView::ScanningCamera {
                return Ok((false, vec![]));
            }
            state.transition(ModalView::Listing);
            Ok((true, vec![Action::StopCamera]))
        }
        Event::TapCreateFood => {
            if state.view() != ModalView::Listing {
                return Ok((false, vec![]));
            }
            state.transition(ModalView::CreatingFood);
            state.end_session();
            Ok((true, vec![Action::CreateFoodRequested]))
        }
        Event::SelectFood { index } => {
            if state.view() != ModalView::Listing {
                return Ok((false, vec![]));
            }

            let Some(record) = state.displayed().get(*index).cloned() else {
                tracing::debug!(index = index, "no food at selected index");
                return Ok((false, vec![]));
            };

            tracing::debug!(food_id = %record.id, food_name = %record.name, "food selected");
            state.end_session();
            Ok((true, vec![Action::FoodSelected(record)]))
        }
        Event::Close { reason } => {
            if !state.view().is_open() {
                return Ok((false, vec![]));
            }

            let mut actions = vec![];
            if state.view() == ModalView::ScanningCamera {
                actions.push(Action::StopCamera);
            }

            tracing::debug!(reason = ?reason, "closing modal");
            state.end_session();
            actions.push(Action::Dismissed { reason: *reason });
            Ok((true, actions))
        }
        Event::LookupCompleted(response) => match state.results.apply(response) {
            ApplyOutcome::Stale => Ok((false, vec![])),
            ApplyOutcome::Applied => {
                let barcode_answered = state.pending_barcode == Some(response.seq);
                settle_barcode(state, response);
                if barcode_answered && !state.displayed().is_empty() {
                    settle_barcode_match(state, response.seq);
                }
                state.notice = None;
                Ok((true, vec![]))
            }
            ApplyOutcome::Failed { message } => {
                tracing::warn!(seq = %response.seq, error = %message, "lookup failed");
                settle_barcode(state, response);
                state.notice = Some(Notice::LookupFailed { message });
                Ok((true, vec![]))
            }
        },
    }
}

/// Clears the search text after a barcode match unless the user has typed
/// since the scan. Pending input was dropped when the scan was accepted, so
/// any pending input or newer commit was typed afterwards and keeps the field.
fn settle_barcode_match(state: &mut ModalState, seq: Seq) {
    let typed_since_scan = state.debouncer.deadline().is_some()
        || state.sequencer.last_issued().is_some_and(|last| last > seq);
    if typed_since_scan {
        tracing::debug!(seq = %seq, "barcode matched, keeping newer search text");
        return;
    }

    tracing::debug!("barcode matched, clearing search text");
    state.search_text.clear();
    state.results.abandon_through(state.sequencer.last_issued());
}

/// Clears the in-flight barcode marker once a response at least as new as
/// the barcode lookup has been applied.
fn settle_barcode(state: &mut ModalState, response: &LookupResponse) {
    if state
        .pending_barcode
        .is_some_and(|pending| pending <= response.seq)
    {
        state.pending_barcode = None;
    }
}
