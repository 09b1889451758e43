//! Replay execution.

use super::script::{DeliveryOrder, Script, StepAction};
use crate::app::{handle_event, Action, Event, ModalState, ScanEvent};
use crate::domain::{FoodLookupError, Result};
use crate::lookup::{LookupRequest, LookupService, LookupWorker};
use crate::ui::{render_to_string, ModalViewModel};
use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

/// Everything observed during a replay.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    /// Rendered frames and callback lines, in the order they happened.
    pub transcript: Vec<String>,

    /// Actions addressed to the embedder (camera control, permission prompt,
    /// selection, creation, dismissal), in order.
    pub callbacks: Vec<Action>,

    /// Number of lookups the modal dispatched.
    pub lookups_dispatched: usize,

    /// Number of `Tick` events delivered for requested wake-ups.
    pub wakes_fired: usize,

    /// View model after the last step.
    pub final_view: ModalViewModel,
}

/// Runs a [`Script`] against a modal and a lookup backend.
pub struct ReplayDriver<S> {
    worker: LookupWorker<S>,
    state: ModalState,
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    last_at_ms: u64,
    wake: Option<DateTime<Utc>>,
    pending: VecDeque<LookupRequest>,
    transcript: Vec<String>,
    callbacks: Vec<Action>,
    lookups_dispatched: usize,
    wakes_fired: usize,
}

impl<S: LookupService> ReplayDriver<S> {
    /// Creates a driver whose script time zero is `start`.
    pub fn new(worker: LookupWorker<S>, state: ModalState, start: DateTime<Utc>) -> Self {
        Self {
            worker,
            state,
            start,
            now: start,
            last_at_ms: 0,
            wake: None,
            pending: VecDeque::new(),
            transcript: Vec::new(),
            callbacks: Vec::new(),
            lookups_dispatched: 0,
            wakes_fired: 0,
        }
    }

    /// Executes every step, then lets outstanding timers fire and answers
    /// remaining lookups oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`FoodLookupError::Script`] if step times go backwards, or any
    /// error from event handling.
    pub fn run(mut self, script: &Script) -> Result<ReplayReport> {
        let _span = tracing::info_span!("replay", steps = script.steps.len()).entered();

        for (index, step) in script.steps.iter().enumerate() {
            if let Some(at_ms) = step.at_ms {
                if at_ms < self.last_at_ms {
                    return Err(FoodLookupError::Script(format!(
                        "step {index} at {at_ms}ms is earlier than the previous step at {}ms",
                        self.last_at_ms
                    )));
                }
                self.last_at_ms = at_ms;
            }
            let at = self
                .start
                .checked_add_signed(millis(self.last_at_ms))
                .ok_or_else(|| {
                    FoodLookupError::Script(format!("step {index} time is out of range"))
                })?;
            self.advance_to(at)?;

            tracing::debug!(step = index, at_ms = self.last_at_ms, action = ?step.action, "replaying step");
            self.run_step(&step.action)?;
        }

        self.drain()?;

        Ok(ReplayReport {
            transcript: self.transcript,
            callbacks: self.callbacks,
            lookups_dispatched: self.lookups_dispatched,
            wakes_fired: self.wakes_fired,
            final_view: self.state.compute_viewmodel(),
        })
    }

    fn run_step(&mut self, action: &StepAction) -> Result<()> {
        let event = match action {
            StepAction::Open { recent_foods } => Event::Open {
                recent_foods: recent_foods.clone(),
            },
            StepAction::Type { text } => Event::Input {
                text: text.clone(),
                at: self.now,
            },
            StepAction::Wait => return Ok(()),
            StepAction::TapScan => Event::TapScanIcon,
            StepAction::Permission { granted } => Event::PermissionResult { granted: *granted },
            StepAction::Revoke => Event::PermissionRevoked,
            StepAction::Scan { barcode, format } => {
                Event::BarcodeDecoded(ScanEvent::new(barcode.clone(), *format, self.now))
            }
            StepAction::CloseCamera => Event::CloseCamera,
            StepAction::TapCreate => Event::TapCreateFood,
            StepAction::Select { index } => Event::SelectFood { index: *index },
            StepAction::Close { reason } => Event::Close { reason: *reason },
            StepAction::Deliver { order, count } => {
                let count = count.unwrap_or(self.pending.len());
                return self.deliver(*order, count);
            }
        };

        self.dispatch(&event)
    }

    /// Fires the requested wake-up if it is due by `at`. A tick may request
    /// a new wake-up, so this repeats until none is due.
    fn advance_to(&mut self, at: DateTime<Utc>) -> Result<()> {
        while let Some(due) = self.wake.filter(|due| *due <= at) {
            self.wake = None;
            self.now = due;
            self.wakes_fired += 1;
            self.dispatch(&Event::Tick { at: due })?;
        }
        self.now = at;
        Ok(())
    }

    fn deliver(&mut self, order: DeliveryOrder, count: usize) -> Result<()> {
        for _ in 0..count {
            let request = match order {
                DeliveryOrder::Fifo => self.pending.pop_front(),
                DeliveryOrder::Lifo => self.pending.pop_back(),
            };
            let Some(request) = request else {
                break;
            };

            let response = self.worker.handle_request(&request);
            self.transcript.push(format!("<< lookup {} answered", response.seq));
            self.dispatch(&Event::LookupCompleted(response))?;
        }
        Ok(())
    }

    /// Fires remaining timers, then answers remaining lookups oldest first.
    fn drain(&mut self) -> Result<()> {
        loop {
            if let Some(due) = self.wake {
                self.advance_to(due)?;
            } else if !self.pending.is_empty() {
                let count = self.pending.len();
                self.deliver(DeliveryOrder::Fifo, count)?;
            } else {
                return Ok(());
            }
        }
    }

    fn dispatch(&mut self, event: &Event) -> Result<()> {
        let (should_render, actions) = handle_event(&mut self.state, event)?;

        for action in actions {
            match action {
                Action::Lookup(request) => {
                    self.transcript
                        .push(format!(">> lookup {} {:?}", request.seq, request.kind));
                    self.lookups_dispatched += 1;
                    self.pending.push_back(request);
                }
                Action::WakeAt(at) => {
                    self.wake = Some(at);
                }
                other => {
                    self.transcript.push(format!("-> {}", describe(&other)));
                    self.callbacks.push(other);
                }
            }
        }

        if should_render {
            self.transcript
                .push(render_to_string(&self.state.compute_viewmodel()));
        }
        Ok(())
    }
}

fn describe(action: &Action) -> String {
    match action {
        Action::RequestCameraPermission => "request camera permission".to_string(),
        Action::StartCamera => "start camera".to_string(),
        Action::StopCamera => "stop camera".to_string(),
        Action::FoodSelected(record) => format!("food selected: {} ({})", record.name, record.id),
        Action::CreateFoodRequested => "create food".to_string(),
        Action::Dismissed { reason } => format!("dismissed: {reason:?}"),
        Action::Lookup(_) | Action::WakeAt(_) => format!("{action:?}"),
    }
}

fn millis(ms: u64) -> Duration {
    Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}
