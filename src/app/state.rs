//! Modal state and view model computation.
//!
//! [`ModalState`] owns every building block of one food-lookup modal: the
//! permission gate, the query debouncer, the scan deduplicator, the result
//! reducer and the shared sequencer. It is the single source of truth for
//! what the modal shows. The active [`ModalView`] can only be changed by the
//! event handler in this module's parent.
//!
//! # Example
//!
//! ```rust
//! use food_lookup::{Config, ModalState, ModalView};
//!
//! let state = ModalState::new(&Config::default());
//! assert_eq!(state.view(), ModalView::Closed);
//! let viewmodel = state.compute_viewmodel();
//! assert!(viewmodel.items.is_empty());
//! ```

use super::debounce::QueryDebouncer;
use super::modes::ModalView;
use super::permission::{PermissionGate, PermissionState};
use super::results::{ResultSet, ResultSetReducer, ResultSource, Seq, Sequencer};
use super::scan::ScanDeduplicator;
use crate::domain::{BarcodeFormat, FoodRecord};
use crate::ui::viewmodel::{DisplayItem, ModalViewModel};
use crate::Config;
use chrono::{DateTime, Utc};
use fuzzy_matcher::skim::SkimMatcherV2;
use std::collections::BTreeSet;
use std::fmt;

/// Non-fatal message shown above the result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Camera access was refused; scanning stays unavailable.
    PermissionDenied,
    /// Camera access was withdrawn while the camera was in use.
    CameraRevoked,
    /// A lookup failed and the list was emptied.
    LookupFailed {
        /// Failure description from the lookup boundary.
        message: String,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => {
                f.write_str("Camera access is off. Allow it in settings to scan barcodes.")
            }
            Self::CameraRevoked => f.write_str("Camera access was turned off while scanning."),
            Self::LookupFailed { message } => write!(f, "Search failed ({message}). Try again."),
        }
    }
}

/// Central state of one food-lookup modal.
#[derive(Debug, Clone)]
pub struct ModalState {
    view: ModalView,
    pub(super) search_text: String,
    pub(super) notice: Option<Notice>,
    /// The user tapped scan while the permission answer was outstanding.
    pub(super) scan_requested: bool,
    /// Sequence number of the barcode lookup in flight, if any.
    pub(super) pending_barcode: Option<Seq>,
    pub(super) sequencer: Sequencer,
    pub(super) permission: PermissionGate,
    pub(super) debouncer: QueryDebouncer,
    pub(super) dedup: ScanDeduplicator,
    pub(super) results: ResultSetReducer,
    accepted_formats: BTreeSet<BarcodeFormat>,
}

impl Default for ModalState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl ModalState {
    /// Creates a closed modal configured from `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            view: ModalView::Closed,
            search_text: String::new(),
            notice: None,
            scan_requested: false,
            pending_barcode: None,
            sequencer: Sequencer::new(),
            permission: PermissionGate::new(),
            debouncer: QueryDebouncer::new(config.debounce_interval()),
            dedup: ScanDeduplicator::new(config.scan_dedup_window()),
            results: ResultSetReducer::new(),
            accepted_formats: config.barcode_formats.clone(),
        }
    }

    #[must_use]
    pub const fn view(&self) -> ModalView {
        self.view
    }

    /// Text currently in the search field.
    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The result set backing the list.
    #[must_use]
    pub const fn result_set(&self) -> &ResultSet {
        self.results.current()
    }

    /// Records currently displayed, in order.
    #[must_use]
    pub fn displayed(&self) -> &[FoodRecord] {
        &self.results.current().records
    }

    #[must_use]
    pub const fn permission_state(&self) -> PermissionState {
        self.permission.state()
    }

    /// When the pending search input becomes due, if any.
    #[must_use]
    pub fn query_deadline(&self) -> Option<DateTime<Utc>> {
        self.debouncer.deadline()
    }

    /// Returns `true` while a barcode lookup is in flight.
    #[must_use]
    pub const fn is_awaiting_barcode(&self) -> bool {
        self.pending_barcode.is_some()
    }

    /// Returns `true` if decodes in `format` are acted on.
    #[must_use]
    pub fn accepts_format(&self, format: BarcodeFormat) -> bool {
        self.accepted_formats.contains(&format)
    }

    pub(super) fn transition(&mut self, to: ModalView) {
        tracing::debug!(from = %self.view, to = %to, "modal view transition");
        self.view = to;
    }

    /// Starts a session showing the caller's recent foods.
    pub(super) fn open_session(&mut self, recent_foods: Vec<FoodRecord>) {
        tracing::debug!(recent_count = recent_foods.len(), "opening food lookup");
        self.results.load_recent(recent_foods);
        self.transition(ModalView::Listing);
    }

    /// Abandons everything in flight and falls back to recent foods.
    pub(super) fn clear_results(&mut self) {
        self.debouncer.cancel();
        self.results.abandon_through(self.sequencer.last_issued());
        self.results.show_recent();
        self.pending_barcode = None;
        self.notice = None;
    }

    /// Ends the session: every in-flight lookup is abandoned and all
    /// session-scoped state is reset. The permission answer survives.
    pub(super) fn end_session(&mut self) {
        self.clear_results();
        self.dedup.reset();
        self.results.load_recent(Vec::new());
        self.search_text.clear();
        self.scan_requested = false;
        self.transition(ModalView::Closed);
    }

    /// Computes a renderable view model from the current state.
    #[must_use]
    pub fn compute_viewmodel(&self) -> ModalViewModel {
        let current = self.results.current();
        let matcher = match current.source {
            ResultSource::Lookup(_) if !self.search_text.trim().is_empty() => {
                Some(SkimMatcherV2::default())
            }
            _ => None,
        };

        let items = current
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| DisplayItem {
                key: record.list_key(index),
                name: record.name.clone(),
                calories: record.calories_label(),
                highlight_ranges: matcher
                    .as_ref()
                    .map_or_else(Vec::new, |m| self.highlight_ranges(&record.name, m)),
            })
            .collect();

        ModalViewModel {
            view: self.view,
            search_text: self.search_text.clone(),
            items,
            notice: self.notice.as_ref().map(ToString::to_string),
            showing_recent: current.is_recent(),
            awaiting_permission: self.scan_requested
                && self.permission.state() == PermissionState::Pending,
            awaiting_barcode: self.pending_barcode.is_some(),
        }
    }

    /// Character ranges of `name` matched by any search token, coalesced
    /// into `(start, end)` runs with exclusive ends.
    fn highlight_ranges(&self, name: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
        use fuzzy_matcher::FuzzyMatcher;

        let indices: BTreeSet<usize> = self
            .search_text
            .split_whitespace()
            .filter_map(|token| matcher.fuzzy_indices(name, token))
            .flat_map(|(_score, indices)| indices)
            .collect();

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for idx in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == idx => *end = idx + 1,
                _ => ranges.push((idx, idx + 1)),
            }
        }
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{LookupOutcome, LookupResponse};

    fn with_lookup_result(search_text: &str, names: &[&str]) -> ModalState {
        let mut state = ModalState::default();
        state.open_session(Vec::new());
        state.search_text = search_text.to_string();
        let seq = state.sequencer.next_seq();
        state.results.apply(&LookupResponse {
            seq,
            outcome: LookupOutcome::Found {
                records: names.iter().map(|n| FoodRecord::new("", *n, 50.0)).collect(),
            },
        });
        state
    }

    #[test]
    fn highlights_are_coalesced_runs() {
        let state = with_lookup_result("egg", &["Egg white"]);
        let vm = state.compute_viewmodel();
        assert_eq!(vm.items[0].highlight_ranges, vec![(0, 3)]);
    }

    #[test]
    fn highlights_cover_every_token() {
        let state = with_lookup_result("egg wh", &["Egg white"]);
        let vm = state.compute_viewmodel();
        assert_eq!(vm.items[0].highlight_ranges, vec![(0, 3), (4, 6)]);
    }

    #[test]
    fn keys_fall_back_to_name_and_index() {
        let state = with_lookup_result("egg", &["Egg", "Egg"]);
        let keys: Vec<String> = state.compute_viewmodel().items.into_iter().map(|i| i.key).collect();
        assert_eq!(keys, vec!["Egg-0", "Egg-1"]);
    }

    #[test]
    fn recent_foods_are_not_highlighted() {
        let mut state = ModalState::default();
        state.open_session(vec![FoodRecord::new("x", "Egg", 155.0)]);
        state.search_text = "egg".to_string();

        let vm = state.compute_viewmodel();
        assert!(vm.showing_recent);
        assert!(vm.items[0].highlight_ranges.is_empty());
    }

    #[test]
    fn end_session_resets_session_state() {
        let mut state = with_lookup_result("egg", &["Egg"]);
        state.notice = Some(Notice::PermissionDenied);
        state.end_session();

        assert_eq!(state.view(), ModalView::Closed);
        assert!(state.displayed().is_empty());
        assert_eq!(state.search_text(), "");
        assert_eq!(state.notice(), None);
    }
}
