//! Food Lookup: the interaction engine behind a "find a food" modal.
//!
//! A nutrition-tracking client shows a modal where the user either types a
//! food name or points the camera at a barcode. This crate owns everything
//! between the raw inputs and the list the user sees:
//! - Debounced free-text search with sequence-ordered responses
//! - Camera permission gating and barcode scanning with duplicate suppression
//! - A single result list fed by recent foods, text search and barcode lookup
//! - Modal view switching (listing, camera, create-food) and dismissal
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Replay CLI (main.rs, replay/)                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, action dispatching               │
//! │  - Debounce, dedup, permission, ordering            │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                                     │
//! ┌───────────────┐                     ┌───────────────┐
//! │ UI Layer      │                     │ Lookup Layer  │
//! │ (ui/)         │                     │ (lookup/)     │
//! │ - View model  │                     │ - Service API │
//! │ - Text frames │                     │ - Worker      │
//! │               │                     │ - JSON catalog│
//! └───────────────┘                     └───────────────┘
//!         │                                     │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Paths (infrastructure/)                          │
//! │  - Error types, food records (domain/)              │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing subscriber, OpenTelemetry span export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Modal state machine with event/action model
//! - [`domain`]: Food records, barcode formats, errors
//! - [`lookup`]: Lookup service trait, worker, JSON catalog
//! - [`ui`]: View model and plain-text renderer
//! - [`replay`]: Scripted event replay used by the CLI
//! - [`infrastructure`]: Path utilities
//! - [`observability`]: Tracing setup
//!
//! # Time
//!
//! Nothing in the engine reads the clock. Every input event carries its
//! timestamp, and the embedder delivers `Tick` events when an
//! [`Action::WakeAt`] deadline passes.
//!
//! # Example
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use food_lookup::app::Action;
//! use food_lookup::lookup::{JsonCatalog, LookupWorker};
//! use food_lookup::{handle_event, initialize, Config, Event};
//!
//! let catalog = JsonCatalog::from_json_str(
//!     r#"{"foods":[{"id":"egg","name":"Egg","calories":155}]}"#,
//!     25,
//! )?;
//! let worker = LookupWorker::new(catalog);
//! let mut state = initialize(&Config::default());
//! let t0 = Utc::now();
//!
//! handle_event(&mut state, &Event::Open { recent_foods: vec![] })?;
//! handle_event(&mut state, &Event::Input { text: "egg".into(), at: t0 })?;
//! let (_, actions) = handle_event(&mut state, &Event::Tick { at: t0 + Duration::milliseconds(300) })?;
//!
//! for action in actions {
//!     if let Action::Lookup(request) = action {
//!         let response = worker.handle_request(&request);
//!         handle_event(&mut state, &Event::LookupCompleted(response))?;
//!     }
//! }
//! assert_eq!(state.displayed()[0].name, "Egg");
//! # Ok::<(), food_lookup::FoodLookupError>(())
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod lookup;
pub mod observability;
pub mod replay;
pub mod ui;

pub use app::{handle_event, Action, Event, ModalState, ModalView};
pub use domain::{BarcodeFormat, FoodLookupError, FoodRecord, LookupError, Result};

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Service name reported on exported spans.
pub const SERVICE_NAME: &str = "food-lookup";

/// Longest interval accepted for debounce and dedup windows (one hour).
const MAX_INTERVAL_MS: u64 = 60 * 60 * 1000;

const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_SCAN_DEDUP_WINDOW_MS: u64 = 1500;
const DEFAULT_MAX_RESULTS: usize = 25;

/// Engine configuration.
///
/// Loaded from a TOML file by the CLI or from a string map by embedders:
///
/// ```toml
/// debounce_ms = 300
/// scan_dedup_window_ms = 1500
/// barcode_formats = ["ean13", "ean8", "upc_a", "upc_e"]
/// max_results = 25
/// trace_level = "debug"
/// trace_file = "spans.jsonl"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Quiet period after the last keystroke before a search is issued.
    /// Default: 300
    pub debounce_ms: u64,

    /// Repeat decodes of the same barcode within this window are ignored.
    /// Default: 1500
    pub scan_dedup_window_ms: u64,

    /// Symbologies the scanner acts on. Default: the retail set
    /// (EAN-13, EAN-8, UPC-A, UPC-E).
    pub barcode_formats: BTreeSet<BarcodeFormat>,

    /// Upper bound on records returned by the JSON catalog. Default: 25
    pub max_results: usize,

    /// Tracing filter directive. Default: `"info"`
    pub trace_level: Option<String>,

    /// Span export file; relative paths resolve under
    /// [`infrastructure::data_dir`]. Unset disables span export.
    pub trace_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            scan_dedup_window_ms: DEFAULT_SCAN_DEDUP_WINDOW_MS,
            barcode_formats: BarcodeFormat::RETAIL.into_iter().collect(),
            max_results: DEFAULT_MAX_RESULTS,
            trace_level: None,
            trace_file: None,
        }
    }
}

impl Config {
    /// Debounce quiet period as a duration, capped at one hour.
    #[must_use]
    pub fn debounce_interval(&self) -> chrono::Duration {
        millis(self.debounce_ms)
    }

    /// Scan dedup window as a duration, capped at one hour.
    #[must_use]
    pub fn scan_dedup_window(&self) -> chrono::Duration {
        millis(self.scan_dedup_window_ms)
    }

    /// Parses configuration from a string map, as handed over by a host
    /// application's settings store.
    ///
    /// Unknown keys are ignored and unparsable values fall back to defaults.
    ///
    /// # Parsing Rules
    ///
    /// - `debounce_ms`, `scan_dedup_window_ms`, `max_results`: integers
    /// - `barcode_formats`: comma-separated names; unknown names are skipped,
    ///   and an empty result keeps the default set
    /// - `trace_level`, `trace_file`: taken verbatim
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use food_lookup::{BarcodeFormat, Config};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("debounce_ms".to_string(), "250".to_string());
    /// map.insert("barcode_formats".to_string(), "ean13, qr".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.debounce_ms, 250);
    /// assert!(config.barcode_formats.contains(&BarcodeFormat::Qr));
    /// assert!(!config.barcode_formats.contains(&BarcodeFormat::UpcA));
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let debounce_ms = config
            .get("debounce_ms")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(defaults.debounce_ms);

        let scan_dedup_window_ms = config
            .get("scan_dedup_window_ms")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(defaults.scan_dedup_window_ms);

        let max_results = config
            .get("max_results")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_results);

        let barcode_formats = config
            .get("barcode_formats")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .filter_map(|name| match name.parse::<BarcodeFormat>() {
                        Ok(format) => Some(format),
                        Err(e) => {
                            tracing::debug!(error = %e, "skipping barcode format");
                            None
                        }
                    })
                    .collect::<BTreeSet<_>>()
            })
            .filter(|formats| !formats.is_empty())
            .unwrap_or(defaults.barcode_formats);

        Self {
            debounce_ms,
            scan_dedup_window_ms,
            barcode_formats,
            max_results,
            trace_level: config.get("trace_level").cloned(),
            trace_file: config.get("trace_file").cloned(),
        }
    }

    /// Parses configuration from TOML text.
    ///
    /// Missing keys take their defaults; unknown keys and bad values are
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns [`FoodLookupError::Config`] if the TOML is malformed, contains
    /// unknown keys, lists no barcode formats, or sets `max_results` to zero.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| FoodLookupError::Config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or
    /// [`Config::from_toml_str`] rejects it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading configuration");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<()> {
        if self.barcode_formats.is_empty() {
            return Err(FoodLookupError::Config(
                "barcode_formats must list at least one format".to_string(),
            ));
        }
        if self.max_results == 0 {
            return Err(FoodLookupError::Config(
                "max_results must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn millis(ms: u64) -> chrono::Duration {
    let capped = i64::try_from(ms.min(MAX_INTERVAL_MS)).unwrap_or(0);
    chrono::Duration::milliseconds(capped)
}

/// Creates a closed modal ready for event processing.
///
/// Tracing is not initialized here; call
/// [`observability::init_tracing`] first if you want logs.
///
/// # Example
///
/// ```rust
/// use food_lookup::{initialize, Config, ModalView};
///
/// let state = initialize(&Config::default());
/// assert_eq!(state.view(), ModalView::Closed);
/// ```
#[must_use]
pub fn initialize(config: &Config) -> ModalState {
    tracing::debug!(
        debounce_ms = config.debounce_ms,
        scan_dedup_window_ms = config.scan_dedup_window_ms,
        formats = config.barcode_formats.len(),
        "initializing food lookup modal"
    );

    ModalState::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.debounce_interval(), chrono::Duration::milliseconds(300));
        assert_eq!(config.scan_dedup_window(), chrono::Duration::milliseconds(1500));
        assert_eq!(config.barcode_formats.len(), 4);
    }

    #[test]
    fn map_falls_back_on_bad_values() {
        let mut map = BTreeMap::new();
        map.insert("debounce_ms".to_string(), "soon".to_string());
        map.insert("barcode_formats".to_string(), "morse".to_string());
        map.insert("max_results".to_string(), "0".to_string());

        assert_eq!(Config::from_map(&map), Config::default());
    }

    #[test]
    fn toml_partial_uses_defaults() {
        let config = Config::from_toml_str("debounce_ms = 120\nbarcode_formats = [\"qr\"]\n").unwrap();
        assert_eq!(config.debounce_ms, 120);
        assert_eq!(config.scan_dedup_window_ms, 1500);
        assert_eq!(
            config.barcode_formats.into_iter().collect::<Vec<_>>(),
            vec![BarcodeFormat::Qr]
        );
    }

    #[test]
    fn toml_rejects_unknown_keys_and_empty_formats() {
        assert!(matches!(
            Config::from_toml_str("debounce = 1\n"),
            Err(FoodLookupError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("barcode_formats = []\n"),
            Err(FoodLookupError::Config(_))
        ));
    }

    #[test]
    fn durations_are_capped() {
        let config = Config {
            debounce_ms: u64::MAX,
            ..Config::default()
        };
        assert_eq!(config.debounce_interval(), chrono::Duration::hours(1));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("food-lookup.toml");
        std::fs::write(&path, "max_results = 5\n").unwrap();

        assert_eq!(Config::from_file(&path).unwrap().max_results, 5);
    }
}
