//! Application layer: the food-lookup modal state machine.
//!
//! This layer sits between the embedder (a mobile screen, the replay
//! driver, a test) and the lookup backend. It implements an event-driven
//! model where every input is a discrete event processed one at a time:
//!
//! ```text
//! Input / Scan / Permission ─→ Event ─→ handle_event ─→ State ─→ Actions
//!                                ↑                                 │
//!                                └──── LookupCompleted ←── Lookup ─┘
//! ```
//!
//! # Modules
//!
//! - [`permission`]: Camera authorization gate
//! - [`debounce`]: Search input debouncer
//! - [`scan`]: Decode events and duplicate suppression
//! - [`results`]: Sequence numbers and result set reducer
//! - [`modes`]: Modal views and dismissal reasons
//! - [`actions`]: Side effects returned to the embedder
//! - [`handler`]: The state machine itself
//! - [`state`]: Modal state container and view model computation

pub mod actions;
pub mod debounce;
pub mod handler;
pub mod modes;
pub mod permission;
pub mod results;
pub mod scan;
pub mod state;

pub use actions::Action;
pub use debounce::{InputSignal, QueryDebouncer, SearchQuery};
pub use handler::{handle_event, Event};
pub use modes::{CloseReason, ModalView};
pub use permission::{AccessDecision, PermissionGate, PermissionState};
pub use results::{ApplyOutcome, ResultSet, ResultSetReducer, ResultSource, Seq, Sequencer};
pub use scan::{ScanDeduplicator, ScanEvent, ScanVerdict};
pub use state::{ModalState, Notice};
