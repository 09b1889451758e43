//! Scripted replay of modal sessions.
//!
//! A replay script is a list of timed user and host steps. The driver turns
//! them into [`Event`](crate::Event)s, answers lookups from a
//! [`LookupWorker`](crate::lookup::LookupWorker), and records every frame
//! and embedder callback. Lookups are held back until a `deliver` step, so
//! out-of-order network responses can be reproduced exactly.
//!
//! # Modules
//!
//! - [`script`]: Script file format
//! - [`driver`]: Step execution and reporting

pub mod driver;
pub mod script;

pub use driver::{ReplayDriver, ReplayReport};
pub use script::{DeliveryOrder, Script, Step, StepAction};
