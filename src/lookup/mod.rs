//! Lookup layer: the boundary between the modal and the food backend.
//!
//! The modal never calls the backend directly. It emits
//! [`LookupRequest`]s, the embedder runs them through a [`LookupWorker`]
//! (immediately, on another thread, or after a network round trip) and
//! feeds the resulting [`LookupResponse`] back as an event.
//!
//! # Modules
//!
//! - `service`: The [`LookupService`] trait implemented by food backends
//! - `messages`: Request/response types with trace context propagation
//! - `worker`: Executes requests and converts failures at the boundary
//! - `catalog`: JSON file-backed [`LookupService`]

pub mod catalog;
pub mod messages;
pub mod service;
pub mod worker;

pub use catalog::JsonCatalog;
pub use messages::{LookupKind, LookupOutcome, LookupRequest, LookupResponse, TraceContext};
pub use service::LookupService;
pub use worker::LookupWorker;
