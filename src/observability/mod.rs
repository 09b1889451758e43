//! Structured logging and span export.
//!
//! ```text
//! tracing → tracing-subscriber ─┬─ fmt layer → stderr
//!                               └─ tracing-opentelemetry → SpanFileExporter → JSON lines
//! ```
//!
//! The filter comes from `RUST_LOG`, then `trace_level` in [`Config`](crate::Config),
//! then `"info"`. The span file is written only when `trace_file` is configured;
//! it rotates into a single `.1` backup.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`exporter`]: OpenTelemetry span exporter and tracer provider
//! - [`writer`]: Rotating line writer

pub mod exporter;
pub mod init;
pub mod writer;

pub use init::init_tracing;
