//! Lookup request and response types.
//!
//! Requests leave the modal as actions and responses come back as events,
//! possibly after crossing a thread or process boundary, so both are plain
//! serializable data. Requests carry the caller's trace context so the
//! worker-side span joins the trace of the event that caused the lookup.

use crate::app::Seq;
use crate::domain::FoodRecord;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-boundary span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Span ID of the span that issued the request.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span IDs of the current tracing span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span
    /// is not sampled.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// What to look up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LookupKind {
    /// Free-text catalog search.
    Text(String),
    /// Decoded barcode payload.
    Barcode(String),
}

/// A lookup dispatched by the modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    /// Ordering key; echoed unchanged in the response.
    pub seq: Seq,

    pub kind: LookupKind,

    /// Trace context for linking spans across the boundary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_context: Option<TraceContext>,
}

impl LookupRequest {
    /// Creates a text search request with the current trace context.
    pub fn search(seq: Seq, text: impl Into<String>) -> Self {
        Self {
            seq,
            kind: LookupKind::Text(text.into()),
            trace_context: TraceContext::from_current(),
        }
    }

    /// Creates a barcode lookup request with the current trace context.
    pub fn barcode(seq: Seq, code: impl Into<String>) -> Self {
        Self {
            seq,
            kind: LookupKind::Barcode(code.into()),
            trace_context: TraceContext::from_current(),
        }
    }

    /// Builds the successful response to this request.
    #[must_use]
    pub fn found(&self, records: Vec<FoodRecord>) -> LookupResponse {
        LookupResponse {
            seq: self.seq,
            outcome: LookupOutcome::Found { records },
        }
    }

    /// Builds the failed response to this request.
    #[must_use]
    pub fn failed(&self, message: impl Into<String>) -> LookupResponse {
        LookupResponse {
            seq: self.seq,
            outcome: LookupOutcome::Failed {
                message: message.into(),
            },
        }
    }
}

/// Result of a lookup as seen by the modal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupOutcome {
    /// The backend answered. `records` may be empty.
    Found {
        /// Matches in backend order.
        records: Vec<FoodRecord>,
    },
    /// The backend failed; already converted at the lookup boundary.
    Failed {
        /// Human-readable failure description.
        message: String,
    },
}

/// Answer to a [`LookupRequest`], tagged with the request's sequence number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub seq: Seq,
    pub outcome: LookupOutcome,
}
