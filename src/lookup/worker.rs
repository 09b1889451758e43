//! Lookup execution.
//!
//! [`LookupWorker`] is where [`LookupService`] calls happen and therefore
//! where their failures stop. Whatever the service returns, the worker
//! produces a [`LookupResponse`]; a failed call becomes
//! [`LookupOutcome::Failed`](super::LookupOutcome::Failed) and is never
//! propagated further.

use super::messages::{LookupKind, LookupRequest, LookupResponse};
use super::service::LookupService;
use crate::domain::{FoodRecord, LookupError};

/// Runs lookup requests against a backend.
#[derive(Debug)]
pub struct LookupWorker<S> {
    service: S,
}

impl<S: LookupService> LookupWorker<S> {
    pub const fn new(service: S) -> Self {
        Self { service }
    }

    /// Returns the wrapped backend.
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Executes a request and returns its response.
    ///
    /// The worker span is parented to the request's trace context when one
    /// is present.
    pub fn handle_request(&self, request: &LookupRequest) -> LookupResponse {
        let _context_guard = Self::attach_parent_trace_context(request);

        let span = tracing::debug_span!("lookup_worker", seq = %request.seq, kind = ?request.kind);
        let _guard = span.entered();

        let (operation, result) = match &request.kind {
            LookupKind::Text(query) => ("search foods", self.service.search_foods(query)),
            LookupKind::Barcode(code) => (
                "search foods by barcode",
                self.service.search_foods_by_barcode(code),
            ),
        };

        Self::handle_lookup_result(operation, request, result)
    }

    /// Converts a service result into a response with consistent logging.
    fn handle_lookup_result(
        operation: &str,
        request: &LookupRequest,
        result: Result<Vec<FoodRecord>, LookupError>,
    ) -> LookupResponse {
        match result {
            Ok(records) => {
                tracing::debug!(operation = operation, result_count = records.len(), "lookup succeeded");
                request.found(records)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "lookup failed");
                request.failed(e.to_string())
            }
        }
    }

    /// Re-enters the caller's trace on this side of the boundary.
    ///
    /// Returns a guard that must be held for the duration of the lookup.
    fn attach_parent_trace_context(request: &LookupRequest) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = request.trace_context.as_ref()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(
            opentelemetry::Context::current()
                .with_remote_span_context(span_context)
                .attach(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Sequencer;
    use crate::lookup::LookupOutcome;

    struct Fixed(Result<Vec<FoodRecord>, LookupError>);

    impl LookupService for Fixed {
        fn search_foods(&self, _query: &str) -> Result<Vec<FoodRecord>, LookupError> {
            self.0.clone()
        }

        fn search_foods_by_barcode(&self, _code: &str) -> Result<Vec<FoodRecord>, LookupError> {
            self.0.clone()
        }
    }

    #[test]
    fn success_echoes_sequence_number() {
        let mut sequencer = Sequencer::new();
        let seq = sequencer.next_seq();
        let worker = LookupWorker::new(Fixed(Ok(vec![FoodRecord::new("e1", "Egg", 155.0)])));

        let response = worker.handle_request(&LookupRequest::search(seq, "egg"));
        assert_eq!(response.seq, seq);
        assert!(matches!(response.outcome, LookupOutcome::Found { ref records } if records.len() == 1));
    }

    #[test]
    fn failure_is_converted_not_propagated() {
        let mut sequencer = Sequencer::new();
        let seq = sequencer.next_seq();
        let worker = LookupWorker::new(Fixed(Err(LookupError::Network("timeout".to_string()))));

        let response = worker.handle_request(&LookupRequest::barcode(seq, "4006381333931"));
        assert_eq!(
            response.outcome,
            LookupOutcome::Failed {
                message: "network failure: timeout".to_string()
            }
        );
    }
}
