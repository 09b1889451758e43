//! File-backed OpenTelemetry span exporter.
//!
//! Each finished span becomes one flat JSON object on its own line:
//!
//! ```json
//! {"service":"food-lookup","name":"handle_event","traceId":"…","spanId":"…",
//!  "parentSpanId":"…","startUnixNano":"…","durationMicros":42,
//!  "attributes":{"event":"Input"},"status":"unset"}
//! ```

use super::writer::{RotatingWriter, DEFAULT_MAX_BYTES};
use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, Status, TraceError};
use opentelemetry::Value;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Map, Value as JsonValue};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Span exporter writing JSON lines through a [`RotatingWriter`].
pub struct SpanFileExporter {
    writer: RotatingWriter,
    service: String,
    is_shutdown: AtomicBool,
}

impl SpanFileExporter {
    pub fn new(file_path: PathBuf, resource: &Resource) -> Self {
        let service = resource
            .get(opentelemetry::Key::new("service.name"))
            .map_or_else(|| crate::SERVICE_NAME.to_string(), |v| v.as_str().into_owned());

        Self {
            writer: RotatingWriter::new(file_path, DEFAULT_MAX_BYTES),
            service,
            is_shutdown: AtomicBool::new(false),
        }
    }

    /// Formats one span as a flat JSON object.
    fn format_span(&self, span: &SpanData) -> JsonValue {
        let attributes: Map<String, JsonValue> = span
            .attributes
            .iter()
            .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
            .collect();

        let parent = if span.parent_span_id == SpanId::INVALID {
            String::new()
        } else {
            format!("{:016x}", span.parent_span_id)
        };

        let duration_micros = span
            .end_time
            .duration_since(span.start_time)
            .map_or(0, |d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX));

        let status = match &span.status {
            Status::Unset => "unset".to_string(),
            Status::Ok => "ok".to_string(),
            Status::Error { description } => format!("error: {description}"),
        };

        json!({
            "service": self.service,
            "name": span.name,
            "traceId": format!("{:032x}", span.span_context.trace_id()),
            "spanId": format!("{:016x}", span.span_context.span_id()),
            "parentSpanId": parent,
            "startUnixNano": unix_nanos(span.start_time).to_string(),
            "durationMicros": duration_micros,
            "attributes": attributes,
            "events": span.events.iter().map(|e| e.name.to_string()).collect::<Vec<_>>(),
            "status": status,
        })
    }
}

fn unix_nanos(time: SystemTime) -> u128 {
    time.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_nanos())
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.as_str()),
        Value::Array(_) => json!(value.to_string()),
    }
}

impl SpanExporter for SpanFileExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Box::pin(std::future::ready(Err(TraceError::from(
                "exporter is shut down",
            ))));
        }

        for span in &batch {
            let line = self.format_span(span).to_string();
            if let Err(e) = self.writer.write_line(&line) {
                return Box::pin(std::future::ready(Err(TraceError::from(e.to_string()))));
            }
        }

        Box::pin(std::future::ready(Ok(())))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for SpanFileExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanFileExporter")
            .field("writer", &self.writer)
            .field("service", &self.service)
            .field("is_shutdown", &self.is_shutdown)
            .finish()
    }
}

/// Creates a tracer provider that exports every span to `file_path`.
///
/// Spans are exported as they end (simple exporter, no batching).
pub fn create_tracer_provider(file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = SpanFileExporter::new(file_path, &resource);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
