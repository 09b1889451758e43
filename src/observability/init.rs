//! Tracing subscriber setup.

use super::exporter;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// - Filter: `RUST_LOG` when set, else `config.trace_level`, else `"info"`
/// - Human-readable events go to stderr
/// - When `config.trace_file` is set, spans are also exported as JSON lines
///   to that file (relative paths resolve under
///   [`data_dir`](crate::infrastructure::data_dir))
///
/// Observability is optional: if the trace directory cannot be created the
/// file layer is skipped, and a second call is a no-op.
///
/// # Example
///
/// ```rust
/// use food_lookup::observability::init_tracing;
/// use food_lookup::Config;
///
/// init_tracing(&Config::default());
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let otel_layer = config.trace_file.as_ref().and_then(|file| {
        let path = crate::infrastructure::data_dir().join(crate::infrastructure::expand_tilde(file));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok()?;
        }

        let resource = Resource::new(vec![opentelemetry::KeyValue::new(
            "service.name",
            crate::SERVICE_NAME,
        )]);
        let provider = exporter::create_tracer_provider(path, resource);
        let tracer = provider.tracer(crate::SERVICE_NAME);
        opentelemetry::global::set_tracer_provider(provider);
        Some(OpenTelemetryLayer::new(tracer))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init();
}
