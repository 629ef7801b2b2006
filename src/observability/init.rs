//! Subscriber setup.

use super::exporter::FileSpanExporter;
use super::SERVICE_NAME;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the span log inside the data directory.
pub const TRACE_FILE: &str = "traces.jsonl";

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, else from
/// `config.trace_level`, else `info`. Spans are exported as OTLP JSON to
/// [`TRACE_FILE`] in the data directory. When `config.log_to_stderr` is set
/// a human-readable `fmt` layer is added on stderr.
///
/// Never fails: if the data directory cannot be created, span export is
/// skipped, and a second call leaves the first subscriber in place. Returns
/// the trace file path when export is active.
///
/// # Example
///
/// ```rust,no_run
/// use movie_finder::{observability::init_tracing, Config};
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> Option<PathBuf> {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = config.log_to_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    let data_dir = crate::infrastructure::paths::data_dir(config);
    let trace_file = std::fs::create_dir_all(&data_dir)
        .ok()
        .map(|()| data_dir.join(TRACE_FILE));

    let otel_layer = trace_file.clone().map(|path| {
        let provider = create_tracer_provider(path);
        OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME))
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(trace_file = ?trace_file, "tracing initialized");
        trace_file
    } else {
        None
    }
}

fn create_tracer_provider(path: PathBuf) -> TracerProvider {
    let resource = Resource::new(vec![
        KeyValue::new("service.name", SERVICE_NAME),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let exporter = FileSpanExporter::new(path, resource.clone());

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
