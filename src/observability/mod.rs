//! OpenTelemetry-based observability with file-based span export.
//!
//! `tracing` spans and events flow through a `tracing-opentelemetry` layer
//! into an `opentelemetry_sdk` tracer provider, whose exporter appends OTLP
//! JSON lines to a rotating file in the data directory.
//!
//! ```text
//! tracing macros → OpenTelemetryLayer → TracerProvider → FileSpanExporter → traces.jsonl
//!                └→ fmt layer (stderr, optional)
//! ```
//!
//! # Configuration
//!
//! Level resolution:
//! 1. `RUST_LOG` environment variable
//! 2. `trace_level` in [`Config`](crate::Config)
//! 3. Default: `"info"`
//!
//! Files rotate at 10 MiB with 3 numbered backups.

mod exporter;
mod init;

pub use init::{init_tracing, TRACE_FILE};

/// Service and instrumentation scope name attached to exported spans.
pub const SERVICE_NAME: &str = "movie-finder";
