//! Structured logging.
//!
//! # Responsibilities
//! - Build the OTLP/HTTP log provider
//! - Install the `tracing` subscriber: stderr output, span export, log export
//!
//! # Design Decisions
//! - Log level from `RUST_LOG`, defaulting to `ogen=info,tower_http=info`
//! - Events from the exporter stack itself are kept out of the log bridge,
//!   otherwise exporting a log would produce more logs to export

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{Compression, Protocol, WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::lifecycle::{HandleError, Teardown};
use crate::observability::resource::signal_endpoint;
use crate::observability::TelemetryError;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "ogen=info,tower_http=info";

const EXPORTER_TARGETS: [&str; 6] = ["opentelemetry", "tonic", "hyper", "h2", "tower", "reqwest"];

/// Logger provider batching records to `<endpoint>/v1/logs`.
pub fn build_logger_provider(
    endpoint: &str,
    resource: Resource,
) -> Result<SdkLoggerProvider, TelemetryError> {
    let exporter = opentelemetry_otlp::LogExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(signal_endpoint(endpoint, "/v1/logs")?)
        .with_compression(Compression::Gzip)
        .build()
        .map_err(TelemetryError::LogExporter)?;

    Ok(SdkLoggerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}

/// Install the global subscriber bridging `tracing` to both providers.
pub fn init_subscriber(
    service_name: &str,
    traces: &SdkTracerProvider,
    logs: &SdkLoggerProvider,
) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let otel_trace_layer =
        tracing_opentelemetry::layer().with_tracer(traces.tracer(service_name.to_string()));

    let otel_log_layer = OpenTelemetryTracingBridge::new(logs)
        .with_filter(filter_fn(|meta| !is_exporter_target(meta.target())));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(otel_trace_layer)
        .with(otel_log_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

fn is_exporter_target(target: &str) -> bool {
    EXPORTER_TARGETS
        .iter()
        .any(|prefix| target.starts_with(prefix))
}

/// Teardown handle for the logger provider.
#[derive(Debug)]
pub struct LoggerShutdown {
    provider: SdkLoggerProvider,
}

impl LoggerShutdown {
    pub fn new(provider: SdkLoggerProvider) -> Self {
        Self { provider }
    }
}

impl Teardown for LoggerShutdown {
    fn name(&self) -> &str {
        "log provider"
    }

    fn shutdown(&self) -> Result<(), HandleError> {
        self.provider.shutdown()?;
        Ok(())
    }
}
