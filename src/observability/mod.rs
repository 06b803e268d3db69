//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Generator and tasks produce:
//!     → tracing spans  → traces.rs (OTLP/gRPC, gzip)       → collector gRPC endpoint
//!     → tracing events → logging.rs (OTLP/HTTP, gzip)      → collector HTTP endpoint /v1/logs
//!     → OTel counters  → metrics.rs (OTLP/HTTP, gzip)      → collector HTTP endpoint /v1/metrics
//!
//! Every signal carries resource.rs attributes (service.name, library.language).
//! ```
//!
//! # Design Decisions
//! - All instrumentation goes through `tracing`; OTel layers bridge it out
//! - Exporter construction errors are fatal: emitting telemetry is the point
//! - Each provider is shut down through its own teardown handle

pub mod logging;
pub mod metrics;
pub mod resource;
pub mod traces;

use opentelemetry::metrics::{Meter, MeterProvider as _};
use opentelemetry::InstrumentationScope;
use opentelemetry_otlp::ExporterBuildError;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;

use crate::config::Config;

pub use logging::LoggerShutdown;
pub use metrics::{MeterShutdown, RuntimeMetrics};
pub use resource::{build_resource, normalize_endpoint, signal_endpoint, LANGUAGE};
pub use traces::TracerShutdown;

/// Error type for telemetry setup.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid collector endpoint {0:?}")]
    Endpoint(String),

    #[error("creating otel trace exporter: {0}")]
    TraceExporter(#[source] ExporterBuildError),

    #[error("creating otel metrics exporter: {0}")]
    MetricExporter(#[source] ExporterBuildError),

    #[error("creating log exporter: {0}")]
    LogExporter(#[source] ExporterBuildError),

    #[error("installing tracing subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// The telemetry pipeline: one provider per signal.
///
/// Providers are not shut down on drop; hand the shutdown handles to the
/// lifecycle teardown set instead.
pub struct Telemetry {
    logs: SdkLoggerProvider,
    traces: SdkTracerProvider,
    metrics: SdkMeterProvider,
    runtime: Option<RuntimeMetrics>,
}

impl Telemetry {
    /// Build all providers, register them globally and install the subscriber.
    pub fn init(config: &Config) -> Result<Self, TelemetryError> {
        let resource = build_resource(&config.service_name);

        let logger_provider =
            logging::build_logger_provider(&config.collector_http_url, resource.clone())?;
        let tracer_provider =
            traces::build_tracer_provider(&config.collector_grpc_url, resource.clone())?;
        let meter_provider = metrics::build_meter_provider(&config.collector_http_url, resource)?;

        opentelemetry::global::set_tracer_provider(tracer_provider.clone());
        opentelemetry::global::set_meter_provider(meter_provider.clone());

        logging::init_subscriber(&config.service_name, &tracer_provider, &logger_provider)?;

        let runtime = RuntimeMetrics::install(&meter_provider.meter("ogen.runtime"));

        tracing::info!(
            traces = %config.collector_grpc_url,
            telemetry = %config.collector_http_url,
            service = %config.service_name,
            "Telemetry initialized"
        );

        Ok(Self {
            logs: logger_provider,
            traces: tracer_provider,
            metrics: meter_provider,
            runtime,
        })
    }

    /// Meter scoped to `name`, backed by this pipeline's meter provider.
    pub fn meter(&self, name: &str) -> Meter {
        self.metrics
            .meter_with_scope(InstrumentationScope::builder(name.to_string()).build())
    }

    pub fn logs_shutdown(&self) -> LoggerShutdown {
        LoggerShutdown::new(self.logs.clone())
    }

    pub fn traces_shutdown(&self) -> TracerShutdown {
        TracerShutdown::new(self.traces.clone())
    }

    pub fn metrics_shutdown(&self) -> MeterShutdown {
        MeterShutdown::new(self.metrics.clone())
    }

    /// Whether the tokio runtime gauges were registered.
    pub fn has_runtime_metrics(&self) -> bool {
        self.runtime.is_some()
    }
}
