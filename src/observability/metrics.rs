//! Metric export over OTLP/HTTP and runtime gauges.
//!
//! # Metrics
//! - `dice-rolls` (counter): total rolls, recorded by the generator
//! - `roll-<n>-count` (counter): rolls per face, recorded by the generator
//! - `runtime.tokio.workers` (gauge): tokio worker threads
//! - `runtime.tokio.alive_tasks` (gauge): tasks currently alive on the runtime

use opentelemetry::metrics::{Meter, ObservableGauge};
use opentelemetry_otlp::{Compression, Protocol, WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::Resource;

use crate::lifecycle::{HandleError, Teardown};
use crate::observability::resource::signal_endpoint;
use crate::observability::TelemetryError;

/// Meter provider pushing to `<endpoint>/v1/metrics` on a periodic reader.
pub fn build_meter_provider(
    endpoint: &str,
    resource: Resource,
) -> Result<SdkMeterProvider, TelemetryError> {
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(signal_endpoint(endpoint, "/v1/metrics")?)
        .with_compression(Compression::Gzip)
        .build()
        .map_err(TelemetryError::MetricExporter)?;

    Ok(SdkMeterProvider::builder()
        .with_periodic_exporter(exporter)
        .with_resource(resource)
        .build())
}

/// Observable gauges over the current tokio runtime.
pub struct RuntimeMetrics {
    _workers: ObservableGauge<u64>,
    _alive_tasks: ObservableGauge<u64>,
}

impl RuntimeMetrics {
    /// Register the gauges. Returns `None` outside a tokio runtime.
    pub fn install(meter: &Meter) -> Option<Self> {
        let handle = tokio::runtime::Handle::try_current().ok()?;

        let workers = {
            let handle = handle.clone();
            meter
                .u64_observable_gauge("runtime.tokio.workers")
                .with_description("Number of worker threads used by the runtime")
                .with_callback(move |observer| {
                    observer.observe(handle.metrics().num_workers() as u64, &[]);
                })
                .build()
        };

        let alive_tasks = meter
            .u64_observable_gauge("runtime.tokio.alive_tasks")
            .with_description("Number of tasks currently alive on the runtime")
            .with_callback(move |observer| {
                observer.observe(handle.metrics().num_alive_tasks() as u64, &[]);
            })
            .build();

        Some(Self {
            _workers: workers,
            _alive_tasks: alive_tasks,
        })
    }
}

/// Teardown handle for the meter provider.
#[derive(Debug)]
pub struct MeterShutdown {
    provider: SdkMeterProvider,
}

impl MeterShutdown {
    pub fn new(provider: SdkMeterProvider) -> Self {
        Self { provider }
    }
}

impl Teardown for MeterShutdown {
    fn name(&self) -> &str {
        "metrics provider"
    }

    fn shutdown(&self) -> Result<(), HandleError> {
        self.provider.shutdown()?;
        Ok(())
    }
}
