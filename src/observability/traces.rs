//! Trace export over OTLP/gRPC.

use opentelemetry_otlp::{Compression, WithExportConfig, WithTonicConfig};
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider};
use opentelemetry_sdk::Resource;

use crate::lifecycle::{HandleError, Teardown};
use crate::observability::resource::normalize_endpoint;
use crate::observability::TelemetryError;

/// Tracer provider exporting every span, batched, to the gRPC collector.
pub fn build_tracer_provider(
    endpoint: &str,
    resource: Resource,
) -> Result<SdkTracerProvider, TelemetryError> {
    let endpoint = normalize_endpoint(endpoint)?;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .with_compression(Compression::Gzip)
        .build()
        .map_err(TelemetryError::TraceExporter)?;

    Ok(SdkTracerProvider::builder()
        .with_sampler(Sampler::AlwaysOn)
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}

/// Teardown handle for the tracer provider.
#[derive(Debug)]
pub struct TracerShutdown {
    provider: SdkTracerProvider,
}

impl TracerShutdown {
    pub fn new(provider: SdkTracerProvider) -> Self {
        Self { provider }
    }
}

impl Teardown for TracerShutdown {
    fn name(&self) -> &str {
        "trace provider"
    }

    fn shutdown(&self) -> Result<(), HandleError> {
        self.provider.shutdown()?;
        Ok(())
    }
}
