//! Resource attributes and collector endpoint handling.

use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;

use crate::observability::TelemetryError;

/// Value of the `library.language` resource attribute.
pub const LANGUAGE: &str = "rust";

/// Resource shared by all three providers.
pub fn build_resource(service_name: &str) -> Resource {
    Resource::builder()
        .with_service_name(service_name.to_string())
        .with_attribute(KeyValue::new("library.language", LANGUAGE))
        .build()
}

/// Turn a configured endpoint into a URL the exporters accept.
///
/// Bare `host:port` values get a plaintext `http://` scheme; trailing slashes
/// are dropped.
pub fn normalize_endpoint(raw: &str) -> Result<String, TelemetryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(TelemetryError::Endpoint(raw.to_string()));
    }

    let url = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let url = url.trim_end_matches('/');
    if url.ends_with("://") {
        return Err(TelemetryError::Endpoint(raw.to_string()));
    }
    Ok(url.to_string())
}

/// Per-signal HTTP endpoint, e.g. `http://localhost:4318/v1/metrics`.
pub fn signal_endpoint(raw: &str, path: &str) -> Result<String, TelemetryError> {
    Ok(format!("{}{}", normalize_endpoint(raw)?, path))
}
