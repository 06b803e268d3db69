//! Handlers for the `/debug/pprof/` endpoints.
//!
//! # Responsibilities
//! - List the available profiles
//! - Serve the command line and symbol lookups
//! - Sample CPU profiles and flamegraphs on the blocking pool
//!
//! # Design Decisions
//! - Capture lengths above [`MAX_CAPTURE_SECS`] are rejected with 400

use std::time::Duration;

use axum::{
    extract::Query,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Longest capture a single request may ask for.
pub const MAX_CAPTURE_SECS: u64 = 300;

const DEFAULT_PROFILE_SECS: u64 = 30;
const DEFAULT_TRACE_SECS: u64 = 1;
const SAMPLE_FREQUENCY: i32 = 100;
const BLOCKLIST: [&str; 4] = ["libc", "libgcc", "pthread", "vdso"];

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ProfileEntry {
    pub name: String,
    pub path: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ProfileIndex {
    pub profiles: Vec<ProfileEntry>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CaptureParams {
    pub seconds: Option<u64>,
}

impl CaptureParams {
    fn duration(&self, default: u64) -> Result<Duration, Response> {
        let secs = self.seconds.unwrap_or(default);
        if secs > MAX_CAPTURE_SECS {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("seconds must be at most {MAX_CAPTURE_SECS}"),
            )
                .into_response());
        }
        Ok(Duration::from_secs(secs))
    }
}

pub async fn index() -> Json<ProfileIndex> {
    let entry = |name: &str, description: &str| ProfileEntry {
        name: name.to_string(),
        path: format!("/debug/pprof/{name}"),
        description: description.to_string(),
    };

    Json(ProfileIndex {
        profiles: vec![
            entry("cmdline", "The command line invocation of the current program"),
            entry("profile", "CPU profile in pprof format; `seconds` sets the duration"),
            entry("symbol", "Resolve program counters to symbol names"),
            entry("trace", "Flamegraph of execution; `seconds` sets the duration"),
        ],
    })
}

/// Command line with NUL-separated arguments.
pub async fn cmdline() -> impl IntoResponse {
    let args = std::env::args().collect::<Vec<_>>().join("\0");
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], args)
}

pub async fn profile(Query(params): Query<CaptureParams>) -> Response {
    let duration = match params.duration(DEFAULT_PROFILE_SECS) {
        Ok(d) => d,
        Err(response) => return response,
    };

    tracing::info!(seconds = duration.as_secs(), "Capturing CPU profile");
    capture(duration, Capture::Pprof).await
}

pub async fn trace(Query(params): Query<CaptureParams>) -> Response {
    let duration = match params.duration(DEFAULT_TRACE_SECS) {
        Ok(d) => d,
        Err(response) => return response,
    };

    tracing::info!(seconds = duration.as_secs(), "Capturing execution flamegraph");
    capture(duration, Capture::Flamegraph).await
}

/// Advertise symbol lookup support.
pub async fn symbol_info() -> &'static str {
    "num_symbols: 1\n"
}

/// Resolve `+`-separated hex program counters from the request body.
pub async fn symbol_lookup(body: String) -> Response {
    let addrs = match parse_addresses(&body) {
        Ok(addrs) => addrs,
        Err(bad) => {
            return (StatusCode::BAD_REQUEST, format!("invalid address {bad:?}")).into_response()
        }
    };

    match tokio::task::spawn_blocking(move || resolve_symbols(&addrs)).await {
        Ok(lines) => lines.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Symbol lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Parse `0x1234+0xabcd` style input. Returns the offending token on error.
pub fn parse_addresses(input: &str) -> Result<Vec<usize>, String> {
    input
        .trim()
        .split('+')
        .filter(|token| !token.is_empty())
        .map(|token| {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            usize::from_str_radix(digits, 16).map_err(|_| token.to_string())
        })
        .collect()
}

fn resolve_symbols(addrs: &[usize]) -> String {
    let mut out = String::new();
    for &addr in addrs {
        let mut name = None;
        backtrace::resolve(addr as *mut std::ffi::c_void, |symbol| {
            if name.is_none() {
                name = symbol.name().map(|n| n.to_string());
            }
        });
        if let Some(name) = name {
            out.push_str(&format!("{addr:#x} {name}\n"));
        }
    }
    out
}

#[derive(Debug, Clone, Copy)]
enum Capture {
    Pprof,
    Flamegraph,
}

async fn capture(duration: Duration, kind: Capture) -> Response {
    let result = tokio::task::spawn_blocking(move || sample(duration, kind)).await;

    match result {
        Ok(Ok((content_type, body))) => ([(header::CONTENT_TYPE, content_type)], body).into_response(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Profiling failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Profiling task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn sample(duration: Duration, kind: Capture) -> Result<(&'static str, Vec<u8>), pprof::Error> {
    use pprof::protos::Message;

    let guard = pprof::ProfilerGuardBuilder::default()
        .frequency(SAMPLE_FREQUENCY)
        .blocklist(&BLOCKLIST)
        .build()?;
    std::thread::sleep(duration);
    let report = guard.report().build()?;

    match kind {
        Capture::Pprof => {
            let profile = report.pprof()?;
            Ok(("application/octet-stream", profile.encode_to_vec()))
        }
        Capture::Flamegraph => {
            let mut body = Vec::new();
            report.flamegraph(&mut body)?;
            Ok(("image/svg+xml", body))
        }
    }
}
