//! ogen: synthetic OpenTelemetry generator.
//!
//! Rolls a ten-sided die forever and reports every roll as a span, a log
//! record and a set of counters, until interrupted.
//!
//! # Architecture Overview
//!
//! ```text
//!   .env file ─┐
//!   env vars  ─┼─▶ config ──▶ observability ──▶ OTLP gRPC  (traces)
//!   flags     ─┘      │            │       └──▶ OTLP HTTP  (logs, metrics)
//!                     │            │
//!                     ▼            ▼
//!                  debug ◀──── lifecycle ────▶ dice
//!              /debug/pprof/   (shutdown,     (rolls, spans,
//!                               teardown)      counters)
//! ```
//!
//! Teardown closes the debug server, then flushes logs, traces and metrics
//! in that order.

use std::process::ExitCode;
use std::sync::Arc;

use ogen::config::{Config, ConfigError, ConfigResolver};
use ogen::debug::DebugServer;
use ogen::dice::DiceGenerator;
use ogen::lifecycle::{signals, Lifecycle, TeardownSet};
use ogen::observability::Telemetry;

fn main() -> ExitCode {
    // Resolved before the runtime exists: the dotenv file writes to the
    // process environment, which must not race other threads.
    let config = match ConfigResolver::from_process().resolve(None) {
        Ok(config) => Arc::new(config),
        Err(ConfigError::Flags(e)) => e.exit(),
        Err(e) => {
            eprintln!("Loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Starting runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(run(config))
}

async fn run(config: Arc<Config>) -> ExitCode {
    let telemetry = match Telemetry::init(&config) {
        Ok(telemetry) => telemetry,
        Err(e) => {
            eprintln!("Initializing telemetry: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        service = %config.service_name,
        pprof = %config.pprof_url,
        runtime_metrics = telemetry.has_runtime_metrics(),
        "ogen starting"
    );

    let server = DebugServer::new(config.pprof_url.clone());
    let teardown = TeardownSet::for_pipeline(
        server.closer(),
        telemetry.logs_shutdown(),
        telemetry.traces_shutdown(),
        telemetry.metrics_shutdown(),
    );

    let lifecycle = Lifecycle::new(teardown);
    let generator = DiceGenerator::new(telemetry.meter(&config.service_name));
    let shutdown = lifecycle.shutdown();

    lifecycle
        .run(
            server.serve(),
            async move {
                // Errors are already logged by the generator.
                let _ = generator.run(shutdown).await;
            },
            signals::interrupt(),
        )
        .await;

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
