//! Runtime profiling endpoints served under `/debug/pprof/`.
//!
//! # Responsibilities
//! - Route the index, cmdline, profile, symbol and trace endpoints
//! - Run the server until its close handle fires
//!
//! # Design Decisions
//! - The server only stops through [`DebugServerCloser`], which is part of
//!   the teardown set, so in-flight captures finish before exporters flush

pub mod handlers;
pub mod server;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use self::handlers::*;

pub use server::{DebugServer, DebugServerCloser};

/// Router carrying every debug endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/debug/pprof/", get(index))
        .route("/debug/pprof/cmdline", get(cmdline))
        .route("/debug/pprof/profile", get(profile))
        .route("/debug/pprof/symbol", get(symbol_info).post(symbol_lookup))
        .route("/debug/pprof/trace", get(trace))
        .layer(TraceLayer::new_for_http())
}
