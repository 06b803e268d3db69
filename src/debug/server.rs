//! Debug HTTP server bound to the pprof endpoint.

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::lifecycle::{HandleError, Teardown};

/// Serves [`super::router`] until closed.
#[derive(Debug)]
pub struct DebugServer {
    addr: String,
    close: CancellationToken,
}

impl DebugServer {
    /// `addr` is a `host:port` pair; a leading `http://` is ignored.
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            close: CancellationToken::new(),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Handle that stops the server when run during teardown.
    pub fn closer(&self) -> DebugServerCloser {
        DebugServerCloser {
            close: self.close.clone(),
        }
    }

    /// Bind and serve. Failures are logged; they never take the process down.
    pub async fn serve(self) {
        let bind = bind_address(&self.addr).to_string();
        match TcpListener::bind(&bind).await {
            Ok(listener) => self.serve_on(listener).await,
            Err(e) => tracing::error!(address = %bind, error = %e, "Debug server failed to bind"),
        }
    }

    /// Serve on an already bound listener.
    pub async fn serve_on(self, listener: TcpListener) {
        match listener.local_addr() {
            Ok(addr) => tracing::info!(address = %addr, "Debug server starting"),
            Err(e) => tracing::warn!(error = %e, "Debug server address unknown"),
        }

        let result = axum::serve(listener, super::router())
            .with_graceful_shutdown(self.close.cancelled_owned())
            .await;

        match result {
            Ok(()) => tracing::info!("Debug server stopped"),
            Err(e) => tracing::error!(error = %e, "Debug server failed"),
        }
    }
}

fn bind_address(addr: &str) -> &str {
    let addr = addr.strip_prefix("http://").unwrap_or(addr);
    addr.trim_end_matches('/')
}

/// Teardown step closing the debug server.
#[derive(Debug, Clone)]
pub struct DebugServerCloser {
    close: CancellationToken,
}

impl DebugServerCloser {
    pub fn is_closed(&self) -> bool {
        self.close.is_cancelled()
    }
}

impl Teardown for DebugServerCloser {
    fn name(&self) -> &str {
        "debug server"
    }

    fn shutdown(&self) -> Result<(), HandleError> {
        self.close.cancel();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        assert_eq!(bind_address("localhost:6060"), "localhost:6060");
        assert_eq!(bind_address("http://127.0.0.1:6060/"), "127.0.0.1:6060");
    }

    #[tokio::test]
    async fn test_closer_stops_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server = DebugServer::new("127.0.0.1:0");
        let closer = server.closer();
        let task = tokio::spawn(server.serve_on(listener));

        closer.shutdown().unwrap();
        assert!(closer.is_closed());
        tokio::time::timeout(std::time::Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_bind_failure_returns() {
        let server = DebugServer::new("256.0.0.1:bogus");
        tokio::time::timeout(std::time::Duration::from_secs(5), server.serve())
            .await
            .unwrap();
    }
}
