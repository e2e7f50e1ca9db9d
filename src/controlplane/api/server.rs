//! HTTP API Server
//!
//! Serves the REST router until a shutdown signal arrives.

use crate::error::{Error, Result};
use std::net::SocketAddr;
use tokio::sync::broadcast;
use tracing::info;

use super::rest::RestRouter;
use crate::controlplane::Dispatcher;

// =============================================================================
// Server Configuration
// =============================================================================

/// Default HTTP bind address
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";

/// Configuration for the API server
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// REST API bind address
    pub rest_addr: SocketAddr,
}

impl ApiServerConfig {
    /// Build a config from a textual bind address
    pub fn from_addr(addr: &str) -> Result<Self> {
        let rest_addr = addr
            .parse()
            .map_err(|e| Error::Configuration(format!("Invalid HTTP address {}: {}", addr, e)))?;
        Ok(Self { rest_addr })
    }
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            rest_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

// =============================================================================
// API Server
// =============================================================================

/// HTTP server for the MCP REST routes
pub struct ApiServer {
    config: ApiServerConfig,
    dispatcher: Dispatcher,
    shutdown_tx: broadcast::Sender<()>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiServerConfig, dispatcher: Dispatcher) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            dispatcher,
            shutdown_tx,
        }
    }

    /// Run until [`ApiServer::shutdown`] is called
    pub async fn run(&self) -> Result<()> {
        let addr = self.config.rest_addr;
        let app = RestRouter::new(self.dispatcher.clone()).build();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            Error::Internal(format!("Failed to bind REST server: {}", e))
        })?;
        info!("REST API listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("REST server shutting down");
            })
            .await
            .map_err(|e| Error::Internal(format!("REST server error: {}", e)))?;

        Ok(())
    }

    /// Trigger graceful shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_config() {
        let config = ApiServerConfig::default();
        assert_eq!(config.rest_addr.port(), 3000);
        assert_eq!(
            ApiServerConfig::from_addr(DEFAULT_HTTP_ADDR).unwrap().rest_addr,
            config.rest_addr
        );
    }

    #[test]
    fn test_invalid_addr() {
        assert_matches!(
            ApiServerConfig::from_addr("localhost"),
            Err(Error::Configuration(_))
        );
    }
}
