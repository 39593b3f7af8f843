//! Exporter server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use ttn_metrics::{ExporterRegistry, GatewayCollector, StatsFetcher, StatsSource};

use crate::config::ExporterConfig;
use crate::error::{ExporterError, ExporterResult};
use crate::routes::create_router;
use crate::state::ExporterState;

/// HTTP server exposing gateway metrics to Prometheus.
#[derive(Debug)]
pub struct ExporterServer<S = StatsFetcher> {
    state: Arc<ExporterState<S>>,
}

impl<S> Clone for ExporterServer<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl ExporterServer<StatsFetcher> {
    /// Create a server that fetches from the management API in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &ExporterConfig) -> ExporterResult<Self> {
        config.validate()?;
        let fetcher = StatsFetcher::new(config.parsed_api_url()?, config.timeout)?;
        Self::with_source(config, fetcher)
    }
}

impl<S: StatsSource> ExporterServer<S> {
    /// Create a server around an arbitrary stats source.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_source(config: &ExporterConfig, source: S) -> ExporterResult<Self> {
        config.validate()?;
        let collector =
            GatewayCollector::new(source, config.api_token.clone(), config.gateway_id.clone());
        let registry = ExporterRegistry::new(collector);
        let state = Arc::new(ExporterState::new(registry, config.metrics_path.clone()));
        Ok(Self { state })
    }

    /// Get the server state.
    #[must_use]
    pub fn state(&self) -> Arc<ExporterState<S>> {
        Arc::clone(&self.state)
    }

    /// Start the server and listen for scrapes.
    ///
    /// This method runs until the server encounters a fatal error.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve(&self, addr: SocketAddr) -> ExporterResult<()> {
        self.serve_with_shutdown(addr, std::future::pending()).await
    }

    /// Start the server with graceful shutdown support.
    ///
    /// The server will shut down when the provided future completes. Scrapes
    /// in flight are allowed to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve_with_shutdown<F>(&self, addr: SocketAddr, shutdown: F) -> ExporterResult<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ExporterError::Bind { addr, source })?;
        let local_addr = listener.local_addr().unwrap_or(addr);

        info!(
            addr = %local_addr,
            metrics_path = %self.state.metrics_path(),
            gateway = %self.state.gateway_id(),
            "exporter listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ExporterError::Serve {
                reason: e.to_string(),
            })?;

        info!("exporter shut down");
        Ok(())
    }

    /// Create the router without starting the server.
    ///
    /// Useful for testing or embedding in another server.
    pub fn router(&self) -> axum::Router {
        create_router(Arc::clone(&self.state))
    }
}
