//! Shared state for the exporter server.

use ttn_metrics::{ExporterRegistry, StatsFetcher, StatsSource};

/// State shared by all request handlers.
#[derive(Debug)]
pub struct ExporterState<S = StatsFetcher> {
    /// Registry rendered on the metrics path.
    registry: ExporterRegistry<S>,
    /// Path the metrics are served under.
    metrics_path: String,
}

impl<S: StatsSource> ExporterState<S> {
    /// Create the state.
    pub fn new(registry: ExporterRegistry<S>, metrics_path: impl Into<String>) -> Self {
        Self {
            registry,
            metrics_path: metrics_path.into(),
        }
    }

    /// The metrics registry.
    pub fn registry(&self) -> &ExporterRegistry<S> {
        &self.registry
    }

    /// The metrics path.
    pub fn metrics_path(&self) -> &str {
        &self.metrics_path
    }

    /// The exported gateway.
    pub fn gateway_id(&self) -> &str {
        self.registry.collector().gateway_id()
    }
}
