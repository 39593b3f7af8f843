//! Route configuration for the exporter.

use std::sync::Arc;

use axum::routing::{get, Router};
use tower_http::trace::TraceLayer;
use ttn_metrics::StatsSource;

use crate::handlers::{landing_page, metrics};
use crate::state::ExporterState;

/// Create the exporter router.
///
/// The metrics path must already be validated; it may not be `/`.
pub fn create_router<S: StatsSource>(state: Arc<ExporterState<S>>) -> Router {
    let metrics_path = state.metrics_path().to_string();

    Router::new()
        .route("/", get(landing_page::<S>))
        .route(&metrics_path, get(metrics::<S>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
