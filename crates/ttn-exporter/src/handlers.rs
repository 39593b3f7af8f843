//! HTTP request handlers for the exporter.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use tracing::{debug, error};
use ttn_metrics::StatsSource;

use crate::error::ExporterResult;
use crate::state::ExporterState;

/// Handle GET on the metrics path - one upstream fetch per request.
pub async fn metrics<S: StatsSource>(
    State(state): State<Arc<ExporterState<S>>>,
) -> ExporterResult<Response> {
    let registry = state.registry();
    let body = registry.scrape().await.inspect_err(|e| {
        error!(gateway = %state.gateway_id(), error = %e, "failed to encode metrics");
    })?;

    debug!(gateway = %state.gateway_id(), bytes = body.len(), "scrape served");
    Ok(([(header::CONTENT_TYPE, registry.content_type())], body).into_response())
}

/// Handle GET / - landing page linking to the metrics path.
pub async fn landing_page<S: StatsSource>(
    State(state): State<Arc<ExporterState<S>>>,
) -> Html<String> {
    let path = escape_html(state.metrics_path());
    let gateway = escape_html(state.gateway_id());
    Html(format!(
        "<html>\n\
         <head><title>TTN Gateway Exporter</title></head>\n\
         <body>\n\
         <h1>TTN Gateway Exporter</h1>\n\
         <p>Gateway: <code>{gateway}</code></p>\n\
         <p><a href=\"{path}\">Metrics</a></p>\n\
         </body>\n\
         </html>\n"
    ))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
