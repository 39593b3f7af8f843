//! Error types for the exporter server.

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use ttn_metrics::MetricsError;

/// Result type alias for exporter operations.
pub type ExporterResult<T> = Result<T, ExporterError>;

/// Errors that can occur in the exporter.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Failed to bind the listen address.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// Address that could not be bound.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration was rejected.
    #[error("invalid configuration: {reason}")]
    Config {
        /// What is wrong.
        reason: String,
    },

    /// The HTTP server stopped with an error.
    #[error("server error: {reason}")]
    Serve {
        /// Server error message.
        reason: String,
    },

    /// Setting up or encoding metrics failed.
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

impl ExporterError {
    /// Shorthand for a [`ExporterError::Config`].
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

impl IntoResponse for ExporterError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
