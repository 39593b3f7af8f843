//! Error types for the ttn-metrics crate.

use std::time::Duration;

use thiserror::Error;

/// Classified failure of a single gateway stats fetch.
///
/// Every variant is recoverable: the collector turns any of them into
/// `ttn_up 0` for the scrape in which it happened.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be delivered (DNS, refused, reset, TLS).
    #[error("connection error: {reason}")]
    Connection {
        /// Transport error chain.
        reason: String,
    },

    /// No complete response arrived before the deadline.
    #[error("request timed out after {}ms", timeout.as_millis())]
    Timeout {
        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// The API answered with a non-success status. The body is discarded.
    #[error("unexpected HTTP status {code}")]
    HttpStatus {
        /// Numeric HTTP status code.
        code: u16,
    },

    /// The body is not JSON or does not have the connection-stats shape.
    #[error("failed to decode connection stats: {reason}")]
    Decode {
        /// Decoder message, including line and column.
        reason: String,
    },

    /// A counter transmitted as a string is not a non-negative number.
    #[error("field {field} is not a valid counter: {value:?}")]
    FieldParse {
        /// Wire name of the offending field.
        field: &'static str,
        /// Raw value as received.
        value: String,
    },
}

impl FetchError {
    /// Short, stable label for the error class, used as a log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "connection",
            Self::Timeout { .. } => "timeout",
            Self::HttpStatus { .. } => "http_status",
            Self::Decode { .. } => "decode",
            Self::FieldParse { .. } => "field_parse",
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode {
            reason: err.to_string(),
        }
    }
}

/// Errors raised while setting up the metrics pipeline.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The management API base URL cannot be used to build request URLs.
    #[error("invalid API URL {url}: {reason}")]
    InvalidApiUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {reason}")]
    HttpClient {
        /// Builder error message.
        reason: String,
    },

    /// The registry could not be rendered in the exposition format.
    #[error("failed to encode metrics")]
    Encode,
}

/// Result type for metrics setup and encoding.
pub type Result<T> = std::result::Result<T, MetricsError>;
