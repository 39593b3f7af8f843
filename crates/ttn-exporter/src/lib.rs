//! # ttn-exporter
//!
//! Prometheus exporter for The Things Network gateways.
//!
//! Every scrape of the metrics path fetches the gateway's connection
//! statistics from the Gateway Server API once and renders them as gauges.
//! When the API cannot be reached or answers with garbage, the scrape still
//! succeeds and reports `ttn_up 0`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ttn_exporter::{ExporterConfig, ExporterServer};
//! use ttn_metrics::ApiToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExporterConfig::new(ApiToken::new("NNSXS.EXAMPLE"), "my-gateway");
//!     let server = ExporterServer::new(&config)?;
//!     server.serve(config.listen_addr).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/` | GET | Landing page |
//! | `/metrics` | GET | OpenMetrics exposition (path configurable) |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use cli::{Cli, LogFormat};
pub use config::ExporterConfig;
pub use error::{ExporterError, ExporterResult};
pub use server::ExporterServer;
pub use state::ExporterState;
