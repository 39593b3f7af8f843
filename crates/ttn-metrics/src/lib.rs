//! Gateway connection statistics for The Things Stack, as Prometheus gauges.
#![forbid(unsafe_code)]
//!
//! `ttn-metrics` fetches the connection statistics of a single gateway from
//! the Gateway Server API on every scrape and maps them onto a fixed set of
//! ten gauges. Nothing is cached between scrapes.
//!
//! # Features
//!
//! - **Fixed descriptor set**: `ttn_up` plus nine traffic and link gauges
//! - **Classified failures**: connection, timeout, HTTP status, decode and field parse errors
//! - **Graceful degradation**: any upstream failure renders as `ttn_up 0`
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use ttn_metrics::{ApiToken, ExporterRegistry, GatewayCollector, StatsFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = StatsFetcher::new(
//!     "https://eu1.cloud.thethings.network".parse()?,
//!     Duration::from_secs(10),
//! )?;
//! let collector = GatewayCollector::new(fetcher, ApiToken::new("NNSXS.EXAMPLE"), "my-gateway");
//! let registry = ExporterRegistry::new(collector);
//!
//! let exposition = registry.scrape().await?;
//! assert!(exposition.contains("ttn_up"));
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/ttn-metrics/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod collector;
pub mod descriptor;
pub mod error;
pub mod fetcher;
pub mod prometheus;
pub mod stats;

// Re-export main types at crate root
pub use collector::{GatewayCollector, Sample, Scrape};
pub use descriptor::{descriptors, GatewayMetric, MetricDescriptor, NAMESPACE};
pub use error::{FetchError, MetricsError, Result};
pub use fetcher::{ApiToken, StatsFetcher, StatsSource, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use prometheus::{BuildInfo, ExporterRegistry, CONTENT_TYPE};
pub use stats::{GatewayConnectionStats, GatewayStatus, LinkMetrics};
