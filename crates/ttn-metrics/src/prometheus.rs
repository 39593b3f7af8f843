//! Prometheus exposition of gateway scrapes.
//!
//! The gateway gauges are produced on demand by an async fetch, while
//! `prometheus-client` collectors encode synchronously. A scrape therefore
//! collects first and hands the finished [`Scrape`] to a per-request
//! [`Registry`] as a [`Collector`], next to the process-wide build info.

use prometheus_client::collector::Collector;
use prometheus_client::encoding::{DescriptorEncoder, EncodeLabelSet, EncodeMetric};
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::{ConstGauge, Gauge};
use prometheus_client::registry::Registry;
use tracing::debug;

use crate::collector::{GatewayCollector, Scrape};
use crate::error::{MetricsError, Result};
use crate::fetcher::{StatsFetcher, StatsSource};

/// Content type of the rendered exposition.
pub const CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// Name of the build info gauge.
pub const BUILD_INFO_NAME: &str = "ttn_exporter_build_info";

const BUILD_INFO_HELP: &str =
    "A metric with a constant '1' value labeled by version of the exporter";

impl Collector for Scrape {
    fn encode(&self, mut encoder: DescriptorEncoder) -> std::result::Result<(), std::fmt::Error> {
        for sample in self {
            let descriptor = sample.descriptor();
            let gauge = ConstGauge::new(sample.value);
            let metric_encoder = encoder.encode_descriptor(
                descriptor.name(),
                descriptor.help(),
                None,
                gauge.metric_type(),
            )?;
            gauge.encode(metric_encoder)?;
        }
        Ok(())
    }
}

/// Labels of the build info gauge.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct BuildInfoLabels {
    /// Crate version of the exporter.
    pub version: String,
}

/// Constant `1` gauge labeled with the running version.
#[derive(Debug, Clone, Default)]
pub struct BuildInfo {
    family: Family<BuildInfoLabels, Gauge>,
}

impl BuildInfo {
    /// Creates the gauge for `version`.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        let family = Family::<BuildInfoLabels, Gauge>::default();
        family
            .get_or_create(&BuildInfoLabels {
                version: version.into(),
            })
            .set(1);
        Self { family }
    }

    fn register(&self, registry: &mut Registry) {
        registry.register(BUILD_INFO_NAME, BUILD_INFO_HELP, self.family.clone());
    }
}

/// Everything rendered on the metrics endpoint.
///
/// Built once at startup; [`ExporterRegistry::scrape`] may run concurrently.
#[derive(Debug)]
pub struct ExporterRegistry<S = StatsFetcher> {
    collector: GatewayCollector<S>,
    build_info: BuildInfo,
}

impl<S: StatsSource> ExporterRegistry<S> {
    /// Wraps `collector`, labeling build info with this crate's version.
    #[must_use]
    pub fn new(collector: GatewayCollector<S>) -> Self {
        Self::with_build_info(collector, BuildInfo::new(env!("CARGO_PKG_VERSION")))
    }

    /// Wraps `collector` with explicit build info.
    #[must_use]
    pub fn with_build_info(collector: GatewayCollector<S>, build_info: BuildInfo) -> Self {
        Self {
            collector,
            build_info,
        }
    }

    /// The wrapped collector.
    #[must_use]
    pub fn collector(&self) -> &GatewayCollector<S> {
        &self.collector
    }

    /// Collects once and renders the exposition text.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Encode`] if rendering fails. Upstream failures
    /// are not errors; they render as `ttn_up 0`.
    pub async fn scrape(&self) -> Result<String> {
        let scrape = self.collector.collect().await;
        debug!(
            gateway = %self.collector.gateway_id(),
            up = scrape.is_up(),
            samples = scrape.len(),
            "scrape collected"
        );
        self.encode(scrape)
    }

    /// Renders an already collected scrape.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Encode`] if rendering fails.
    pub fn encode(&self, scrape: Scrape) -> Result<String> {
        let mut registry = Registry::default();
        self.build_info.register(&mut registry);
        registry.register_collector(Box::new(scrape));

        let mut body = String::new();
        prometheus_client::encoding::text::encode(&mut body, &registry)
            .map_err(|_| MetricsError::Encode)?;
        Ok(body)
    }

    /// Content type for [`ExporterRegistry::scrape`] output.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }
}
