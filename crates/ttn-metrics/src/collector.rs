//! Per-scrape collection of gateway gauges.
//!
//! A [`GatewayCollector`] holds no snapshot between scrapes. Every call to
//! [`GatewayCollector::collect`] performs exactly one upstream fetch and maps
//! its outcome onto the fixed descriptor set: on success all ten gauges, on
//! any failure only `ttn_up 0`.

use tracing::{debug, warn};

use crate::descriptor::{self, GatewayMetric, MetricDescriptor};
use crate::fetcher::{ApiToken, StatsFetcher, StatsSource};
use crate::stats::GatewayConnectionStats;

/// One `(descriptor, value)` pair produced by a scrape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Which gauge this is.
    pub metric: GatewayMetric,
    /// Gauge value.
    pub value: f64,
}

impl Sample {
    /// Descriptor of the gauge.
    #[must_use]
    pub fn descriptor(&self) -> &'static MetricDescriptor {
        self.metric.descriptor()
    }
}

/// The samples of a single scrape, in descriptor order.
///
/// Consumed once by the encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct Scrape {
    samples: Vec<Sample>,
}

impl Scrape {
    fn down() -> Self {
        Self {
            samples: vec![Sample {
                metric: GatewayMetric::Up,
                value: 0.0,
            }],
        }
    }

    fn from_stats(stats: &GatewayConnectionStats) -> Self {
        let link = &stats.last_status.metrics;
        let samples = GatewayMetric::ALL
            .into_iter()
            .map(|metric| {
                let value = match metric {
                    GatewayMetric::Up => 1.0,
                    GatewayMetric::UplinkCount => stats.uplink_count,
                    GatewayMetric::DownlinkCount => stats.downlink_count,
                    GatewayMetric::Ackr => link.ackr as f64,
                    GatewayMetric::Lpps => link.lpps as f64,
                    GatewayMetric::Rxfw => link.rxfw as f64,
                    GatewayMetric::Rxin => link.rxin as f64,
                    GatewayMetric::Rxok => link.rxok as f64,
                    GatewayMetric::Txin => link.txin as f64,
                    GatewayMetric::Txok => link.txok as f64,
                };
                Sample { metric, value }
            })
            .collect();
        Self { samples }
    }

    /// Returns true if the upstream fetch succeeded.
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.get(GatewayMetric::Up).is_some_and(|up| up > 0.0)
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if there are no samples. Never the case for a real scrape.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Value of `metric`, if it was emitted.
    #[must_use]
    pub fn get(&self, metric: GatewayMetric) -> Option<f64> {
        self.samples
            .iter()
            .find(|s| s.metric == metric)
            .map(|s| s.value)
    }

    /// Iterates over the samples in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }
}

impl IntoIterator for Scrape {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Scrape {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Collector for a single gateway.
///
/// Immutable after construction and safe to share between concurrent
/// scrapes; each scrape owns its own fetch.
#[derive(Debug)]
pub struct GatewayCollector<S = StatsFetcher> {
    source: S,
    api_token: ApiToken,
    gateway_id: String,
}

impl<S: StatsSource> GatewayCollector<S> {
    /// Creates a collector for `gateway_id`.
    #[must_use]
    pub fn new(source: S, api_token: ApiToken, gateway_id: impl Into<String>) -> Self {
        Self {
            source,
            api_token,
            gateway_id: gateway_id.into(),
        }
    }

    /// The gateway this collector reports on.
    #[must_use]
    pub fn gateway_id(&self) -> &str {
        &self.gateway_id
    }

    /// The underlying stats source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Every gauge this collector may emit. Performs no I/O.
    #[must_use]
    pub fn describe(&self) -> &'static [MetricDescriptor] {
        descriptor::descriptors()
    }

    /// Fetches the gateway once and produces this scrape's samples.
    ///
    /// Fetch failures never escape: they are logged and reported as
    /// `ttn_up 0` with no other samples.
    pub async fn collect(&self) -> Scrape {
        match self.source.fetch(&self.api_token, &self.gateway_id).await {
            Ok(stats) => {
                debug!(
                    gateway = %self.gateway_id,
                    uplinks = stats.uplink_count,
                    downlinks = stats.downlink_count,
                    "gateway stats collected"
                );
                Scrape::from_stats(&stats)
            }
            Err(e) => {
                warn!(
                    gateway = %self.gateway_id,
                    kind = e.kind(),
                    error = %e,
                    "failed to fetch gateway stats"
                );
                Scrape::down()
            }
        }
    }
}
