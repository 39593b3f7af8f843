//! The fixed set of metric identities the gateway collector may emit.
//!
//! The table below is the single source of truth for both advertising the
//! collector's shape and emitting values: anything a scrape produces is one of
//! these ten gauges, in this order.

use std::fmt;

/// Namespace shared by every gateway metric.
pub const NAMESPACE: &str = "ttn";

/// One of the gauges exported for a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayMetric {
    /// Whether the last API query succeeded (1) or not (0).
    Up,
    /// Uplink messages received by the gateway server.
    UplinkCount,
    /// Downlink messages sent by the gateway server.
    DownlinkCount,
    /// `ackr` from the gateway's last status message.
    Ackr,
    /// `lpps` from the gateway's last status message.
    Lpps,
    /// `rxfw` from the gateway's last status message.
    Rxfw,
    /// `rxin` from the gateway's last status message.
    Rxin,
    /// `rxok` from the gateway's last status message.
    Rxok,
    /// `txin` from the gateway's last status message.
    Txin,
    /// `txok` from the gateway's last status message.
    Txok,
}

impl GatewayMetric {
    /// Every metric, in emission order.
    pub const ALL: [Self; 10] = [
        Self::Up,
        Self::UplinkCount,
        Self::DownlinkCount,
        Self::Ackr,
        Self::Lpps,
        Self::Rxfw,
        Self::Rxin,
        Self::Rxok,
        Self::Txin,
        Self::Txok,
    ];

    /// Returns the immutable descriptor for this metric.
    #[must_use]
    pub fn descriptor(self) -> &'static MetricDescriptor {
        &DESCRIPTORS[self as usize]
    }
}

/// Name and help text of a gauge. Carries no labels.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MetricDescriptor {
    metric: GatewayMetric,
    name: &'static str,
    help: &'static str,
}

impl MetricDescriptor {
    /// The metric this descriptor identifies.
    #[must_use]
    pub const fn metric(&self) -> GatewayMetric {
        self.metric
    }

    /// Fully-qualified name, e.g. `ttn_up`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Help text rendered in the `# HELP` line.
    #[must_use]
    pub const fn help(&self) -> &'static str {
        self.help
    }
}

impl fmt::Display for MetricDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// Indexed by `GatewayMetric as usize`; order must follow the enum.
static DESCRIPTORS: [MetricDescriptor; 10] = [
    MetricDescriptor {
        metric: GatewayMetric::Up,
        name: "ttn_up",
        help: "Was the last API query successful.",
    },
    MetricDescriptor {
        metric: GatewayMetric::UplinkCount,
        name: "ttn_uplink_count",
        help: "Number of uplink messages received from the gateway in the current connection.",
    },
    MetricDescriptor {
        metric: GatewayMetric::DownlinkCount,
        name: "ttn_downlink_count",
        help: "Number of downlink messages sent to the gateway in the current connection.",
    },
    MetricDescriptor {
        metric: GatewayMetric::Ackr,
        name: "ttn_ackr",
        help: "Percentage of upstream datagrams acknowledged, from the last gateway status.",
    },
    MetricDescriptor {
        metric: GatewayMetric::Lpps,
        name: "ttn_lpps",
        help: "Value of the lpps counter in the last gateway status.",
    },
    MetricDescriptor {
        metric: GatewayMetric::Rxfw,
        name: "ttn_rxfw",
        help: "Number of radio packets forwarded, from the last gateway status.",
    },
    MetricDescriptor {
        metric: GatewayMetric::Rxin,
        name: "ttn_rxin",
        help: "Number of radio packets received, from the last gateway status.",
    },
    MetricDescriptor {
        metric: GatewayMetric::Rxok,
        name: "ttn_rxok",
        help: "Number of radio packets received with a valid CRC, from the last gateway status.",
    },
    MetricDescriptor {
        metric: GatewayMetric::Txin,
        name: "ttn_txin",
        help: "Number of downlink packets received for transmission, from the last gateway status.",
    },
    MetricDescriptor {
        metric: GatewayMetric::Txok,
        name: "ttn_txok",
        help: "Number of downlink packets emitted, from the last gateway status.",
    },
];

/// The descriptor set. Identical on every call for the life of the process.
#[must_use]
pub fn descriptors() -> &'static [MetricDescriptor] {
    &DESCRIPTORS
}
