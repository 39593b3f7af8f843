//! Gateway connection statistics as returned by the Gateway Server API.
//!
//! The wire document mixes encodings: `uplink_count` and `downlink_count` are
//! decimal strings while the link counters under `last_status.metrics` are
//! JSON integers. Decoding normalizes both into plain numbers so nothing
//! outside this module ever sees the raw representation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Decoded snapshot of one gateway's connection statistics.
///
/// Built fresh by every fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayConnectionStats {
    /// When the gateway connected to the Gateway Server.
    pub connected_at: Option<DateTime<Utc>>,
    /// Protocol used by the gateway, e.g. `udp` or `ws`.
    pub protocol: Option<String>,
    /// When the last status message arrived.
    pub last_status_received_at: Option<DateTime<Utc>>,
    /// The last status message.
    pub last_status: GatewayStatus,
    /// When the last uplink arrived.
    pub last_uplink_received_at: Option<DateTime<Utc>>,
    /// Uplinks received in the current connection.
    pub uplink_count: f64,
    /// When the last downlink was sent.
    pub last_downlink_received_at: Option<DateTime<Utc>>,
    /// Downlinks sent in the current connection.
    pub downlink_count: f64,
    /// Downlink round-trip time summary.
    pub round_trip_times: Option<RoundTripTimes>,
    /// Frequency sub-bands and their duty-cycle limits.
    pub sub_bands: Vec<SubBand>,
}

/// Status message reported by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayStatus {
    /// Gateway clock at the time of the status.
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    /// When the gateway booted.
    #[serde(default)]
    pub boot_time: Option<DateTime<Utc>>,
    /// Component versions, e.g. `fpga`, `hal`, `ttn-lw-gateway-server`.
    #[serde(default)]
    pub versions: BTreeMap<String, String>,
    /// Reported antenna locations.
    #[serde(default)]
    pub antenna_locations: Vec<AntennaLocation>,
    /// IP addresses of the gateway.
    #[serde(default)]
    pub ip: Vec<String>,
    /// Radio link counters.
    pub metrics: LinkMetrics,
}

/// Radio link counters from the packet forwarder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMetrics {
    /// Percentage of upstream datagrams that were acknowledged.
    pub ackr: u64,
    /// `lpps` counter.
    pub lpps: u64,
    /// Radio packets forwarded.
    pub rxfw: u64,
    /// Radio packets received.
    pub rxin: u64,
    /// Radio packets received with a valid CRC.
    pub rxok: u64,
    /// Downlink packets received for transmission.
    pub txin: u64,
    /// Downlink packets emitted.
    pub txok: u64,
}

/// A single antenna location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntennaLocation {
    /// Latitude in degrees.
    #[serde(default)]
    pub latitude: f64,
    /// Longitude in degrees.
    #[serde(default)]
    pub longitude: f64,
    /// Altitude in meters.
    #[serde(default)]
    pub altitude: i64,
    /// Where the location came from.
    #[serde(default)]
    pub source: Option<String>,
}

/// Summary of downlink round-trip times. Durations stay in their wire form (`"0.041s"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTripTimes {
    /// Fastest round trip.
    #[serde(default)]
    pub min: Option<String>,
    /// Slowest round trip.
    #[serde(default)]
    pub max: Option<String>,
    /// Median round trip.
    #[serde(default)]
    pub median: Option<String>,
    /// Number of samples.
    #[serde(default)]
    pub count: u64,
}

/// A frequency sub-band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubBand {
    /// Lower bound in Hz, as a decimal string.
    #[serde(default)]
    pub min_frequency: Option<String>,
    /// Upper bound in Hz, as a decimal string.
    #[serde(default)]
    pub max_frequency: Option<String>,
    /// Downlink duty-cycle limit (0.0 - 1.0).
    #[serde(default)]
    pub downlink_utilization_limit: Option<f64>,
}

/// Raw document shape; only the counters differ from the decoded snapshot.
#[derive(Debug, Deserialize)]
struct WireConnectionStats {
    #[serde(default)]
    connected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    protocol: Option<String>,
    #[serde(default)]
    last_status_received_at: Option<DateTime<Utc>>,
    last_status: GatewayStatus,
    #[serde(default)]
    last_uplink_received_at: Option<DateTime<Utc>>,
    uplink_count: String,
    #[serde(default)]
    last_downlink_received_at: Option<DateTime<Utc>>,
    downlink_count: String,
    #[serde(default)]
    round_trip_times: Option<RoundTripTimes>,
    #[serde(default)]
    sub_bands: Vec<SubBand>,
}

impl GatewayConnectionStats {
    /// Decodes a response body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Decode`] if the body is not JSON of the expected
    /// shape and [`FetchError::FieldParse`] if a string counter is not a
    /// non-negative number. Nothing is returned on partial success.
    pub fn from_json(body: &[u8]) -> Result<Self, FetchError> {
        let wire: WireConnectionStats = serde_json::from_slice(body)?;
        Self::from_wire(wire)
    }

    fn from_wire(wire: WireConnectionStats) -> Result<Self, FetchError> {
        let uplink_count = parse_counter("uplink_count", &wire.uplink_count)?;
        let downlink_count = parse_counter("downlink_count", &wire.downlink_count)?;

        Ok(Self {
            connected_at: wire.connected_at,
            protocol: wire.protocol,
            last_status_received_at: wire.last_status_received_at,
            last_status: wire.last_status,
            last_uplink_received_at: wire.last_uplink_received_at,
            uplink_count,
            last_downlink_received_at: wire.last_downlink_received_at,
            downlink_count,
            round_trip_times: wire.round_trip_times,
            sub_bands: wire.sub_bands,
        })
    }
}

/// Parses a counter sent as a decimal string.
///
/// `f64::from_str` accepts `NaN`, `inf` and `-0`, so finiteness and sign are
/// checked explicitly.
fn parse_counter(field: &'static str, raw: &str) -> Result<f64, FetchError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.is_sign_positive() => Ok(value),
        _ => Err(FetchError::FieldParse {
            field,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DOCUMENT: &str = r#"{
        "connected_at": "2024-03-01T08:15:02.123456789Z",
        "protocol": "udp",
        "last_status_received_at": "2024-03-01T10:41:30.5Z",
        "last_status": {
            "time": "2024-03-01T10:41:30Z",
            "boot_time": "2024-02-27T06:00:00Z",
            "versions": {
                "fpga": "31",
                "hal": "5.0.1",
                "ttn-lw-gateway-server": "3.29.1"
            },
            "antenna_locations": [
                {"latitude": 52.3731, "longitude": 4.8922, "altitude": 12, "source": "SOURCE_GPS"}
            ],
            "ip": ["10.0.0.17", "2001:db8::17"],
            "metrics": {"ackr": 100, "lpps": 2, "rxfw": 314, "rxin": 402, "rxok": 330, "txin": 12, "txok": 11}
        },
        "last_uplink_received_at": "2024-03-01T10:42:01Z",
        "uplink_count": "4021",
        "last_downlink_received_at": "2024-03-01T10:12:44Z",
        "downlink_count": "118",
        "round_trip_times": {"min": "0.041s", "max": "0.212s", "median": "0.063s", "count": 20},
        "sub_bands": [
            {"min_frequency": "863000000", "max_frequency": "865000000", "downlink_utilization_limit": 0.001},
            {"min_frequency": "868000000", "max_frequency": "868600000", "downlink_utilization_limit": 0.01}
        ],
        "gateway_remote_address": {"ip": "198.51.100.4"}
    }"#;

    fn minimal_document(uplink: &str, downlink: &str) -> String {
        format!(
            r#"{{
                "uplink_count": "{uplink}",
                "downlink_count": "{downlink}",
                "last_status": {{
                    "metrics": {{"ackr": 99, "lpps": 1, "rxfw": 2, "rxin": 3, "rxok": 4, "txin": 5, "txok": 6}}
                }}
            }}"#
        )
    }

    mod decode_tests {
        use super::*;

        #[test]
        fn decodes_full_document() {
            let stats = GatewayConnectionStats::from_json(FULL_DOCUMENT.as_bytes()).unwrap();

            assert!((stats.uplink_count - 4021.0).abs() < f64::EPSILON);
            assert!((stats.downlink_count - 118.0).abs() < f64::EPSILON);
            assert_eq!(
                stats.last_status.metrics,
                LinkMetrics {
                    ackr: 100,
                    lpps: 2,
                    rxfw: 314,
                    rxin: 402,
                    rxok: 330,
                    txin: 12,
                    txok: 11,
                }
            );
            assert_eq!(stats.protocol.as_deref(), Some("udp"));
            assert_eq!(stats.last_status.versions["hal"], "5.0.1");
            assert_eq!(stats.last_status.antenna_locations.len(), 1);
            assert_eq!(stats.last_status.ip.len(), 2);
            assert_eq!(stats.sub_bands.len(), 2);
            assert_eq!(stats.round_trip_times.map(|rtt| rtt.count), Some(20));
            assert!(stats.connected_at.is_some());
        }

        #[test]
        fn ancillary_fields_are_optional() {
            let body = minimal_document("42", "7");
            let stats = GatewayConnectionStats::from_json(body.as_bytes()).unwrap();

            assert!((stats.uplink_count - 42.0).abs() < f64::EPSILON);
            assert!((stats.downlink_count - 7.0).abs() < f64::EPSILON);
            assert_eq!(stats.last_status.metrics.ackr, 99);
            assert!(stats.connected_at.is_none());
            assert!(stats.sub_bands.is_empty());
            assert!(stats.round_trip_times.is_none());
        }

        #[test]
        fn not_json_is_decode_error() {
            let err = GatewayConnectionStats::from_json(b"<html>Bad Gateway</html>").unwrap_err();
            assert!(matches!(err, FetchError::Decode { .. }));
        }

        #[test]
        fn empty_body_is_decode_error() {
            let err = GatewayConnectionStats::from_json(b"").unwrap_err();
            assert!(matches!(err, FetchError::Decode { .. }));
        }

        #[test]
        fn error_document_is_decode_error() {
            let body = br#"{"code": 5, "message": "error:pkg/gatewayserver:not_connected (gateway `gw` not connected)"}"#;
            let err = GatewayConnectionStats::from_json(body).unwrap_err();
            assert!(matches!(err, FetchError::Decode { .. }));
        }

        #[test]
        fn missing_link_metrics_is_decode_error() {
            let body = br#"{"uplink_count": "1", "downlink_count": "1", "last_status": {}}"#;
            let err = GatewayConnectionStats::from_json(body).unwrap_err();
            assert!(matches!(err, FetchError::Decode { .. }));
        }

        #[test]
        fn numeric_uplink_count_is_decode_error() {
            let body = br#"{
                "uplink_count": 42,
                "downlink_count": "7",
                "last_status": {"metrics": {"ackr": 0, "lpps": 0, "rxfw": 0, "rxin": 0, "rxok": 0, "txin": 0, "txok": 0}}
            }"#;
            let err = GatewayConnectionStats::from_json(body).unwrap_err();
            assert!(matches!(err, FetchError::Decode { .. }));
        }

        #[test]
        fn negative_link_counter_is_decode_error() {
            let body = br#"{
                "uplink_count": "1",
                "downlink_count": "1",
                "last_status": {"metrics": {"ackr": -1, "lpps": 0, "rxfw": 0, "rxin": 0, "rxok": 0, "txin": 0, "txok": 0}}
            }"#;
            let err = GatewayConnectionStats::from_json(body).unwrap_err();
            assert!(matches!(err, FetchError::Decode { .. }));
        }
    }

    mod counter_tests {
        use super::*;
        use test_case::test_case;

        #[test_case("0" => 0.0 ; "zero")]
        #[test_case("42" => 42.0 ; "integer")]
        #[test_case("18446744073709551615" => 18_446_744_073_709_551_615.0 ; "u64 max")]
        #[test_case("12.5" => 12.5 ; "fractional")]
        #[test_case("1e3" => 1000.0 ; "exponent")]
        fn parses_valid_counters(raw: &str) -> f64 {
            parse_counter("uplink_count", raw).unwrap()
        }

        #[test_case("N/A" ; "not applicable")]
        #[test_case("" ; "empty")]
        #[test_case(" 42" ; "leading space")]
        #[test_case("-1" ; "negative")]
        #[test_case("-0" ; "negative zero")]
        #[test_case("NaN" ; "nan")]
        #[test_case("inf" ; "infinity")]
        #[test_case("0x10" ; "hexadecimal")]
        fn rejects_invalid_counters(raw: &str) {
            let err = parse_counter("uplink_count", raw).unwrap_err();
            match err {
                FetchError::FieldParse { field, value } => {
                    assert_eq!(field, "uplink_count");
                    assert_eq!(value, raw);
                }
                other => panic!("expected FieldParse, got {other:?}"),
            }
        }

        #[test]
        fn non_numeric_uplink_is_field_parse_not_zero() {
            let body = minimal_document("N/A", "7");
            let err = GatewayConnectionStats::from_json(body.as_bytes()).unwrap_err();
            assert!(matches!(
                err,
                FetchError::FieldParse { field: "uplink_count", .. }
            ));
        }

        #[test]
        fn non_numeric_downlink_is_field_parse() {
            let body = minimal_document("42", "many");
            let err = GatewayConnectionStats::from_json(body.as_bytes()).unwrap_err();
            assert!(matches!(
                err,
                FetchError::FieldParse { field: "downlink_count", .. }
            ));
        }
    }
}
