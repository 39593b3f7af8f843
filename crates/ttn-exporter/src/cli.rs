//! Command-line argument parsing with clap.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use ttn_metrics::{ApiToken, DEFAULT_API_URL};

/// Prometheus exporter for The Things Network gateway statistics.
#[derive(Parser, Debug, Clone)]
#[command(name = "ttn-exporter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address to listen on for scrapes.
    #[arg(long = "web.listen-address", env = "TTN_LISTEN_ADDRESS", default_value = "0.0.0.0:9101")]
    pub listen_address: SocketAddr,

    /// Path under which to expose metrics.
    #[arg(long = "web.metrics-path", env = "TTN_METRICS_PATH", default_value = "/metrics")]
    pub metrics_path: String,

    /// Base URL of The Things Stack cluster.
    #[arg(long = "ttn.api-url", env = "TTN_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// API key with gateway read rights.
    #[arg(long = "ttn.token", env = "TTN_TOKEN", hide_env_values = true, value_parser = parse_token)]
    pub token: ApiToken,

    /// Gateway ID to export.
    #[arg(long = "ttn.gateway", env = "TTN_GATEWAY_NAME")]
    pub gateway: String,

    /// Deadline for each upstream request, e.g. `10s` or `1500ms`.
    #[arg(long = "ttn.timeout", env = "TTN_TIMEOUT", default_value = "10s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Log output format.
    #[arg(long, env = "TTN_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Log output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

fn parse_token(raw: &str) -> Result<ApiToken, String> {
    Ok(ApiToken::new(raw))
}
