//! Exporter configuration.

use std::net::SocketAddr;
use std::time::Duration;

use ttn_metrics::{ApiToken, DEFAULT_API_URL, DEFAULT_TIMEOUT};
use url::Url;

use crate::cli::{Cli, LogFormat};
use crate::error::{ExporterError, ExporterResult};

/// Default scrape listen address.
pub const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 9101);

/// Default metrics path.
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// Configuration for the exporter.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
    /// Path the metrics are served under.
    pub metrics_path: String,
    /// Base URL of the management API.
    pub api_url: String,
    /// API token sent as bearer credentials.
    pub api_token: ApiToken,
    /// Gateway to export.
    pub gateway_id: String,
    /// Deadline for each upstream fetch.
    pub timeout: Duration,
    /// Log output format.
    pub log_format: LogFormat,
}

impl ExporterConfig {
    /// Create a configuration for `gateway_id` with default settings.
    #[must_use]
    pub fn new(api_token: ApiToken, gateway_id: impl Into<String>) -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR,
            metrics_path: DEFAULT_METRICS_PATH.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            api_token,
            gateway_id: gateway_id.into(),
            timeout: DEFAULT_TIMEOUT,
            log_format: LogFormat::default(),
        }
    }

    /// Set the listen address.
    #[must_use]
    pub const fn with_listen_addr(mut self, addr: SocketAddr) -> Self {
        self.listen_addr = addr;
        self
    }

    /// Set the metrics path.
    #[must_use]
    pub fn with_metrics_path(mut self, path: impl Into<String>) -> Self {
        self.metrics_path = path.into();
        self
    }

    /// Set the management API base URL.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the upstream deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the log format.
    #[must_use]
    pub const fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Parses the API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error unless the URL is an absolute `http` or `https` URL.
    pub fn parsed_api_url(&self) -> ExporterResult<Url> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| ExporterError::config(format!("invalid API URL {:?}: {e}", self.api_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ExporterError::config(format!(
                "API URL {:?} must use http or https",
                self.api_url
            )));
        }
        Ok(url)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ExporterError::Config`] describing the first problem found.
    pub fn validate(&self) -> ExporterResult<()> {
        if !self.metrics_path.starts_with('/') {
            return Err(ExporterError::config("metrics path must start with '/'"));
        }
        if self.metrics_path == "/" {
            return Err(ExporterError::config(
                "metrics path must not be '/', which serves the landing page",
            ));
        }
        if self.metrics_path.contains(['{', '}', '*']) {
            return Err(ExporterError::config(
                "metrics path must not contain route parameters",
            ));
        }
        self.parsed_api_url()?;
        if self.api_token.is_empty() {
            return Err(ExporterError::config("API token must not be empty"));
        }
        if self.gateway_id.trim().is_empty() {
            return Err(ExporterError::config("gateway ID must not be empty"));
        }
        if self.timeout.is_zero() {
            return Err(ExporterError::config("timeout must be greater than zero"));
        }
        Ok(())
    }
}

impl TryFrom<Cli> for ExporterConfig {
    type Error = ExporterError;

    fn try_from(cli: Cli) -> ExporterResult<Self> {
        let config = Self::new(cli.token, cli.gateway)
            .with_listen_addr(cli.listen_address)
            .with_metrics_path(cli.metrics_path)
            .with_api_url(cli.api_url)
            .with_timeout(cli.timeout)
            .with_log_format(cli.log_format);
        config.validate()?;
        Ok(config)
    }
}
