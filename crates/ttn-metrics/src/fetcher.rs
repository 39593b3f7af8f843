//! HTTP client for the Gateway Server connection-stats endpoint.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use ttn_metrics::{ApiToken, StatsFetcher, StatsSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = StatsFetcher::new(
//!     "https://eu1.cloud.thethings.network".parse()?,
//!     Duration::from_secs(10),
//! )?;
//! let token = ApiToken::new("NNSXS.EXAMPLE");
//! let stats = fetcher.fetch(&token, "my-gateway").await?;
//! println!("uplinks: {}", stats.uplink_count);
//! # Ok(())
//! # }
//! ```

use std::error::Error as _;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::{FetchError, MetricsError, Result};
use crate::stats::GatewayConnectionStats;

/// Default management API: the `eu1` cluster of The Things Network.
pub const DEFAULT_API_URL: &str = "https://eu1.cloud.thethings.network";

/// Default deadline for one fetch, connect through body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Bearer token for the management API.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wraps a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if the token is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(<redacted>)")
    }
}

/// Source of gateway connection statistics.
///
/// This trait allows for testing with fake implementations.
pub trait StatsSource: Send + Sync + 'static {
    /// Fetch the current statistics of `gateway_id`.
    ///
    /// Exactly one upstream request per call, no retries. Dropping the
    /// returned future abandons the request.
    ///
    /// # Errors
    ///
    /// Returns a classified [`FetchError`]; no partial snapshot is ever
    /// returned.
    fn fetch(
        &self,
        api_token: &ApiToken,
        gateway_id: &str,
    ) -> impl Future<Output = std::result::Result<GatewayConnectionStats, FetchError>> + Send;
}

/// Real management API client.
#[derive(Debug, Clone)]
pub struct StatsFetcher {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl StatsFetcher {
    /// Creates a fetcher for the API at `base_url` with the given deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an `http`/`https` base URL or the
    /// HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(MetricsError::InvalidApiUrl {
                url: base_url.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }
        if base_url.cannot_be_a_base() || base_url.host_str().is_none() {
            return Err(MetricsError::InvalidApiUrl {
                url: base_url.to_string(),
                reason: "URL has no host".to_string(),
            });
        }

        let client = Client::builder()
            .user_agent(concat!("ttn-exporter/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| MetricsError::HttpClient {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Builds `<base>/api/v3/gs/gateways/{gateway_id}/connection/stats`.
    ///
    /// The gateway id is percent-encoded as a single path segment.
    #[must_use]
    pub fn endpoint(&self, gateway_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "api",
                "v3",
                "gs",
                "gateways",
                gateway_id,
                "connection",
                "stats",
            ]);
        }
        url
    }

    fn classify(&self, err: &reqwest::Error) -> FetchError {
        if err.is_timeout() {
            return FetchError::Timeout {
                timeout: self.timeout,
            };
        }
        FetchError::Connection {
            reason: error_chain(err),
        }
    }
}

impl StatsSource for StatsFetcher {
    async fn fetch(
        &self,
        api_token: &ApiToken,
        gateway_id: &str,
    ) -> std::result::Result<GatewayConnectionStats, FetchError> {
        let url = self.endpoint(gateway_id);
        debug!(gateway = %gateway_id, url = %url, "fetching connection stats");

        let response = self
            .client
            .get(url)
            .bearer_auth(api_token.expose())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        // Error pages must never be read as a snapshot.
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                code: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify(&e))?;
        GatewayConnectionStats::from_json(&body)
    }
}

/// Flattens an error and its sources into one line.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
