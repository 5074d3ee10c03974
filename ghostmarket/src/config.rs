/// Configuration for reaching the GhostMarket state API
///
/// Values come from the environment with local-demo defaults:
/// - `GHOSTMARKET_API_BASE` (default: http://127.0.0.1:8000)
/// - `GHOSTMARKET_TIMEOUT_SECS` (default: 10)
/// - `GHOSTMARKET_POLL_SECS` (default: unset, manual refresh only)
/// - `GHOSTMARKET_TICKER` (default: first enumerated ticker)
use crate::{error::ConfigError, ticker::TickerDescriptor};
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_API_BASE: &str = "GHOSTMARKET_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "GHOSTMARKET_TIMEOUT_SECS";
pub const ENV_POLL_SECS: &str = "GHOSTMARKET_POLL_SECS";
pub const ENV_TICKER: &str = "GHOSTMARKET_TICKER";

/// API client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base url of the state API, without the `/api/state` path
    pub api_base: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Automatic refresh interval, `None` for manual refresh only
    pub poll_interval: Option<Duration>,
    /// Ticker key selected at startup
    pub initial_ticker: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_interval: None,
            initial_ticker: TickerDescriptor::default_ticker().key.to_string(),
        }
    }
}

impl ApiConfig {
    /// Create a new configuration with a custom API base url
    pub fn new(api_base: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            api_base: api_base.into(),
            ..Default::default()
        };
        config.api_base_url()?;
        Ok(config)
    }

    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = match var(ENV_API_BASE) {
            Some(api_base) => Self::new(api_base)?,
            None => Self::default(),
        };

        if let Some(value) = var(ENV_TIMEOUT_SECS) {
            config.request_timeout = Duration::from_secs(parse_seconds(ENV_TIMEOUT_SECS, &value)?);
        }

        if let Some(value) = var(ENV_POLL_SECS) {
            let secs = parse_seconds(ENV_POLL_SECS, &value)?;
            config.poll_interval = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(ticker) = var(ENV_TICKER) {
            config.initial_ticker = ticker.to_lowercase();
        }

        Ok(config)
    }

    /// Set request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set automatic refresh interval
    pub fn with_poll_interval(mut self, interval: Option<Duration>) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set startup ticker key
    pub fn with_initial_ticker(mut self, key: impl Into<String>) -> Self {
        self.initial_ticker = key.into();
        self
    }

    /// Parsed API base url
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.api_base).map_err(|error| ConfigError::InvalidUrl {
            value: self.api_base.clone(),
            reason: error.to_string(),
        })?;

        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                value: self.api_base.clone(),
                reason: "url cannot be a base".to_string(),
            });
        }

        Ok(url)
    }
}

fn parse_seconds(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidSeconds {
        name,
        value: value.to_string(),
    })
}
