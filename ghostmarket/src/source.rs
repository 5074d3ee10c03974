//! Where dashboard state comes from.
//!
//! [`StateSource`] is the seam between the [`ViewStateController`](crate::controller::ViewStateController)
//! and the `/api/state` endpoint, so the controller can be driven by a fake in tests.

use crate::{
    config::ApiConfig,
    error::{ConfigError, RequestError},
    model::StatePayload,
};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// Fetches the [`StatePayload`] for a ticker key.
#[async_trait]
pub trait StateSource: Send + Sync {
    async fn fetch_state(&self, key: &str) -> Result<StatePayload, RequestError>;
}

/// [`StateSource`] backed by `GET {api_base}/api/state?ticker={key}`.
#[derive(Debug, Clone)]
pub struct HttpStateSource {
    client: reqwest::Client,
    api_base: Url,
}

impl HttpStateSource {
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let api_base = config.api_base_url()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|error| ConfigError::HttpClient(error.to_string()))?;

        Ok(Self { client, api_base })
    }

    /// Full request url for a ticker key, with the key query-encoded.
    pub fn state_url(&self, key: &str) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "state"]);
        }
        url.query_pairs_mut().clear().append_pair("ticker", key);
        url
    }
}

#[async_trait]
impl StateSource for HttpStateSource {
    async fn fetch_state(&self, key: &str) -> Result<StatePayload, RequestError> {
        let url = self.state_url(key);
        debug!(%url, "fetching dashboard state");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(StatePayload::from_json(&body)?)
    }
}
