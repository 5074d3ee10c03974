use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All errors generated while fetching dashboard state.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Error)]
pub enum RequestError {
    #[error("API error: {status}")]
    Status { status: u16 },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("failed to decode state payload: {0}")]
    Decode(String),
}

impl RequestError {
    /// HTTP status returned by the endpoint, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => Self::Status {
                status: status.as_u16(),
            },
            None if value.is_decode() => Self::Decode(value.to_string()),
            None => Self::Transport(value.to_string()),
        }
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

/// Invalid GhostMarket configuration.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid API base url '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("invalid {name} '{value}': expected a whole number of seconds")]
    InvalidSeconds { name: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
