//! View model consumed by the presentation layer, and the wire payload it is built from.
//!
//! Field names follow the camelCase JSON served by `/api/state`.

use crate::ticker::TickerDescriptor;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Label used for `eventsLabel` when the server supplies none.
pub const DEFAULT_EVENTS_LABEL: &str = "demo";

/// Decoupling alert raised upstream when vibe and price diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alert {
    /// Vibe is surging but price has not reacted yet
    ImminentHypePump,
    /// Vibe is surging and price is already reacting
    HypePumpConfirmed,
}

impl Alert {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alert::ImminentHypePump => "IMMINENT_HYPE_PUMP",
            Alert::HypePumpConfirmed => "HYPE_PUMP_CONFIRMED",
        }
    }

    /// Parse a wire label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "IMMINENT_HYPE_PUMP" => Some(Alert::ImminentHypePump),
            "HYPE_PUMP_CONFIRMED" => Some(Alert::HypePumpConfirmed),
            _ => None,
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown or null alert labels collapse to "no alert" instead of failing the decode.
fn deserialize_alert<'de, D>(deserializer: D) -> Result<Option<Alert>, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(Alert::from_label))
}

/// Explicit `null` takes the field's default, the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_events_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label.unwrap_or_else(|| DEFAULT_EVENTS_LABEL.to_string()))
}

/// Aggregate sentiment statistics over the server's rolling window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    #[serde(deserialize_with = "null_as_default")]
    pub avg_sentiment: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub signal_up: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub sources: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub events_count: u64,
    #[serde(deserialize_with = "deserialize_events_label")]
    pub events_label: String,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            avg_sentiment: 0.0,
            signal_up: false,
            sources: 0,
            events_count: 0,
            events_label: DEFAULT_EVENTS_LABEL.to_string(),
        }
    }
}

/// Single point of the price series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricePoint {
    /// Time label (e.g. "10:05")
    #[serde(deserialize_with = "null_as_default")]
    pub t: String,
    /// Price
    #[serde(deserialize_with = "null_as_default")]
    pub p: f64,
}

impl PricePoint {
    pub fn new(t: impl Into<String>, p: f64) -> Self {
        Self { t: t.into(), p }
    }
}

/// Latest price snapshot plus a short trend series, oldest first.
///
/// `last` and `change_pct` are zero when absent and `None` when the server
/// sends `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Price {
    pub last: Option<f64>,
    pub change_pct: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub series: Vec<PricePoint>,
}

impl Default for Price {
    fn default() -> Self {
        Self {
            last: Some(0.0),
            change_pct: Some(0.0),
            series: Vec::new(),
        }
    }
}

/// One scored social message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VibeEvent {
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sentiment_value: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub sentiment_label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub time_label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
}

/// Latest decoupling signal for the ticker.
///
/// Metrics are zero when absent and `None` when the server sends `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Signal {
    #[serde(deserialize_with = "deserialize_alert")]
    pub alert: Option<Alert>,
    pub delta_price: Option<f64>,
    pub delta_vibe: Option<f64>,
    pub hype_momentum: Option<f64>,
    pub n: Option<u64>,
}

impl Default for Signal {
    fn default() -> Self {
        Self {
            alert: None,
            delta_price: Some(0.0),
            delta_vibe: Some(0.0),
            hype_momentum: Some(0.0),
            n: Some(0),
        }
    }
}

/// Body of a successful `/api/state` response.
///
/// Any `ticker` object sent by the server is ignored: the controller attaches
/// its own [`TickerDescriptor`]. Missing fields take their shape defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatePayload {
    #[serde(deserialize_with = "null_as_default")]
    pub stats: Stats,
    #[serde(deserialize_with = "null_as_default")]
    pub price: Price,
    #[serde(deserialize_with = "null_as_default")]
    pub vibe_feed: Vec<VibeEvent>,
    #[serde(deserialize_with = "null_as_default")]
    pub signal: Signal,
}

impl StatePayload {
    /// Decode a JSON body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

/// Aggregate shape rendered by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub ticker: TickerDescriptor,
    pub stats: Stats,
    pub price: Price,
    pub vibe_feed: Vec<VibeEvent>,
    pub signal: Signal,
}

impl ViewModel {
    /// Zero-valued model shown before any fetch succeeds.
    pub fn fallback() -> Self {
        Self::from_payload(TickerDescriptor::default_ticker(), StatePayload::default())
    }

    /// Attach a ticker descriptor to a decoded payload.
    pub fn from_payload(ticker: TickerDescriptor, payload: StatePayload) -> Self {
        let StatePayload {
            stats,
            price,
            vibe_feed,
            signal,
        } = payload;

        Self {
            ticker,
            stats,
            price,
            vibe_feed,
            signal,
        }
    }
}

impl Default for ViewModel {
    fn default() -> Self {
        Self::fallback()
    }
}
