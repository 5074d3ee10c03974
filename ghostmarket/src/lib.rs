/// GhostMarket - vibe/price decoupling dashboard core
///
/// This library provides everything a dashboard front end needs short of drawing:
/// - A caller-owned view-state controller that fetches `/api/state` per ticker
/// - The view model and its wire payload
/// - Threshold classification for pills, tones and the alert banner
/// - Money/percent formatting and price chart geometry
///
/// The controller never exposes a missing view: before the first successful
/// fetch it serves a zero-valued fallback, and failed fetches leave the last
/// good view in place.
pub mod chart;
pub mod classify;
pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod model;
pub mod source;
pub mod ticker;

// Re-export commonly used types for convenience
pub use config::ApiConfig;
pub use controller::{Applied, StateUpdate, ViewStateController};
pub use error::{ConfigError, RequestError};
pub use model::{
    Alert, Price, PricePoint, Signal, StatePayload, Stats, VibeEvent, ViewModel,
};
pub use source::{HttpStateSource, StateSource};
pub use ticker::{TICKERS, TickerDescriptor};

pub use chart::ChartScale;
pub use classify::{AlertKind, ChangeTone, SentimentTone, SignalTone};
pub use format::{fmt_count, fmt_metric, fmt_money, fmt_pct};
