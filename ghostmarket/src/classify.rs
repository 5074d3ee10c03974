//! Threshold classification for dashboard styling
//!
//! Pure mappings from numbers and alerts to display categories. Renderers
//! pick colours per category; nothing here knows about a UI toolkit.

use crate::model::Alert;

/// Sentiment score at or above which a message reads as bullish
pub const BULLISH_THRESHOLD: f64 = 0.35;
/// Sentiment score at or above which a message reads as slightly positive
pub const SLIGHT_POSITIVE_THRESHOLD: f64 = 0.10;
/// Sentiment score at or above which a message reads as neutral
pub const NEUTRAL_THRESHOLD: f64 = -0.10;
/// Absolute percent change beyond which price is considered moving
pub const CHANGE_THRESHOLD_PCT: f64 = 0.01;

/// Tone of a single sentiment value in the vibe table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentimentTone {
    Bullish,
    SlightPositive,
    Neutral,
    Bearish,
}

impl SentimentTone {
    pub fn classify(value: f64) -> Self {
        if value >= BULLISH_THRESHOLD {
            SentimentTone::Bullish
        } else if value >= SLIGHT_POSITIVE_THRESHOLD {
            SentimentTone::SlightPositive
        } else if value >= NEUTRAL_THRESHOLD {
            SentimentTone::Neutral
        } else {
            // Also catches NaN
            SentimentTone::Bearish
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentTone::Bullish => "Bullish",
            SentimentTone::SlightPositive => "Slight +",
            SentimentTone::Neutral => "Neutral",
            SentimentTone::Bearish => "Bearish",
        }
    }
}

/// Direction of the price change pill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeTone {
    Up,
    Flat,
    Down,
}

impl ChangeTone {
    pub fn classify(change_pct: f64) -> Self {
        if change_pct > CHANGE_THRESHOLD_PCT {
            ChangeTone::Up
        } else if change_pct < -CHANGE_THRESHOLD_PCT {
            ChangeTone::Down
        } else {
            ChangeTone::Flat
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            ChangeTone::Up => "▲",
            ChangeTone::Flat => "•",
            ChangeTone::Down => "▼",
        }
    }
}

/// Signal pill on the vibe feed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalTone {
    Up,
    Quiet,
}

impl SignalTone {
    pub fn from_signal_up(signal_up: bool) -> Self {
        if signal_up {
            SignalTone::Up
        } else {
            SignalTone::Quiet
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignalTone::Up => "SIGNAL UP",
            SignalTone::Quiet => "NO STRONG SIGNAL",
        }
    }
}

/// Alert banner category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Imminent,
    Confirmed,
    Neutral,
}

impl AlertKind {
    pub fn from_alert(alert: Option<Alert>) -> Self {
        match alert {
            Some(Alert::ImminentHypePump) => AlertKind::Imminent,
            Some(Alert::HypePumpConfirmed) => AlertKind::Confirmed,
            None => AlertKind::Neutral,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::Imminent => "IMMINENT HYPE PUMP",
            AlertKind::Confirmed => "HYPE CONFIRMED",
            AlertKind::Neutral => "NO STRONG SIGNAL",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            AlertKind::Imminent => "Vibe is surging, but price hasn't moved yet (ΔP < 0.02).",
            AlertKind::Confirmed => "Vibe is surging and price is already reacting (ΔP ≥ 0.02).",
            AlertKind::Neutral => "Waiting for a clear vibe/price divergence.",
        }
    }

    pub fn icon(&self) -> Option<&'static str> {
        match self {
            AlertKind::Imminent => Some("🚨"),
            AlertKind::Confirmed => Some("✅"),
            AlertKind::Neutral => None,
        }
    }

    /// Only the neutral banner carries the raw alert pill.
    pub fn shows_pill(&self) -> bool {
        matches!(self, AlertKind::Neutral)
    }
}

/// Text of the alert pill: the wire label, or "NONE".
pub fn alert_pill_text(alert: Option<Alert>) -> &'static str {
    alert.map(|alert| alert.as_str()).unwrap_or("NONE")
}
