//! Static ticker set known at build time.

use serde::Serialize;
use std::fmt;

/// A tradable asset shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TickerDescriptor {
    /// Unique id, also used as the `ticker` query parameter (e.g. "bitcoin")
    pub key: &'static str,
    /// Display name (e.g. "Bitcoin")
    pub label: &'static str,
    /// Exchange-style symbol (e.g. "BTC")
    pub symbol: &'static str,
}

/// Ordered ticker set. The first entry is the default selection.
pub const TICKERS: [TickerDescriptor; 3] = [
    TickerDescriptor {
        key: "bitcoin",
        label: "Bitcoin",
        symbol: "BTC",
    },
    TickerDescriptor {
        key: "ethereum",
        label: "Ethereum",
        symbol: "ETH",
    },
    TickerDescriptor {
        key: "dogecoin",
        label: "Dogecoin",
        symbol: "DOGE",
    },
];

impl TickerDescriptor {
    /// Every known ticker, in display order.
    pub fn all() -> &'static [TickerDescriptor] {
        &TICKERS
    }

    /// The default ticker (first enumerated).
    pub fn default_ticker() -> TickerDescriptor {
        TICKERS[0]
    }

    /// Exact lookup by key.
    pub fn find(key: &str) -> Option<TickerDescriptor> {
        TICKERS.iter().copied().find(|ticker| ticker.key == key)
    }

    /// Lookup by key, falling back to the default ticker for unknown keys.
    pub fn resolve(key: &str) -> TickerDescriptor {
        Self::find(key).unwrap_or_else(Self::default_ticker)
    }

    /// Position of this ticker in [`TICKERS`].
    pub fn index(&self) -> usize {
        TICKERS
            .iter()
            .position(|ticker| ticker.key == self.key)
            .unwrap_or(0)
    }

    /// Next ticker in display order, wrapping around.
    pub fn next(&self) -> TickerDescriptor {
        TICKERS[(self.index() + 1) % TICKERS.len()]
    }
}

impl Default for TickerDescriptor {
    fn default() -> Self {
        Self::default_ticker()
    }
}

impl fmt::Display for TickerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.symbol)
    }
}
