use std::env;

use crate::provider::{Ticker, Window};
use crate::ranking::DEFAULT_LIMIT;

/// Most traded US names, used when `STOCK_PULSE_TICKERS` is unset.
pub const DEFAULT_TICKERS: &[&str] = &[
    "AAPL", "MSFT", "GOOG", "AMZN", "TSLA", "META", "NVDA", "NFLX", "AMD", "INTC", "BABA", "UBER",
    "DIS", "PEP", "KO", "NKE", "XOM", "CVX", "BA", "PFE",
];

/// Service configuration derived from environment variables.
#[derive(Debug, Clone)]
pub struct RankingsConfig {
    pub bind: String,
    pub port: u16,
    pub tickers: Vec<Ticker>,
    pub window: Window,
    /// Entries on each side of the ranking.
    pub limit: usize,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Split a comma or whitespace separated symbol list. Symbols are
/// upper-cased and deduplicated, first occurrence wins.
pub fn parse_tickers(raw: &str) -> Vec<Ticker> {
    let mut tickers: Vec<Ticker> = Vec::new();
    for symbol in raw.split(|c: char| c == ',' || c.is_whitespace()) {
        if symbol.is_empty() {
            continue;
        }
        let ticker = Ticker::new(symbol.to_ascii_uppercase());
        if !tickers.contains(&ticker) {
            tickers.push(ticker);
        }
    }
    tickers
}

impl RankingsConfig {
    pub fn from_env() -> Self {
        let tickers = {
            let parsed = parse_tickers(&env_str("STOCK_PULSE_TICKERS", ""));
            if parsed.is_empty() {
                Self::default_tickers()
            } else {
                parsed
            }
        };

        let limit = match env_parse("STOCK_PULSE_LIMIT", DEFAULT_LIMIT) {
            0 => DEFAULT_LIMIT,
            n => n,
        };

        Self {
            bind: env_str("STOCK_PULSE_BIND", "0.0.0.0"),
            port: env_parse("STOCK_PULSE_PORT", 8000),
            tickers,
            window: Window::new(
                env_str("STOCK_PULSE_RANGE", "1d"),
                env_str("STOCK_PULSE_INTERVAL", "1m"),
            ),
            limit,
        }
    }

    pub fn default_tickers() -> Vec<Ticker> {
        DEFAULT_TICKERS.iter().map(|s| Ticker::from(*s)).collect()
    }
}

impl Default for RankingsConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
            tickers: Self::default_tickers(),
            window: Window::default(),
            limit: DEFAULT_LIMIT,
        }
    }
}
