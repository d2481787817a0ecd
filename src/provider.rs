//! Boundary to the market-data provider.
//!
//! The ranking code only sees [`DataProvider`]; [`crate::stocks::YahooProvider`]
//! is the production implementation and tests plug in in-memory fakes.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Symbol of a tradable instrument, e.g. `AAPL`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Ticker {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Chronological close prices of one ticker inside the requested window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    closes: Vec<f64>,
}

impl PriceSeries {
    pub fn new(closes: Vec<f64>) -> Self {
        Self { closes }
    }

    pub fn first(&self) -> Option<f64> {
        self.closes.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.closes.last().copied()
    }
}

impl From<Vec<f64>> for PriceSeries {
    fn from(closes: Vec<f64>) -> Self {
        Self::new(closes)
    }
}

/// Range and bar interval, in the provider's vocabulary (`1d`, `1m`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub range: String,
    pub interval: String,
}

impl Window {
    pub fn new(range: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            interval: interval.into(),
        }
    }
}

impl Default for Window {
    /// Most recent trading day at one-minute granularity.
    fn default() -> Self {
        Self::new("1d", "1m")
    }
}

/// The batch as a whole could not be retrieved.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to build provider client: {0}")]
    Connector(String),
    #[error("no ticker could be fetched ({failed} failed), first error: {first_error}")]
    Unavailable { failed: usize, first_error: String },
}

pub type Batch = HashMap<Ticker, PriceSeries>;

#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetch every ticker in one logical call.
    ///
    /// Tickers without data are simply absent from the returned map; an
    /// `Err` means the whole batch is unusable.
    async fn fetch_batch(&self, tickers: &[Ticker], window: &Window) -> Result<Batch, ProviderError>;
}
