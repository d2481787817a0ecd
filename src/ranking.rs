//! Percentage-change ranking over one provider batch.

use std::cmp::Ordering;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::provider::{Batch, DataProvider, PriceSeries, ProviderError, Ticker, Window};

/// Default number of entries in each side of a [`RankingResult`].
pub const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub ticker: Ticker,
    /// Percent, rounded to two decimals.
    pub change: f64,
}

/// Best and worst performers.
///
/// `bottom` is the tail of the same descending list `top` is the head of,
/// so with fewer than `2 * limit` records the two sides share entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankingResult {
    pub top: Vec<ChangeRecord>,
    pub bottom: Vec<ChangeRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Provider returned nothing for the ticker.
    Missing,
    Empty,
    ZeroPrevious,
    NonFinite,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickerOutcome {
    Ranked(ChangeRecord),
    Skipped { ticker: Ticker, reason: SkipReason },
}

/// Two decimals, ties to even on the exact binary value of `value`.
fn round2(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Change between the first and last close of `series`.
pub fn evaluate_ticker(ticker: &Ticker, series: Option<&PriceSeries>) -> TickerOutcome {
    let skip = |reason| TickerOutcome::Skipped {
        ticker: ticker.clone(),
        reason,
    };

    let Some(series) = series else {
        return skip(SkipReason::Missing);
    };
    let (Some(previous), Some(current)) = (series.first(), series.last()) else {
        return skip(SkipReason::Empty);
    };
    if !previous.is_finite() || !current.is_finite() {
        return skip(SkipReason::NonFinite);
    }
    if previous == 0.0 {
        return skip(SkipReason::ZeroPrevious);
    }

    TickerOutcome::Ranked(ChangeRecord {
        ticker: ticker.clone(),
        change: round2((current - previous) / previous * 100.0),
    })
}

/// Sort `records` by change, best first, and cut both ends.
///
/// The sort is stable: equal changes keep their incoming order.
pub fn rank(mut records: Vec<ChangeRecord>, limit: usize) -> RankingResult {
    // 0.0 and -0.0 are the same change; total_cmp would split them.
    records.sort_by(|a, b| b.change.partial_cmp(&a.change).unwrap_or(Ordering::Equal));

    let top = records.iter().take(limit).cloned().collect();
    let bottom = records[records.len().saturating_sub(limit)..].to_vec();

    RankingResult { top, bottom }
}

/// Per-ticker outcomes for a fetched batch, in `tickers` order.
pub fn evaluate_batch(tickers: &[Ticker], batch: &Batch) -> Vec<TickerOutcome> {
    tickers
        .iter()
        .map(|ticker| evaluate_ticker(ticker, batch.get(ticker)))
        .collect()
}

/// Fetch `tickers` in one batch and rank them.
///
/// Tickers without usable data are left out; only a failure of the whole
/// batch is returned as an error.
pub async fn compute_rankings(
    tickers: &[Ticker],
    provider: &dyn DataProvider,
    window: &Window,
    limit: usize,
) -> Result<RankingResult, ProviderError> {
    let batch = provider.fetch_batch(tickers, window).await?;

    let mut records = Vec::with_capacity(tickers.len());
    for outcome in evaluate_batch(tickers, &batch) {
        match outcome {
            TickerOutcome::Ranked(record) => records.push(record),
            TickerOutcome::Skipped { ticker, reason } => {
                tracing::debug!(%ticker, ?reason, "ticker skipped");
            }
        }
    }

    tracing::debug!(ranked = records.len(), requested = tickers.len(), "ranking batch");
    Ok(rank(records, limit))
}
