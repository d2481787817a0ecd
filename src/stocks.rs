use std::sync::Arc;

use async_trait::async_trait;
use chrono::offset::Utc;
use chrono::{DateTime, NaiveDate, TimeZone};
use tokio::task::JoinSet;
use yahoo_finance_api as yahoo;

use crate::provider::{Batch, DataProvider, PriceSeries, ProviderError, Ticker, Window};

trait QuoteTime {
    fn time(&self) -> Option<DateTime<Utc>>;
}

impl QuoteTime for yahoo::Quote {
    fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.timestamp as i64, 0).single()
    }
}

fn trading_date(time: DateTime<Utc>) -> NaiveDate {
    time.with_timezone(&chrono_tz::US::Eastern).date_naive()
}

/// Closes belonging to the same New York trading date as the newest point,
/// oldest first. Non-finite closes (halted minutes) are dropped.
fn last_session(mut points: Vec<(DateTime<Utc>, f64)>) -> Vec<f64> {
    points.retain(|(_, close)| close.is_finite());
    points.sort_by_key(|(time, _)| *time);

    let Some(session) = points.last().map(|(time, _)| trading_date(*time)) else {
        return Vec::new();
    };

    points
        .into_iter()
        .filter(|(time, _)| trading_date(*time) == session)
        .map(|(_, close)| close)
        .collect()
}

async fn fetch_series(
    connector: &yahoo::YahooConnector,
    ticker: &str,
    window: &Window,
) -> Result<PriceSeries, yahoo::YahooError> {
    let quote_res = connector
        .get_quote_range(ticker, &window.interval, &window.range)
        .await?;

    let quotes = quote_res.quotes()?;
    let points = quotes
        .iter()
        .filter_map(|quote| quote.time().map(|time| (time, quote.close)))
        .collect();

    Ok(PriceSeries::new(last_session(points)))
}

/// Yahoo Finance chart API. Yahoo has no multi-symbol chart endpoint, so a
/// batch is fanned out as one task per ticker over a shared connector.
pub struct YahooProvider {
    connector: Arc<yahoo::YahooConnector>,
}

impl YahooProvider {
    pub fn new() -> Result<Self, ProviderError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|why| ProviderError::Connector(why.to_string()))?;

        Ok(Self {
            connector: Arc::new(connector),
        })
    }
}

#[async_trait]
impl DataProvider for YahooProvider {
    async fn fetch_batch(&self, tickers: &[Ticker], window: &Window) -> Result<Batch, ProviderError> {
        let mut tasks = JoinSet::new();
        for ticker in tickers {
            let connector = Arc::clone(&self.connector);
            let ticker = ticker.clone();
            let window = window.clone();
            tasks.spawn(async move {
                let result = fetch_series(&connector, ticker.as_str(), &window).await;
                (ticker, result)
            });
        }

        let mut fetched = Vec::with_capacity(tickers.len());
        while let Some(joined) = tasks.join_next().await {
            fetched.push(match joined {
                Ok((ticker, Ok(series))) => Ok((ticker, series)),
                Ok((ticker, Err(why))) => {
                    tracing::debug!(%ticker, "quote fetch failed: {why}");
                    Err(why.to_string())
                }
                Err(why) => {
                    tracing::warn!("quote fetch task failed: {why}");
                    Err(why.to_string())
                }
            });
        }

        collect_batch(fetched)
    }
}

/// One ticker's series, or why it could not be fetched.
type Fetched = Result<(Ticker, PriceSeries), String>;

/// Fold per-ticker fetches into a batch.
///
/// Individual misses are normal (delisted, halted) and just leave the ticker
/// out. A non-empty batch where nothing succeeded is an outage.
fn collect_batch(fetched: Vec<Fetched>) -> Result<Batch, ProviderError> {
    let mut batch = Batch::new();
    let mut failed = 0;
    let mut first_error: Option<String> = None;

    for result in fetched {
        match result {
            Ok((ticker, series)) => {
                batch.insert(ticker, series);
            }
            Err(why) => {
                failed += 1;
                first_error.get_or_insert(why);
            }
        }
    }

    match first_error {
        Some(first_error) if batch.is_empty() => Err(ProviderError::Unavailable {
            failed,
            first_error,
        }),
        _ => Ok(batch),
    }
}
