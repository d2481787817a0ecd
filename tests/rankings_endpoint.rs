use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use stock_pulse::config::RankingsConfig;
use stock_pulse::provider::{Batch, DataProvider, PriceSeries, ProviderError, Ticker, Window};
use stock_pulse::routes;
use stock_pulse::state::AppState;

/// Serves fixed series and counts how many batches were requested.
struct FakeProvider {
    series: HashMap<Ticker, PriceSeries>,
    calls: AtomicUsize,
}

impl FakeProvider {
    fn new(pairs: &[(&str, Vec<f64>)]) -> Arc<Self> {
        Arc::new(Self {
            series: pairs
                .iter()
                .map(|(t, closes)| (Ticker::from(*t), PriceSeries::from(closes.clone())))
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl DataProvider for FakeProvider {
    async fn fetch_batch(&self, tickers: &[Ticker], _window: &Window) -> Result<Batch, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(tickers
            .iter()
            .filter_map(|t| self.series.get(t).map(|s| (t.clone(), s.clone())))
            .collect())
    }
}

struct OutageProvider;

#[async_trait]
impl DataProvider for OutageProvider {
    async fn fetch_batch(&self, tickers: &[Ticker], _window: &Window) -> Result<Batch, ProviderError> {
        Err(ProviderError::Unavailable {
            failed: tickers.len(),
            first_error: "dns error".into(),
        })
    }
}

fn config_for(symbols: &[&str]) -> RankingsConfig {
    RankingsConfig {
        tickers: symbols.iter().map(|s| Ticker::from(*s)).collect(),
        ..RankingsConfig::default()
    }
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn rankings_skip_invalid_tickers() {
    let provider = FakeProvider::new(&[
        ("A", vec![100.0, 110.0]),
        ("B", vec![50.0, 45.0]),
        ("C", vec![0.0, 10.0]),
    ]);
    let app = routes::app(AppState::new(config_for(&["A", "B", "C"]), provider.clone()));

    let (status, body) = get(app, "/rankings").await;

    assert_eq!(status, StatusCode::OK);
    let expected = json!([
        { "ticker": "A", "change": 10.0 },
        { "ticker": "B", "change": -10.0 },
    ]);
    assert_eq!(body["top"], expected);
    assert_eq!(body["bottom"], expected);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rankings_over_default_ticker_set() {
    // One percent steps: AAPL +1%, MSFT +2%, ... PFE +20%. DIS has no data.
    let config = RankingsConfig::default();
    let pairs: Vec<(&str, Vec<f64>)> = config
        .tickers
        .iter()
        .enumerate()
        .filter(|(_, t)| t.as_str() != "DIS")
        .map(|(i, t)| (t.as_str(), vec![100.0, 100.0 + (i + 1) as f64]))
        .collect();
    let provider = FakeProvider::new(&pairs);
    let app = routes::app(AppState::new(config.clone(), provider));

    let (status, body) = get(app, "/rankings").await;

    assert_eq!(status, StatusCode::OK);
    let symbols = |side: &str| -> Vec<String> {
        body[side]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["ticker"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(symbols("top"), vec!["PFE", "BA", "CVX", "XOM", "NKE"]);
    assert_eq!(symbols("bottom"), vec!["TSLA", "AMZN", "GOOG", "MSFT", "AAPL"]);
    assert_eq!(body["top"][0]["change"], json!(20.0));
    assert_eq!(body["bottom"][4]["change"], json!(1.0));
}

#[tokio::test]
async fn provider_outage_is_a_gateway_error() {
    let app = routes::app(AppState::new(config_for(&["A"]), Arc::new(OutageProvider)));

    let (status, body) = get(app, "/rankings").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("provider_error:"), "{message}");
    assert!(body.get("top").is_none());
}

#[tokio::test]
async fn health_reports_ok() {
    let app = routes::app(AppState::new(config_for(&[]), FakeProvider::new(&[])));
    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let app = routes::app(AppState::new(config_for(&["A"]), FakeProvider::new(&[])));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/rankings")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
