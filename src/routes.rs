use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::error::ApiError;
use crate::ranking::{compute_rankings, RankingResult};
use crate::state::AppState;

/// Full application: routes, permissive CORS for the dashboard, shared state.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/rankings", get(rankings))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn rankings(State(state): State<Arc<AppState>>) -> Result<Json<RankingResult>, ApiError> {
    let config = &state.config;
    let result = compute_rankings(
        &config.tickers,
        state.provider.as_ref(),
        &config.window,
        config.limit,
    )
    .await?;

    Ok(Json(result))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
