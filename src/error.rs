use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::provider::ProviderError;

/// Errors surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("provider_error: {0}")]
    Provider(#[from] ProviderError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
        };

        tracing::warn!("request failed: {self}");
        let body = json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
