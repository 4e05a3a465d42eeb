//! API key middleware.
//!
//! When a key is configured, every route except `/health` requires a
//! matching `X-API-Key` header.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::response::ErrorResponse;
use crate::infrastructure::config::ApiKey;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Reject requests without a valid API key.
pub async fn require_api_key(
    State(api_key): State<Option<ApiKey>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = api_key else {
        return next.run(request).await;
    };

    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    let header_present = provided.is_some();

    if provided.is_some_and(|key| expected.matches(key)) {
        return next.run(request).await;
    }

    tracing::warn!(
        path = %request.uri().path(),
        header_present,
        "Rejected request with missing or invalid API key"
    );
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::message("Unauthorized")),
    )
        .into_response()
}
