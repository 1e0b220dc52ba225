use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorResponse;

/// Header carrying the ingest key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Key required on the observation and pattern ingest routes
///
/// `None` leaves ingest open (local development, single-farm installs).
#[derive(Clone)]
pub struct IngestApiKey(pub Option<String>);

/// Reject ingest requests whose `X-API-Key` doesn't match the configured key
///
/// Read routes never pass through this layer.
pub async fn require_api_key(
    Extension(IngestApiKey(expected_key)): Extension<IngestApiKey>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // No key configured, nothing to check
    let Some(expected) = expected_key else {
        return next.run(request).await;
    };

    let path = request.uri().path().to_string();
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if key == expected => next.run(request).await,
        Some(_) => {
            tracing::warn!(path = %path, "Rejected ingest request with wrong API key");
            unauthorized("Invalid API key", "INVALID_API_KEY")
        }
        None => {
            tracing::warn!(path = %path, "Rejected ingest request without API key");
            unauthorized(
                "API key required. Provide X-API-Key header.",
                "MISSING_API_KEY",
            )
        }
    }
}

fn unauthorized(message: &str, code: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::with_code(message, code)),
    )
        .into_response()
}
