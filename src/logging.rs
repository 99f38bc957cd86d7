//! Middleware for logging requests and responses.

use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::Error;

/// Bodies longer than this many bytes are truncated in the logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest request body the server will buffer, matching axum's default
/// body limit for extractors.
pub const REQUEST_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Log the request and response for each request.
///
/// The method, path, status and latency are logged at the `info` level.
/// Request and response bodies are logged at the `debug` level, truncated to
/// [LOG_BODY_LENGTH_LIMIT] bytes.
///
/// Request bodies larger than [REQUEST_BODY_LIMIT] are rejected with a
/// `400 Bad Request` before reaching the handler.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, REQUEST_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("could not read body of {method} {path}: {error}");
            return Error::InvalidRequestBody(format!("could not read request body: {error}"))
                .into_response();
        }
    };
    tracing::debug!("request body: {:?}", truncate_body(&body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    // Responses are produced by this server, so they are not size limited.
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("could not read response body of {method} {path}: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::info!(
        "{method} {path} -> {} in {:?}",
        parts.status,
        start.elapsed()
    );
    tracing::debug!("response body: {:?}", truncate_body(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

/// Decode `body` for display, cutting it at [LOG_BODY_LENGTH_LIMIT] bytes.
fn truncate_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);

    if text.len() <= LOG_BODY_LENGTH_LIMIT {
        return text.into_owned();
    }

    // Never split a multi-byte character.
    let end = (0..=LOG_BODY_LENGTH_LIMIT)
        .rev()
        .find(|&index| text.is_char_boundary(index))
        .unwrap_or(0);

    format!("{}...", &text[..end])
}
