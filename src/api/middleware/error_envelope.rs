//! Rewrites bare framework error responses into the JSON error envelope.

use std::any::Any;

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;

/// Largest error body read back when building the envelope message.
const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;

fn is_json(content_type: Option<&HeaderValue>) -> bool {
    content_type
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json") || v.contains("+json"))
        .unwrap_or(false)
}

/// 4xx/5xx responses that are not already JSON get wrapped.
///
/// Response headers other than the content headers (for example `Allow` on
/// a 405) are carried over.
pub async fn envelope_http_errors(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error())
        || is_json(response.headers().get(header::CONTENT_TYPE))
    {
        return response;
    }

    let (parts, body) = response.into_parts();
    let text = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(_) => String::new(),
    };
    let message = if text.is_empty() {
        status.canonical_reason().unwrap_or("Error").to_string()
    } else {
        text
    };

    let mut enveloped = AppError::http(status, message).into_response();
    for (name, value) in parts.headers.iter() {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            enveloped.headers_mut().append(name.clone(), value.clone());
        }
    }

    enveloped
}

/// 404 for unmatched routes
pub async fn not_found_fallback() -> AppError {
    AppError::http(StatusCode::NOT_FOUND, "Not Found")
}

/// `CatchPanicLayer` handler: log the payload, answer with a 500 envelope.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::internal(format!("Handler panicked: {}", detail)).into_response()
}
