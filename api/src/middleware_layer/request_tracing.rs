//! Request tracing: assigns/propagates `X-Request-ID` and logs one
//! completion line per request with method, path, status, and duration.

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::info;
use uuid::Uuid;

/// Request id made available to handlers via request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

pub async fn request_tracing(mut req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(request_id.clone()));

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let mut response = next.run(req).await;

    let duration_ms = start.elapsed().as_millis();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        duration_ms,
        request_id = %request_id,
        "request completed"
    );

    response
}
