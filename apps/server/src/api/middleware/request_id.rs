//! Request ID middleware

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Assigns a request ID and wraps the request in a tracing span
///
/// - Server assigns `x-request-id` on every response
/// - A client-supplied `x-request-id` that differs is echoed as `x-correlation-id`
pub async fn request_id_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let client_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let server_id = Uuid::new_v4().to_string();

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let span = tracing::info_span!(
        "http_request",
        http.method = %method,
        http.route = %path,
        request_id = %server_id,
        http.response.status_code = tracing::field::Empty,
    );

    let mut response = async {
        tracing::debug!("Incoming request");
        let response = next.run(req).await;

        let status = response.status();
        tracing::Span::current().record("http.response.status_code", status.as_u16());
        tracing::info!(
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
        response
    }
    .instrument(span)
    .await;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&server_id) {
        headers.insert("x-request-id", value);
    }
    if let Some(client_id) = client_id.filter(|id| *id != server_id) {
        if let Ok(value) = HeaderValue::from_str(&client_id) {
            headers.insert("x-correlation-id", value);
        }
    }

    response
}
