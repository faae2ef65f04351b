//! Response relay and gateway errors.
//!
//! # Responsibilities
//! - Relay the upstream's status, headers and body to the client
//! - Map upstream failures to 502/504
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Hop-by-hop headers stripped automatically
//! - Upstream timeouts result in 504 Gateway Timeout

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::http::client::UpstreamError;
use crate::http::request::strip_hop_by_hop;

/// Convert an upstream response into the client's response.
pub fn relay(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Status code reported to the client for an upstream failure.
pub fn gateway_status(error: &UpstreamError) -> StatusCode {
    match error {
        UpstreamError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Gateway error response for a failed forward.
pub fn gateway_error(error: &UpstreamError) -> Response {
    let message = match gateway_status(error) {
        StatusCode::GATEWAY_TIMEOUT => "Upstream request timed out",
        _ => "Upstream request failed",
    };
    (gateway_status(error), message).into_response()
}
