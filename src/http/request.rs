//! Request transformation for forwarding.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers
//! - Apply the origin rewrite policy
//! - Propagate the request ID and rule headers
//! - Stream the client body to the upstream unchanged

use axum::body::Body;
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::request::Parts;
use url::Url;

use crate::http::X_REQUEST_ID;
use crate::routing::ProxyRule;

const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Remove hop-by-hop headers, including any named in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in named {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}

/// Headers to send upstream for a request governed by `rule`.
pub fn upstream_headers(rule: &ProxyRule, incoming: &HeaderMap, request_id: &str) -> HeaderMap {
    let mut headers = incoming.clone();
    strip_hop_by_hop(&mut headers);

    if rule.change_origin() {
        if let Ok(host) = HeaderValue::from_str(&rule.upstream_authority()) {
            headers.insert(header::HOST, host);
        }
        if headers.contains_key(header::ORIGIN) {
            let origin = rule.upstream().origin().ascii_serialization();
            if let Ok(origin) = HeaderValue::from_str(&origin) {
                headers.insert(header::ORIGIN, origin);
            }
        }
    }

    for (name, value) in rule.headers() {
        headers.insert(name.clone(), value.clone());
    }

    if let Ok(id) = HeaderValue::from_str(request_id) {
        headers.insert(X_REQUEST_ID, id);
    }
    headers
}

/// Whether the incoming request carries a body at all.
fn has_body(headers: &HeaderMap) -> bool {
    headers.contains_key(header::TRANSFER_ENCODING)
        || headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|len| len.trim() != "0")
}

/// Build the upstream request for a matched client request.
pub fn build_upstream_request(
    client: &reqwest::Client,
    rule: &ProxyRule,
    url: Url,
    parts: &Parts,
    body: Body,
    request_id: &str,
) -> reqwest::RequestBuilder {
    let builder = client
        .request(parts.method.clone(), url)
        .headers(upstream_headers(rule, &parts.headers, request_id));

    if has_body(&parts.headers) {
        builder.body(reqwest::Body::wrap_stream(body.into_data_stream()))
    } else {
        builder
    }
}
