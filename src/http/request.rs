//! Request transformation.
//!
//! # Responsibilities
//! - Point the request at the upstream (scheme + authority only)
//! - Keep method, path and query byte-identical
//! - Drop the visitor's cookies and hop-by-hop headers
//! - Make the request look same-site to the upstream (Host, Referer, Origin)
//!
//! # Design Decisions
//! - Always HTTP/1.1 upstream, whatever the visitor negotiated
//! - The body is moved, not read: uploads stream straight through

use axum::{
    body::Body,
    http::{
        header::{HOST, ORIGIN, REFERER},
        HeaderMap, Request, Version,
    },
};

use crate::security::headers::strip_session_headers;
use crate::upstream::Upstream;

/// Build the outbound request for `inbound`.
pub fn build_upstream_request(
    inbound: Request<Body>,
    upstream: &Upstream,
) -> Result<Request<Body>, axum::http::Error> {
    let (parts, body) = inbound.into_parts();
    let uri = upstream.uri_for(parts.uri.path_and_query())?;

    let mut builder = Request::builder()
        .method(parts.method)
        .uri(uri)
        .version(Version::HTTP_11);
    if let Some(headers) = builder.headers_mut() {
        *headers = forwarded_headers(parts.headers, upstream);
    }

    builder.body(body)
}

fn forwarded_headers(mut headers: HeaderMap, upstream: &Upstream) -> HeaderMap {
    strip_session_headers(&mut headers);
    headers.insert(HOST, upstream.host_header().clone());
    headers.insert(REFERER, upstream.base_url_header().clone());
    headers.insert(ORIGIN, upstream.base_url_header().clone());
    headers
}

/// Host the visitor addressed: the `Host` header, or the URI authority for
/// HTTP/2 requests.
pub fn inbound_host<B>(request: &Request<B>) -> Option<String> {
    request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|a| a.as_str().to_string()))
}
