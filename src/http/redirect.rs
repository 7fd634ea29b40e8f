//! Plaintext-to-HTTPS redirector.
//!
//! Served on the plaintext listener when the proxy terminates TLS. It never
//! serves content: a request either gets a 302 to the same host over HTTPS
//! or a 404.

use axum::{
    body::Body,
    http::{header::LOCATION, uri::Authority, HeaderValue, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};

use crate::http::request::inbound_host;
use crate::net::tls::Transport;

/// Router answering every request with [`redirect_to_https`].
pub fn redirect_router() -> Router {
    Router::new().fallback(redirect_to_https)
}

pub async fn redirect_to_https(request: Request<Body>) -> Response {
    let secure = matches!(request.extensions().get::<Transport>(), Some(Transport::Tls));
    let host = inbound_host(&request);

    let location = match host {
        Some(host) if !secure => https_location(&host, request.uri()),
        _ => return (StatusCode::NOT_FOUND, "not found\n").into_response(),
    };

    match HeaderValue::from_str(&location) {
        Ok(location) => (StatusCode::FOUND, [(LOCATION, location)]).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "not found\n").into_response(),
    }
}

/// `https://<host without port><path and query of uri>`.
pub fn https_location(host: &str, uri: &Uri) -> String {
    let hostname = host
        .parse::<Authority>()
        .map(|a| a.host().to_string())
        .unwrap_or_else(|_| host.to_string());
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    format!("https://{}{}", hostname, path_and_query)
}
