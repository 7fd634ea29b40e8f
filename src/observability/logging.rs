//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Log one line per inbound request (client, method, URI, referer, agent)
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` takes precedence over the configured level

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{
        header::{REFERER, USER_AGENT},
        HeaderMap, HeaderName, Request,
    },
    middleware::Next,
    response::Response,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global subscriber.
pub fn init(config: &ObservabilityConfig) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(&config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_directives(level: &str) -> String {
    format!("nbgate={level},tower_http={level}")
}

/// Middleware logging the request line before anything else happens to it.
pub async fn log_request_line(request: Request<Body>, next: Next) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());

    tracing::info!(
        client = %client,
        method = %request.method(),
        uri = %request.uri(),
        referer = header_str(request.headers(), &REFERER),
        user_agent = header_str(request.headers(), &USER_AGENT),
        "request"
    );

    next.run(request).await
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
