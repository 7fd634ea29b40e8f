//! Upstream sender.
//!
//! One HTTP/1.1 round trip per inbound request: session cookies go out with
//! the request, new `Set-Cookie`s from the response come back into the
//! session store. Redirects are returned to the caller, never followed.

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use url::Url;

use crate::config::TimeoutConfig;
use crate::observability::metrics;
use crate::session::SessionStore;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
    #[error("invalid upstream url: {0}")]
    Url(#[from] url::ParseError),
}

impl UpstreamError {
    /// Status shown to the visitor.
    pub fn status(&self) -> StatusCode {
        match self {
            UpstreamError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Url(_) => "url",
        }
    }
}

/// HTTP client bound to the shared session.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client<HttpConnector, Body>,
    session: SessionStore,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(session: SessionStore, timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            session,
            timeout: Duration::from_secs(timeouts.upstream_secs),
        }
    }

    /// Send `request` with the session cookies and absorb the cookies of
    /// the response. A failed call leaves the session untouched.
    pub async fn send(&self, mut request: Request<Body>) -> Result<Response<Incoming>, UpstreamError> {
        let url = Url::parse(&request.uri().to_string())?;
        self.session.attach(&url, request.headers_mut());

        let result = match tokio::time::timeout(self.timeout, self.client.request(request)).await {
            Ok(result) => result.map_err(UpstreamError::from),
            Err(_) => Err(UpstreamError::Timeout(self.timeout)),
        };
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream_error(e.kind());
                return Err(e);
            }
        };

        let updated = self.session.merge(&url, response.headers());
        if updated > 0 {
            tracing::debug!(cookies = updated, path = %url.path(), "Session cookies updated");
            metrics::record_session_update(updated);
        }

        Ok(response)
    }
}
