//! Response transformation.
//!
//! # Responsibilities
//! - Keep the shared session out of the visitor's browser
//! - Rewrite redirects that point at the upstream so they stay on the proxy
//! - Add protective headers
//!
//! # Design Decisions
//! - Status and body are untouched; the body streams
//! - Only absolute `Location`s naming the upstream host (http or https) are
//!   rewritten;
//!   relative and foreign ones pass through

use axum::http::{
    header::{HeaderValue, LOCATION},
    uri::Scheme,
    Response,
};
use url::Url;

use crate::security::headers::{inject_security_headers, strip_session_headers};
use crate::upstream::Upstream;

/// How the visitor sees the proxy, for one request.
#[derive(Debug, Clone)]
pub struct ResponseRewriter<'a> {
    pub upstream: &'a Upstream,
    /// Scheme visitors use to reach the proxy.
    pub external_scheme: &'a Scheme,
    /// Host the visitor addressed, if known.
    pub inbound_host: Option<&'a str>,
    pub security_headers: bool,
}

impl ResponseRewriter<'_> {
    pub fn rewrite<B>(&self, mut response: Response<B>) -> Response<B> {
        let headers = response.headers_mut();
        strip_session_headers(headers);

        if let Some(host) = self.inbound_host {
            let rewritten = headers
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|loc| rewrite_location(loc, self.upstream, self.external_scheme, host))
                .and_then(|loc| HeaderValue::from_str(&loc).ok());
            if let Some(location) = rewritten {
                headers.insert(LOCATION, location);
            }
        }

        if self.security_headers {
            inject_security_headers(headers);
        }

        response
    }
}

/// `location` moved onto the proxy, or `None` if it does not point at the
/// upstream.
pub fn rewrite_location(
    location: &str,
    upstream: &Upstream,
    scheme: &Scheme,
    host: &str,
) -> Option<String> {
    let url = match location.strip_prefix("//") {
        Some(rest) => Url::parse(&format!("{}://{}", upstream.scheme(), rest)),
        None => Url::parse(location),
    }
    .ok()?;

    if !upstream.is_same_authority(&url) {
        return None;
    }

    let mut rewritten = format!("{}://{}{}", scheme, host, url.path());
    if let Some(query) = url.query() {
        rewritten.push('?');
        rewritten.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        rewritten.push('#');
        rewritten.push_str(fragment);
    }
    Some(rewritten)
}
