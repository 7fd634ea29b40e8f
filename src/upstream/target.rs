//! The fixed upstream site.
//!
//! The binary always proxies `http://notabenoid.org/`. The target is still an
//! explicit value so the rest of the pipeline never reaches for a global, and
//! so integration tests can point the proxy at a local mock.

use std::str::FromStr;

use axum::http::{
    header::{HeaderValue, InvalidHeaderValue},
    uri::{Authority, InvalidUri, PathAndQuery, Scheme, Uri},
};
use url::Url;

/// Host of the proxied site.
pub const UPSTREAM_HOST: &str = "notabenoid.org";

/// Base URL of the proxied site, also sent as `Referer` and `Origin`.
pub const UPSTREAM_BASE_URL: &str = "http://notabenoid.org/";

/// Page that only renders for a logged-in user.
pub const SETTINGS_PATH: &str = "register/settings";

/// Error building an upstream target.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("invalid upstream authority: {0}")]
    Authority(#[from] InvalidUri),
    #[error("upstream authority is not a valid header value: {0}")]
    Header(#[from] InvalidHeaderValue),
}

/// Scheme, authority and derived header values of the upstream site.
#[derive(Debug, Clone)]
pub struct Upstream {
    scheme: Scheme,
    authority: Authority,
    host_header: HeaderValue,
    base_url: HeaderValue,
}

impl Upstream {
    /// Plain HTTP upstream at `authority` (`host` or `host:port`).
    pub fn http(authority: &str) -> Result<Self, TargetError> {
        let authority = Authority::from_str(authority)?;
        let host_header = HeaderValue::from_str(authority.as_str())?;
        let base_url = HeaderValue::from_str(&format!("http://{}/", authority))?;

        Ok(Self {
            scheme: Scheme::HTTP,
            authority,
            host_header,
            base_url,
        })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Value forced into the outbound `Host` header.
    pub fn host_header(&self) -> &HeaderValue {
        &self.host_header
    }

    /// Value forced into the outbound `Referer` and `Origin` headers.
    pub fn base_url_header(&self) -> &HeaderValue {
        &self.base_url
    }

    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}://{}/", self.scheme, self.authority))
    }

    pub fn settings_url(&self) -> Result<Url, url::ParseError> {
        self.base_url()?.join(SETTINGS_PATH)
    }

    /// Upstream URI for an inbound path and query, which are kept verbatim.
    pub fn uri_for(&self, path_and_query: Option<&PathAndQuery>) -> Result<Uri, axum::http::Error> {
        let path_and_query = path_and_query
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }

    /// Whether `url` points at this upstream site. Hosts compare
    /// case-insensitively and either web scheme counts. Without an explicit
    /// upstream port, `url` must use the default port of its own scheme.
    pub fn is_same_authority(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        let Some(host) = url.host_str() else {
            return false;
        };
        if !host.eq_ignore_ascii_case(self.authority.host()) {
            return false;
        }

        match self.authority.port_u16() {
            Some(port) => url.port_or_known_default() == Some(port),
            None => url.port().is_none(),
        }
    }
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            scheme: Scheme::HTTP,
            authority: Authority::from_static(UPSTREAM_HOST),
            host_header: HeaderValue::from_static(UPSTREAM_HOST),
            base_url: HeaderValue::from_static(UPSTREAM_BASE_URL),
        }
    }
}
