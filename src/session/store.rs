//! Shared upstream cookie jar.
//!
//! One jar per process holds the operator's upstream session. The login
//! client and the per-request sender both read and write it; the jar
//! serializes access internally, so handlers only ever go through
//! [`SessionStore::attach`] and [`SessionStore::merge`].

use std::sync::Arc;

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};
use reqwest::cookie::{CookieStore, Jar};
use url::Url;

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    jar: Arc<Jar>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying jar, for clients that manage cookies themselves.
    pub(crate) fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    /// `Cookie` header value the session would send to `url`, if any.
    pub fn cookie_header(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }

    /// Put the session cookies for `url` on an outbound request.
    ///
    /// Replaces any `Cookie` header already present. Returns whether a
    /// header was set.
    pub fn attach(&self, url: &Url, headers: &mut HeaderMap) -> bool {
        match self.jar.cookies(url) {
            Some(cookies) => {
                headers.insert(COOKIE, cookies);
                true
            }
            None => false,
        }
    }

    /// Absorb every `Set-Cookie` of a response received from `url`.
    ///
    /// Returns the number of `Set-Cookie` headers seen.
    pub fn merge(&self, url: &Url, headers: &HeaderMap) -> usize {
        let set_cookies: Vec<&HeaderValue> = headers.get_all(SET_COOKIE).iter().collect();
        if !set_cookies.is_empty() {
            self.jar.set_cookies(&mut set_cookies.iter().copied(), url);
        }
        set_cookies.len()
    }
}
