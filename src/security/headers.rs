//! Header hygiene shared by both directions of the proxy.
//!
//! # Responsibilities
//! - Strip session and hop-by-hop headers at the proxy boundary
//! - Add protective response headers
//!
//! # Design Decisions
//! - The same list is stripped from requests and responses: the visitor's
//!   cookies never reach the upstream, the shared session never reaches the
//!   visitor

use axum::http::{
    header::{
        HeaderName, HeaderValue, CONNECTION, COOKIE, SET_COOKIE, X_CONTENT_TYPE_OPTIONS,
        X_FRAME_OPTIONS, X_XSS_PROTECTION,
    },
    HeaderMap,
};

/// Headers never forwarded across the proxy, in either direction.
pub static STRIPPED_HEADERS: [HeaderName; 4] = [
    COOKIE,
    SET_COOKIE,
    CONNECTION,
    HeaderName::from_static("keep-alive"),
];

pub fn strip_session_headers(headers: &mut HeaderMap) {
    for name in &STRIPPED_HEADERS {
        headers.remove(name);
    }
}

/// Append framing, XSS-filter and MIME-sniffing protection.
pub fn inject_security_headers(headers: &mut HeaderMap) {
    headers.append(X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
    headers.append(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));
    headers.append(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_every_value_of_listed_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2"));
        headers.append(SET_COOKIE, HeaderValue::from_static("c=3"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert("Keep-Alive", HeaderValue::from_static("timeout=5"));
        headers.insert("accept", HeaderValue::from_static("text/html"));

        strip_session_headers(&mut headers);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("accept").unwrap(), "text/html");
    }

    #[test]
    fn adds_protective_headers() {
        let mut headers = HeaderMap::new();
        inject_security_headers(&mut headers);
        assert_eq!(headers.get(X_FRAME_OPTIONS).unwrap(), "SAMEORIGIN");
        assert_eq!(headers.get(X_XSS_PROTECTION).unwrap(), "1; mode=block");
        assert_eq!(headers.get(X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    }
}
