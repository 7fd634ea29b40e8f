//! Sensitive-path filter.
//!
//! # Responsibilities
//! - Classify inbound paths that would let a visitor register accounts or
//!   edit/delete users under the operator's identity
//! - Veto them with 403 before any upstream request is built
//!
//! # Design Decisions
//! - Path only: method and query string play no part
//! - Case-insensitive, applied to the percent-decoded and cleaned path
//!   (repeated `/` merged, `.` and `..` resolved)
//! - Prefix semantics (`/users/1/editor` is blocked too)
//! - No regex: small hand-written rules, O(n) in the path length

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;

use crate::observability::metrics;

/// A rule over a lowercased, percent-decoded, cleaned path.
pub trait PathRule: Send + Sync + std::fmt::Debug {
    fn matches(&self, path: &str) -> bool;
}

/// Matches paths starting with a fixed prefix.
#[derive(Debug, Clone)]
pub struct PrefixRule {
    prefix: String,
}

impl PrefixRule {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_ascii_lowercase(),
        }
    }
}

impl PathRule for PrefixRule {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Matches `/users/<digits>/<action>` for any of the given actions.
#[derive(Debug, Clone)]
pub struct UserActionRule {
    actions: Vec<String>,
}

impl UserActionRule {
    pub fn new<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            actions: actions
                .into_iter()
                .map(|a| a.into().to_ascii_lowercase())
                .collect(),
        }
    }
}

impl PathRule for UserActionRule {
    fn matches(&self, path: &str) -> bool {
        let Some(rest) = path.strip_prefix("/users/") else {
            return false;
        };
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return false;
        }
        match rest[digits..].strip_prefix('/') {
            Some(action) => self.actions.iter().any(|a| action.starts_with(a.as_str())),
            None => false,
        }
    }
}

/// Ordered set of sensitive-path rules; any match blocks.
#[derive(Debug)]
pub struct AccessFilter {
    rules: Vec<Box<dyn PathRule>>,
}

impl AccessFilter {
    pub fn new(rules: Vec<Box<dyn PathRule>>) -> Self {
        Self { rules }
    }

    /// Whether `path` must never reach the upstream site.
    pub fn is_sensitive(&self, path: &str) -> bool {
        let decoded: Cow<'_, str> = percent_decode_str(path).decode_utf8_lossy();
        let normalized = clean_path(&decoded).to_ascii_lowercase();
        self.rules.iter().any(|rule| rule.matches(&normalized))
    }
}

/// Rooted lexical cleanup: empty and `.` segments dropped, `..` removes the
/// segment before it and never climbs above `/`.
fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }
    let mut cleaned = String::with_capacity(path.len());
    for segment in segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    cleaned
}

impl Default for AccessFilter {
    /// Registration plus per-user edit and delete.
    fn default() -> Self {
        Self::new(vec![
            Box::new(PrefixRule::new("/register")),
            Box::new(UserActionRule::new(["edit", "delete"])),
        ])
    }
}

/// Middleware rejecting sensitive paths with 403.
pub async fn sensitive_path_guard(
    State(filter): State<Arc<AccessFilter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if filter.is_sensitive(request.uri().path()) {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Blocked sensitive path"
        );
        metrics::record_blocked();
        return StatusCode::FORBIDDEN.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_blocked() {
        let filter = AccessFilter::default();
        assert!(filter.is_sensitive("/register"));
        assert!(filter.is_sensitive("/register/settings"));
        assert!(filter.is_sensitive("/REGISTER/Invite"));
        assert!(filter.is_sensitive("/registered"));
    }

    #[test]
    fn user_edit_and_delete_are_blocked() {
        let filter = AccessFilter::default();
        assert!(filter.is_sensitive("/users/42/edit"));
        assert!(filter.is_sensitive("/users/42/delete"));
        assert!(filter.is_sensitive("/Users/7/Edit"));
        assert!(filter.is_sensitive("/users/123456/DELETE/confirm"));
    }

    #[test]
    fn other_user_pages_pass() {
        let filter = AccessFilter::default();
        assert!(!filter.is_sensitive("/users/42"));
        assert!(!filter.is_sensitive("/users/42/"));
        assert!(!filter.is_sensitive("/users/42/books"));
        assert!(!filter.is_sensitive("/users/me/edit"));
        assert!(!filter.is_sensitive("/users//edit"));
        assert!(!filter.is_sensitive("/book/1/users/42/edit"));
    }

    #[test]
    fn ordinary_pages_pass() {
        let filter = AccessFilter::default();
        assert!(!filter.is_sensitive("/"));
        assert!(!filter.is_sensitive("/some/page"));
        assert!(!filter.is_sensitive("/search"));
        assert!(!filter.is_sensitive("/blog/register"));
    }

    #[test]
    fn encoded_paths_are_decoded_first() {
        let filter = AccessFilter::default();
        assert!(filter.is_sensitive("/%72egister"));
        assert!(filter.is_sensitive("/users/42/%64elete"));
        assert!(!filter.is_sensitive("/book%2Fregister"));
    }

    #[test]
    fn paths_are_cleaned_before_matching() {
        let filter = AccessFilter::default();
        assert!(filter.is_sensitive("//register"));
        assert!(filter.is_sensitive("//register/settings"));
        assert!(filter.is_sensitive("/./register"));
        assert!(filter.is_sensitive("/x/../register"));
        assert!(filter.is_sensitive("/../../register"));
        assert!(filter.is_sensitive("/users/42//edit"));
        assert!(filter.is_sensitive("//users/42/delete"));
        assert!(filter.is_sensitive("/users/42/./delete"));
        assert!(filter.is_sensitive("/book/%2e%2e/register"));
        assert!(!filter.is_sensitive("/register/../book/1"));
    }

    #[test]
    fn clean_path_resolves_segments() {
        assert_eq!(clean_path(""), "/");
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path("/a//b/./c/"), "/a/b/c");
        assert_eq!(clean_path("/a/b/../../.."), "/");
        assert_eq!(clean_path("a/../b"), "/b");
    }

    #[test]
    fn custom_rules() {
        let filter = AccessFilter::new(vec![Box::new(PrefixRule::new("/Admin"))]);
        assert!(filter.is_sensitive("/admin/panel"));
        assert!(!filter.is_sensitive("/register"));
    }
}
