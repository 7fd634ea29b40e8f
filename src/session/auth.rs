//! One-time upstream login.
//!
//! The operator's credentials are posted once at startup. Success requires a
//! 200 on the login form and a 200 on a page only a logged-in user can see.
//! Redirects are not followed: a 302 from the login form means the
//! credentials were not accepted.

use std::time::Duration;

use reqwest::{redirect::Policy, StatusCode};

use crate::config::{CredentialsConfig, TimeoutConfig};
use crate::session::store::SessionStore;
use crate::upstream::target::Upstream;

/// Form field carrying the login name.
const LOGIN_FIELD: &str = "login[login]";
/// Form field carrying the password.
const PASSWORD_FIELD: &str = "login[pass]";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The login form did not answer 200.
    #[error("login rejected: {0}")]
    Rejected(String),
    /// Login looked accepted but the session cannot see authenticated pages.
    #[error("session check failed: {0}")]
    SessionCheck(String),
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid upstream url: {0}")]
    Url(#[from] url::ParseError),
}

/// Performs the login handshake and leaves the resulting cookies in the
/// session store.
#[derive(Debug)]
pub struct Authenticator {
    client: reqwest::Client,
    upstream: Upstream,
}

impl Authenticator {
    pub fn new(
        upstream: Upstream,
        session: &SessionStore,
        timeouts: &TimeoutConfig,
    ) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .cookie_provider(session.jar())
            .redirect(Policy::none())
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .no_proxy()
            .build()?;

        Ok(Self { client, upstream })
    }

    /// Log in and verify the session. Not retried.
    pub async fn login(&self, credentials: &CredentialsConfig) -> Result<(), AuthError> {
        let base_url = self.upstream.base_url()?;
        tracing::info!(
            upstream = %base_url,
            username = %credentials.username,
            "Logging in to upstream"
        );

        let form = [
            (LOGIN_FIELD, credentials.username.as_str()),
            (PASSWORD_FIELD, credentials.password.as_str()),
        ];
        let response = self.client.post(base_url).form(&form).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(status = %status, "Upstream rejected login");
            return Err(AuthError::Rejected(status.to_string()));
        }

        let settings_url = self.upstream.settings_url()?;
        let response = self.client.get(settings_url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(status = %status, "Authenticated page not reachable after login");
            return Err(AuthError::SessionCheck(status.to_string()));
        }

        tracing::info!("Upstream session established");
        Ok(())
    }
}
