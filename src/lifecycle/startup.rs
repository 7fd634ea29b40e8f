//! Startup orchestration.
//!
//! # Order
//! 1. Validate configuration
//! 2. Log in to the upstream (fatal on failure, nothing is bound yet)
//! 3. Load TLS material, bind listeners
//! 4. Serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when the session is live)

use crate::config::{loader::ConfigError, validation::validate_config, ProxyConfig};
use crate::http::server::{run_redirect, HttpServer};
use crate::lifecycle::shutdown::Shutdown;
use crate::net::{listener, listener::ListenerError, tls::load_tls_config};
use crate::session::{AuthError, Authenticator, SessionStore};
use crate::upstream::Upstream;

/// Anything that stops the proxy from coming up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("failed to log in: {0}; invalid username or password?")]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Listener(#[from] ListenerError),
    #[error("failed to load TLS certificate: {0}")]
    Tls(#[source] std::io::Error),
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Log in, bind and serve until `shutdown` fires.
pub async fn start(
    config: ProxyConfig,
    upstream: Upstream,
    shutdown: &Shutdown,
) -> Result<(), StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    let session = SessionStore::new();
    Authenticator::new(upstream.clone(), &session, &config.timeouts)?
        .login(&config.credentials)
        .await?;

    let server = HttpServer::new(&config, upstream, session);

    match &config.listener.tls {
        Some(tls) => {
            let rustls = load_tls_config(&tls.cert_path, &tls.key_path)
                .await
                .map_err(StartupError::Tls)?;
            let proxy_listener = listener::bind(&config.listener.bind_address).await?;

            if let Some(address) = &config.listener.redirect_address {
                let redirect_listener = listener::bind(address).await?;
                let redirect_shutdown = shutdown.subscribe();
                tokio::spawn(async move {
                    if let Err(e) = run_redirect(redirect_listener, redirect_shutdown).await {
                        tracing::error!(error = %e, "Redirect server failed");
                    }
                });
            }

            tracing::info!("listening...");
            server
                .run_tls(proxy_listener, rustls, shutdown.subscribe())
                .await
                .map_err(StartupError::Serve)
        }
        None => {
            let proxy_listener = listener::bind(&config.listener.bind_address).await?;
            tracing::info!("listening...");
            server
                .run(proxy_listener, shutdown.subscribe())
                .await
                .map_err(StartupError::Serve)
        }
    }
}
