//! HTTP server setup and the proxy handler.
//!
//! # Responsibilities
//! - Create the Axum router: `/robots.txt` plus a catch-all proxy route
//! - Wire up middleware (request line log, tracing, timeout, request ID,
//!   sensitive-path guard)
//! - Serve over plain HTTP or HTTPS, with graceful shutdown
//! - Forward requests to the upstream and stream responses back

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{uri::Scheme, Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Extension, Router,
};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::request::{build_upstream_request, inbound_host};
use crate::http::request_id::MakeRequestUuid;
use crate::http::response::ResponseRewriter;
use crate::net::tls::Transport;
use crate::observability::{logging, metrics};
use crate::security::access_control::{sensitive_path_guard, AccessFilter};
use crate::session::SessionStore;
use crate::upstream::{Upstream, UpstreamClient};

/// Body served for `/robots.txt`.
pub const ROBOTS_TXT: &str = "User-agent: *\nDisallow: /\n";

/// How long in-flight requests may finish after shutdown is requested.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<Upstream>,
    pub client: UpstreamClient,
    pub external_scheme: Scheme,
    pub security_headers: bool,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server proxying to `upstream` as the session in `session`.
    pub fn new(config: &ProxyConfig, upstream: Upstream, session: SessionStore) -> Self {
        let state = AppState {
            upstream: Arc::new(upstream),
            client: UpstreamClient::new(session, &config.timeouts),
            external_scheme: config.listener.external_scheme(),
            security_headers: config.security.enable_headers,
        };

        let router = Self::build_router(config, state, Arc::new(AccessFilter::default()));
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState, filter: Arc<AccessFilter>) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .route_layer(middleware::from_fn_with_state(filter, sensitive_path_guard))
            .route("/robots.txt", any(robots_handler))
            .with_state(state)
            .layer(middleware::from_fn(logging::log_request_line))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for serving it some other way.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve plain HTTP on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .layer(Extension(Transport::Plain))
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on `listener` until `shutdown` fires.
    pub async fn run_tls(
        self,
        listener: TcpListener,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            drain.graceful_shutdown(Some(DRAIN_TIMEOUT));
        });

        let app = self
            .router
            .layer(Extension(Transport::Tls))
            .into_make_service_with_connect_info::<SocketAddr>();

        axum_server::from_tcp_rustls(listener.into_std()?, tls)
            .handle(handle)
            .serve(app)
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Serve the plaintext redirect-only listener until `shutdown` fires.
pub async fn run_redirect(
    listener: TcpListener,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP redirect server starting");

    axum::serve(listener, crate::http::redirect::redirect_router())
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
}

/// Main proxy handler.
/// Forwards the request upstream as the shared session and rewrites the answer.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let host = inbound_host(&request);
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let outbound = match build_upstream_request(request, &state.upstream) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!(error = %e, path = %path, "Failed to build upstream request");
            metrics::record_request("invalid", 500, start_time);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match state.client.send(outbound).await {
        Ok(response) => {
            let rewriter = ResponseRewriter {
                upstream: &state.upstream,
                external_scheme: &state.external_scheme,
                inbound_host: host.as_deref(),
                security_headers: state.security_headers,
            };
            let response = rewriter.rewrite(response);
            let status = response.status();

            tracing::debug!(method = %method, path = %path, status = %status, "Proxied request");
            metrics::record_request("proxied", status.as_u16(), start_time);

            response.map(Body::new)
        }
        Err(e) => {
            tracing::error!(method = %method, path = %path, error = %e, "proxy error");
            let status = e.status();
            metrics::record_request("upstream_error", status.as_u16(), start_time);
            status.into_response()
        }
    }
}

async fn robots_handler() -> &'static str {
    ROBOTS_TXT
}
