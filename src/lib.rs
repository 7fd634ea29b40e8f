//! nbgate: reverse proxy to notabenoid.org sharing one logged-in session.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ net::listener ─▶ http::server ─▶ security::access_control ──▶ 403
//!                                                              │
//!                                                              ▼
//!                                                       http::request
//!                                                              │
//!                                   session::store ◀──▶ upstream::client ─────────▶ notabenoid.org
//!                                                              │
//!     Client Response                                          ▼
//!     ◀───────────────────────────────────────────────── http::response
//! ```
//!
//! The operator's credentials are used once at startup (`session::auth`);
//! every visitor afterwards browses as that operator.

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod session;
pub mod upstream;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use session::SessionStore;
pub use upstream::Upstream;
