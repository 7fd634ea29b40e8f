//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, /robots.txt)
//!     → security::access_control (403 for sensitive paths)
//!     → request.rs (retarget, strip visitor cookies, same-site headers)
//!     → upstream::client (session cookies, round trip)
//!     → response.rs (strip session, rewrite Location, protective headers)
//!     → Send to client
//!
//! Plaintext listener (TLS mode only):
//!     → redirect.rs (302 to https://host/...)
//! ```

pub mod redirect;
pub mod request;
pub mod request_id;
pub mod response;
pub mod server;

pub use request_id::X_REQUEST_ID;
pub use server::HttpServer;
