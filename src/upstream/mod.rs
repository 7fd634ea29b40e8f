//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound request (from http::request)
//!     → client.rs (attach session cookies, round trip with timeout)
//!     → client.rs (merge Set-Cookie into the session)
//!     → Upstream response (to http::response)
//! ```
//!
//! # Design Decisions
//! - Single fixed upstream (target.rs); no routing, no load balancing
//! - No retries: a failed call is reported, never masked
//! - Every round trip has a deadline

pub mod client;
pub mod target;

pub use client::{UpstreamClient, UpstreamError};
pub use target::Upstream;
