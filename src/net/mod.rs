//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Configured address
//!     → listener.rs (parse, bind)
//!     → tls.rs (optional TLS handshake via rustls)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Binding happens only after the upstream login succeeded
//! - TLS is optional; certificates come from outside the process

pub mod listener;
pub mod tls;
