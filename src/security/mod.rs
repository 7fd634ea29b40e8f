//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → access_control.rs (sensitive path? → 403)
//!     → headers.rs (strip visitor cookies, hop-by-hop headers)
//!     → Pass to upstream
//!
//! Upstream response:
//!     → headers.rs (strip session headers, add protective headers)
//! ```
//!
//! # Design Decisions
//! - Fail closed: a sensitive path never reaches the upstream
//! - No trust in client input

pub mod access_control;
pub mod headers;

pub use access_control::AccessFilter;
