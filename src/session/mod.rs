//! Upstream session subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     auth.rs (login form POST, settings page GET)
//!     → store.rs (cookies from both responses)
//!
//! Every proxied request:
//!     store.rs → attach cookies → upstream
//!     upstream Set-Cookie → merge → store.rs
//! ```
//!
//! # Design Decisions
//! - Exactly one session, shared by every visitor
//! - Login happens once; failure is fatal, never retried
//! - The store is passed around explicitly, never global

pub mod auth;
pub mod store;

pub use auth::{AuthError, Authenticator};
pub use store::SessionStore;
