//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Require upstream credentials
//! - Validate value ranges (timeouts > 0 and ordered, addresses parse)
//! - Detect inconsistent listener setups
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("username is required")]
    MissingUsername,
    #[error("password is required")]
    MissingPassword,
    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
    #[error("TLS {0} path is empty")]
    IncompleteTls(&'static str),
    #[error("redirect_address requires TLS to be configured")]
    RedirectWithoutTls,
    #[error("timeouts.upstream_secs ({upstream}) must not exceed timeouts.request_secs ({request})")]
    UpstreamOutlivesRequest { upstream: u64, request: u64 },
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.credentials.username.is_empty() {
        errors.push(ValidationError::MissingUsername);
    }
    if config.credentials.password.is_empty() {
        errors.push(ValidationError::MissingPassword);
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if let Some(redirect) = &config.listener.redirect_address {
        check_address(&mut errors, "listener.redirect_address", redirect);
        if config.listener.tls.is_none() {
            errors.push(ValidationError::RedirectWithoutTls);
        }
    }
    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.as_os_str().is_empty() {
            errors.push(ValidationError::IncompleteTls("certificate"));
        }
        if tls.key_path.as_os_str().is_empty() {
            errors.push(ValidationError::IncompleteTls("key"));
        }
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("timeouts.connect_secs", timeouts.connect_secs),
        ("timeouts.upstream_secs", timeouts.upstream_secs),
        ("timeouts.request_secs", timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }
    // Otherwise the request deadline answers before the upstream one can.
    if timeouts.upstream_secs > timeouts.request_secs {
        errors.push(ValidationError::UpstreamOutlivesRequest {
            upstream: timeouts.upstream_secs,
            request: timeouts.request_secs,
        });
    }

    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
