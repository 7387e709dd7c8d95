//! Configuration validation.
//!
//! # Responsibilities
//! - Check raw environment values before they become bind addresses
//! - Validate value ranges (ports non-zero, addresses parseable)
//!
//! # Design Decisions
//! - Validation is a pure function of the raw text
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{var} must be a port number between 1 and 65535, got {value:?}")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var} must be a socket address such as 0.0.0.0:9000, got {value:?}")]
    InvalidAddress { var: &'static str, value: String },
}

/// Parse a listen port.
pub fn validate_port(var: &'static str, value: &str) -> Result<u16, ValidationError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ValidationError::InvalidPort {
            var,
            value: value.to_string(),
        }),
    }
}

/// Parse a full socket address.
pub fn validate_socket_addr(var: &'static str, value: &str) -> Result<SocketAddr, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidAddress {
            var,
            value: value.to_string(),
        })
}
