//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts, body read deadline, body limit)
//! - Check that addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Missing downstream URL/token is not an error; the form stays available

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{RelayConfig, RESPONSE_WAIT_BUDGET_SECS};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("downstream.url '{0}' is not an http(s) URL")]
    InvalidDownstreamUrl(String),

    #[error("downstream.timeout_secs must be within 1..={max}, got {actual}")]
    DownstreamTimeout { actual: u64, max: u64 },

    #[error("timeouts.body_read_secs must be greater than zero")]
    ZeroBodyReadTimeout,

    #[error(
        "timeouts.request_secs ({request}) must exceed downstream.timeout_secs ({downstream}) \
         plus timeouts.body_read_secs ({body_read})"
    )]
    RequestTimeoutTooShort { request: u64, downstream: u64, body_read: u64 },

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if let Some(raw) = &config.downstream.url {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => errors.push(ValidationError::InvalidDownstreamUrl(raw.clone())),
        }
    }

    let downstream = config.downstream.timeout_secs;
    if downstream == 0 || downstream > RESPONSE_WAIT_BUDGET_SECS {
        errors.push(ValidationError::DownstreamTimeout {
            actual: downstream,
            max: RESPONSE_WAIT_BUDGET_SECS,
        });
    }

    let body_read = config.timeouts.body_read_secs;
    if body_read == 0 {
        errors.push(ValidationError::ZeroBodyReadTimeout);
    }

    if config.timeouts.request_secs <= downstream.saturating_add(body_read) {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request: config.timeouts.request_secs,
            downstream,
            body_read,
        });
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
