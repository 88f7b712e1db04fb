//! Relay outcome and error definitions.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that can occur while calling the downstream hook.
#[derive(Debug, Error)]
pub enum RelayError {
    /// No hook URL configured.
    #[error("downstream URL not configured")]
    NotConfigured,

    /// The configured URL could not be used for a request.
    #[error("invalid downstream URL: {0}")]
    InvalidUrl(String),

    /// The single attempt ran past the client timeout.
    #[error("downstream timed out after {0} seconds")]
    Timeout(u64),

    /// Connection, TLS or protocol failure.
    #[error("downstream transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result of the one outbound attempt.
#[derive(Debug)]
pub enum RelayOutcome {
    /// The hook answered 2xx.
    Delivered,
    /// The hook answered, but not with 2xx. The caller is still told success.
    DegradedDelivered { status: StatusCode },
    /// No usable answer from the hook.
    Errored(RelayError),
}

impl RelayOutcome {
    /// Label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            RelayOutcome::Delivered => "delivered",
            RelayOutcome::DegradedDelivered { .. } => "degraded",
            RelayOutcome::Errored(_) => "errored",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(RelayOutcome::Delivered.label(), "delivered");
        assert_eq!(
            RelayOutcome::DegradedDelivered { status: StatusCode::BAD_GATEWAY }.label(),
            "degraded"
        );
        assert_eq!(RelayOutcome::Errored(RelayError::NotConfigured).label(), "errored");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(RelayError::Timeout(120).to_string(), "downstream timed out after 120 seconds");
        assert_eq!(
            RelayError::NotConfigured.to_string(),
            "downstream URL not configured"
        );
    }
}
