//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::config::secret::SecretString;

/// Upper bound on how long the downstream hook may take to answer.
pub const RESPONSE_WAIT_BUDGET_SECS: u64 = 120;

/// Recipient used when `TELEGRAM_CHAT_ID` is not configured.
pub const DEFAULT_RECIPIENT: &str = "6285846217";

/// Root configuration for the submission relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Downstream automation hook.
    pub downstream: DownstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8787").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8787".to_string(),
        }
    }
}

/// Downstream hook configuration.
///
/// `url` and `token` are secrets supplied by the environment in production.
/// Neither is required to start: a relay without them still serves the form
/// and reports failures through the normal outcome path.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownstreamConfig {
    /// Full URL of the hook endpoint.
    pub url: Option<String>,

    /// Bearer token, sent in both auth headers.
    pub token: SecretString,

    /// Chat the automation agent should deliver to.
    pub recipient: String,

    /// Client timeout for the single outbound attempt, in seconds.
    pub timeout_secs: u64,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: SecretString::default(),
            recipient: DEFAULT_RECIPIENT.to_string(),
            timeout_secs: RESPONSE_WAIT_BUDGET_SECS,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Time allowed for the caller to finish sending the body, in seconds.
    pub body_read_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: RESPONSE_WAIT_BUDGET_SECS + 10,
            body_read_secs: 5,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.downstream.recipient, DEFAULT_RECIPIENT);
        assert_eq!(config.downstream.timeout_secs, 120);
        assert!(config.downstream.url.is_none());
        assert!(
            config.timeouts.request_secs
                > config.downstream.timeout_secs + config.timeouts.body_read_secs
        );
        // Long stories are truncated, not refused at the body limit.
        assert!(config.security.max_body_size >= 100 * 1024);
    }

    #[test]
    fn test_partial_toml() {
        let config: RelayConfig = toml::from_str(
            r#"
            [downstream]
            url = "https://hooks.internal/agent"
            token = "abc"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.downstream.url.as_deref(), Some("https://hooks.internal/agent"));
        assert_eq!(config.downstream.token.expose(), "abc");
        assert_eq!(config.downstream.recipient, DEFAULT_RECIPIENT);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8787");
    }
}
