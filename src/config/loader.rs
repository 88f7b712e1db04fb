//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the downstream hook URL.
pub const ENV_HOOK_URL: &str = "OPENCLAW_HOOK_URL";
/// Environment variable holding the downstream bearer token.
pub const ENV_HOOK_TOKEN: &str = "OPENCLAW_HOOK_TOKEN";
/// Environment variable holding the delivery recipient.
pub const ENV_RECIPIENT: &str = "TELEGRAM_CHAT_ID";
pub const ENV_BIND_ADDRESS: &str = "RELAY_BIND_ADDRESS";
pub const ENV_LOG_LEVEL: &str = "RELAY_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a configuration file without validating it.
pub fn read_config_file(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment values onto `config`.
///
/// Empty values are treated as unset so that a blank `TELEGRAM_CHAT_ID=`
/// falls back to the default recipient.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_HOOK_URL) {
        config.downstream.url = Some(url);
    }
    if let Some(token) = get(ENV_HOOK_TOKEN) {
        config.downstream.token = token.into();
    }
    if let Some(recipient) = get(ENV_RECIPIENT) {
        config.downstream.recipient = recipient;
    }
    if let Some(addr) = get(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.observability.log_level = level;
    }
}

/// Build the process configuration: defaults, then the optional TOML file,
/// then `.env` and the process environment. The result is validated.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => RelayConfig::default(),
    };

    // A missing .env file is the normal case.
    let _ = dotenvy::dotenv();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_overrides_downstream() {
        let vars = env(&[
            (ENV_HOOK_URL, "https://hooks.internal/agent"),
            (ENV_HOOK_TOKEN, "s3cret"),
            (ENV_RECIPIENT, "42"),
        ]);
        let mut config = RelayConfig::default();
        apply_env_overrides(&mut config, |k| vars.get(k).cloned());

        assert_eq!(config.downstream.url.as_deref(), Some("https://hooks.internal/agent"));
        assert_eq!(config.downstream.token.expose(), "s3cret");
        assert_eq!(config.downstream.recipient, "42");
    }

    #[test]
    fn test_blank_env_keeps_default_recipient() {
        let vars = env(&[(ENV_RECIPIENT, "  ")]);
        let mut config = RelayConfig::default();
        apply_env_overrides(&mut config, |k| vars.get(k).cloned());

        assert_eq!(config.downstream.recipient, "6285846217");
    }

    #[test]
    fn test_read_config_file() {
        let path = std::env::temp_dir().join(format!("story-relay-{}.toml", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[listener]\nbind_address = \"127.0.0.1:9999\"").unwrap();

        let config = read_config_file(&path).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9999");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigError::Validation(vec![
            ValidationError::ZeroBodyLimit,
            ValidationError::InvalidDownstreamUrl("x".into()),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: security.max_body_size must be greater than zero, \
             downstream.url 'x' is not an http(s) URL"
        );
    }
}
