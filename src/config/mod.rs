//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → .env + process environment (loader.rs)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc with the relay client
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The downstream token is a [`SecretString`] and never reaches logs

pub mod loader;
pub mod schema;
pub mod secret;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    DownstreamConfig, ListenerConfig, LogFormat, ObservabilityConfig, RelayConfig,
    SecurityConfig, TimeoutConfig,
};
pub use secret::SecretString;
