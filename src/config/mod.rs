//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → cli.rs / environment (PORT, AUTH_USER, AUTH_PASS, SYSLOG_DRAIN_URL)
//!     → validation.rs (semantic checks)
//!     → BrokerConfig (validated, immutable)
//!     → passed explicitly to the server constructor
//! ```
//!
//! # Design Decisions
//! - Config is resolved once at startup; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ConfigOverrides};
pub use schema::{
    AuthConfig, BindingConfig, BrokerConfig, ListenerConfig, LogFormat, ObservabilityConfig,
};
