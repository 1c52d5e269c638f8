//! Configuration loading and management.
//!
//! Split into logical submodules:
//! - [`types`]: core config struct definitions
//! - [`limits`]: per-user network limits and multi-upstream policy
//! - [`egress`]: CIDR lists for proxy trust and deterministic egress
//! - [`validation`]: startup validation
//! - [`defaults`]: serde default-value functions

mod defaults;
mod egress;
mod limits;
mod types;
mod validation;

pub use egress::CidrList;
pub use limits::LimitsConfig;
pub use types::{
    BackoffConfig, Config, DatabaseConfig, LogFormat, MotdConfig, ServerConfig, TimeoutsConfig,
};
pub use validation::{validate, ConfigValidationError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_string(),
            source: e,
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            source: e,
        })
    }
}
