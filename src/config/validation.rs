//! Startup configuration validation.
//!
//! Distinct from `crate::error::ValidationError`, which validates individual
//! network records submitted at runtime (spec §4.4 `checkNetwork`). This
//! module validates the process-wide config loaded once at startup.

use std::path::Path;
use thiserror::Error;

use super::types::Config;

#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("server.hostname is required")]
    MissingHostname,

    #[error("limits.max_user_networks must be >= -1, got {0}")]
    InvalidMaxUserNetworks(i64),

    #[error("database.path parent directory does not exist: {0}")]
    DatabasePathInvalid(String),

    #[error("backoff.min_secs must be <= backoff.max_secs (got min={min}, max={max})")]
    InvalidBackoffRange { min: u64, max: u64 },
}

/// Validate a configuration, returning every error found rather than
/// failing fast on the first one.
pub fn validate(config: &Config) -> Result<(), Vec<ConfigValidationError>> {
    let mut errors = Vec::new();

    if config.server.hostname.is_empty() {
        errors.push(ConfigValidationError::MissingHostname);
    }

    if config.limits.max_user_networks < -1 {
        errors.push(ConfigValidationError::InvalidMaxUserNetworks(
            config.limits.max_user_networks,
        ));
    }

    if config.database.path != ":memory:" {
        if let Some(parent) = Path::new(&config.database.path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                errors.push(ConfigValidationError::DatabasePathInvalid(
                    config.database.path.clone(),
                ));
            }
        }
    }

    if config.backoff.min_secs > config.backoff.max_secs {
        errors.push(ConfigValidationError::InvalidBackoffRange {
            min: config.backoff.min_secs,
            max: config.backoff.max_secs,
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
