//! Core configuration type definitions.

use serde::Deserialize;

use super::defaults::{
    default_backlog_timeout_secs, default_backoff_jitter_secs, default_backoff_max_secs,
    default_backoff_min_secs, default_connect_timeout_secs, default_database_path,
    default_dispatcher_queue_capacity, default_hostname, default_log_path,
    default_registration_timeout_secs, default_request_timeout_secs, default_title,
    default_write_timeout_secs,
};
use super::egress::CidrList;
use super::limits::LimitsConfig;

/// Top-level bouncer configuration, loaded once at startup from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    /// Root path for the filesystem message store. Empty means in-memory
    /// (non-persistent) history, matching spec's `LogPath` contract.
    #[serde(default = "default_log_path")]
    pub log_path: String,

    /// Origins permitted by the (out-of-scope) WebSocket listener. Kept here
    /// because the bouncer's own config surface recognizes the option even
    /// though the listener itself lives outside this crate's scope.
    #[serde(default)]
    pub http_origins: Vec<String>,

    /// Source addresses trusted to set PROXY protocol / WEBIRC-style
    /// real-IP headers.
    #[serde(default)]
    pub accept_proxy_ips: CidrList,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub motd: MotdConfig,

    /// CIDR ranges used for deterministic per-user egress address selection.
    /// Empty means "bind to the default outbound address".
    #[serde(default)]
    pub upstream_user_ips: CidrList,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    #[serde(default)]
    pub backoff: BackoffConfig,
}

/// Bouncer identity.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,

    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            title: default_title(),
        }
    }
}

/// SQLite backing store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Tracing output format, mirrored on the teacher's `LogFormat` switch.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Deadlines applied to suspension points inside the dispatcher (spec §5, §9).
#[derive(Debug, Clone, Deserialize)]
pub struct TimeoutsConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_secs: u64,
    #[serde(default = "default_registration_timeout_secs")]
    pub registration_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_secs: u64,
    #[serde(default = "default_write_timeout_secs")]
    pub write_secs: u64,
    #[serde(default = "default_backlog_timeout_secs")]
    pub backlog_secs: u64,
    #[serde(default = "default_dispatcher_queue_capacity")]
    pub dispatcher_queue_capacity: usize,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            request_secs: default_request_timeout_secs(),
            registration_secs: default_registration_timeout_secs(),
            connect_secs: default_connect_timeout_secs(),
            write_secs: default_write_timeout_secs(),
            backlog_secs: default_backlog_timeout_secs(),
            dispatcher_queue_capacity: default_dispatcher_queue_capacity(),
        }
    }
}

/// Reconnect backoff parameters (spec §4.1 defaults: min 1m, max 10m, jitter 1m).
#[derive(Debug, Clone, Deserialize)]
pub struct BackoffConfig {
    #[serde(default = "default_backoff_min_secs")]
    pub min_secs: u64,
    #[serde(default = "default_backoff_max_secs")]
    pub max_secs: u64,
    #[serde(default = "default_backoff_jitter_secs")]
    pub jitter_secs: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_secs: default_backoff_min_secs(),
            max_secs: default_backoff_max_secs(),
            jitter_secs: default_backoff_jitter_secs(),
        }
    }
}

/// Message of the Day configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MotdConfig {
    pub file: Option<String>,
    #[serde(default)]
    pub lines: Vec<String>,
}

impl MotdConfig {
    /// Load MOTD lines from file, falling back to inline `lines`.
    pub fn load_lines(&self) -> Vec<String> {
        if let Some(ref path) = self.file {
            match std::fs::read_to_string(path) {
                Ok(content) => return content.lines().map(|s| s.to_string()).collect(),
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Failed to read MOTD file");
                }
            }
        }
        self.lines.clone()
    }
}
