//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse with serde's
//! `#[serde(default = "...")]` attribute, which requires a path to a function.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

pub fn default_hostname() -> String {
    "localhost".to_string()
}

pub fn default_title() -> String {
    "ircbnc".to_string()
}

/// "" means no persistent message store: the in-memory backend is used.
pub fn default_log_path() -> String {
    String::new()
}

/// Negative means unlimited, matching spec's `MaxUserNetworks` contract.
pub fn default_max_user_networks() -> i64 {
    -1
}

pub fn default_database_path() -> String {
    "ircbnc.db".to_string()
}

pub fn default_request_timeout_secs() -> u64 {
    10
}

pub fn default_registration_timeout_secs() -> u64 {
    30
}

pub fn default_connect_timeout_secs() -> u64 {
    15
}

pub fn default_write_timeout_secs() -> u64 {
    10
}

pub fn default_backlog_timeout_secs() -> u64 {
    10
}

pub fn default_backoff_min_secs() -> u64 {
    60
}

pub fn default_backoff_max_secs() -> u64 {
    600
}

pub fn default_backoff_jitter_secs() -> u64 {
    60
}

pub fn default_dispatcher_queue_capacity() -> usize {
    64
}
