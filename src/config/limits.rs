//! Per-user resource limits and multi-upstream policy.

use serde::Deserialize;

use super::defaults::default_max_user_networks;

/// Limits and capability toggles applied uniformly across users.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum networks a single user may register.
    ///
    /// Negative means unlimited; zero rejects all creates.
    #[serde(default = "default_max_user_networks")]
    pub max_user_networks: i64,

    /// Whether downstreams may negotiate the multi-upstream capability
    /// and address all of a user's networks over one session.
    #[serde(default)]
    pub multi_upstream: bool,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_user_networks: default_max_user_networks(),
            multi_upstream: false,
        }
    }
}

impl LimitsConfig {
    /// Whether a user with `current` networks may add one more.
    pub fn allows_additional_network(&self, current: usize) -> bool {
        if self.max_user_networks < 0 {
            return true;
        }
        (current as i64) < self.max_user_networks
    }
}
