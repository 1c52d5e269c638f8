//! CIDR-list configuration used for proxy trust and deterministic egress
//! address selection (see `crate::network::addr::local_tcp_addr_for_host`).

use ipnet::IpNet;
use serde::Deserialize;

/// A list of CIDR ranges, deserialized straight from TOML string arrays.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CidrList(pub Vec<IpNet>);

impl CidrList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IpNet> {
        self.0.iter()
    }
}
