//! `localTCPAddrForHost`: deterministic per-user egress address selection
//! (spec §4.4), used when `UpstreamUserIPs` is configured.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use ipnet::IpNet;

use crate::error::InternalError;

/// Resolves `host`, picks the IPv6 range if any resolved address is IPv6
/// (else the IPv4 range), and computes `rangeBase + (userID + 1)` as the
/// egress address. Errors if the computed address falls outside the range
/// (e.g. a `/32` or `/128` range has no room for a non-zero user offset).
pub fn local_tcp_addr_for_host(
    ranges: &[IpNet],
    resolved: &[IpAddr],
    user_id: i64,
) -> Result<Option<SocketAddr>, InternalError> {
    if ranges.is_empty() {
        return Ok(None);
    }

    let wants_v6 = resolved.iter().any(|a| a.is_ipv6());

    let range = ranges
        .iter()
        .find(|r| r.addr().is_ipv6() == wants_v6)
        .ok_or_else(|| {
            InternalError::Other(format!(
                "no configured UpstreamUserIPs range matches resolved address family (ipv6={wants_v6})"
            ))
        })?;

    let offset = user_id
        .checked_add(1)
        .ok_or_else(|| InternalError::Other("user id overflow computing egress offset".to_string()))?;

    let addr = match range.addr() {
        IpAddr::V4(base) => {
            let base_bits = u32::from(base);
            let candidate = base_bits
                .checked_add(offset as u32)
                .ok_or_else(|| InternalError::Other("egress address overflow".to_string()))?;
            IpAddr::V4(Ipv4Addr::from(candidate))
        }
        IpAddr::V6(base) => {
            let base_bits = u128::from(base);
            let candidate = base_bits
                .checked_add(offset as u128)
                .ok_or_else(|| InternalError::Other("egress address overflow".to_string()))?;
            IpAddr::V6(Ipv6Addr::from(candidate))
        }
    };

    if !range.contains(&addr) {
        return Err(InternalError::Other(format!(
            "computed egress address {addr} falls outside range {range}"
        )));
    }

    Ok(Some(SocketAddr::new(addr, 0)))
}
