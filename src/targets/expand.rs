//! Target expansion.

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use log::warn;

use crate::config::MAX_CIDR_HOSTS;
use crate::error_handling::InputError;

/// Why a target was dropped during expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Not a valid IPv4 or IPv6 address
    InvalidAddress,
    /// Malformed CIDR notation
    InvalidCidr,
    /// CIDR has more usable hosts than the expansion limit
    NetworkTooLarge { hosts: u128, limit: u64 },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::InvalidAddress => f.write_str("not a valid IP address"),
            RejectReason::InvalidCidr => f.write_str("malformed CIDR range"),
            RejectReason::NetworkTooLarge { hosts, limit } => {
                write!(f, "range has {} hosts (limit {})", hosts, limit)
            }
        }
    }
}

/// A dropped target and the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub target: String,
    pub reason: RejectReason,
}

/// Result of expanding a target list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    /// Individual addresses, deduplicated, in first-seen order
    pub ips: Vec<String>,
    /// Entries that could not be used
    pub rejected: Vec<Rejected>,
}

/// Expands IPs and CIDR ranges into a deduplicated list of addresses.
///
/// Invalid entries are dropped. See [`expand_targets_detailed`] for the list
/// of what was dropped.
pub fn expand_targets<S: AsRef<str>>(targets: &[S]) -> Vec<String> {
    expand_targets_detailed(targets).ips
}

/// Expands targets and reports every entry that was dropped.
///
/// Blank entries are skipped silently; everything else that fails to parse
/// ends up in `rejected` and is logged as a warning. Networks are expanded up
/// to [`MAX_CIDR_HOSTS`] usable hosts.
pub fn expand_targets_detailed<S: AsRef<str>>(targets: &[S]) -> Expansion {
    expand_targets_with_limit(targets, MAX_CIDR_HOSTS)
}

/// [`expand_targets_detailed`] with a caller-chosen host limit per network.
pub fn expand_targets_with_limit<S: AsRef<str>>(targets: &[S], max_hosts: u64) -> Expansion {
    let mut expansion = Expansion::default();
    let mut seen = HashSet::new();

    for raw in targets {
        let target = raw.as_ref().trim();
        if target.is_empty() {
            continue;
        }

        match expand_one(target, max_hosts) {
            Ok(addrs) => {
                for addr in addrs {
                    let ip = addr.to_string();
                    if seen.insert(ip.clone()) {
                        expansion.ips.push(ip);
                    }
                }
            }
            Err(reason) => {
                warn!("Skipping target '{}': {}", target, reason);
                expansion.rejected.push(Rejected {
                    target: target.to_string(),
                    reason,
                });
            }
        }
    }

    expansion
}

/// Splits newline-separated input, expands it, and enforces the input rules.
///
/// # Errors
///
/// - `InputError::NoTargets` if the input has no non-blank line
/// - `InputError::NoValidTargets` if nothing survives expansion
pub fn prepare_targets(input: &str) -> Result<Expansion, InputError> {
    prepare_targets_with_limit(input, MAX_CIDR_HOSTS)
}

/// [`prepare_targets`] with a caller-chosen host limit per network.
pub fn prepare_targets_with_limit(input: &str, max_hosts: u64) -> Result<Expansion, InputError> {
    let lines: Vec<&str> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return Err(InputError::NoTargets);
    }

    let expansion = expand_targets_with_limit(&lines, max_hosts);
    if expansion.ips.is_empty() {
        return Err(InputError::NoValidTargets);
    }
    Ok(expansion)
}

fn expand_one(target: &str, max_hosts: u64) -> Result<Vec<IpAddr>, RejectReason> {
    if target.contains('/') {
        let network: IpNetwork = target.parse().map_err(|_| RejectReason::InvalidCidr)?;
        return network_hosts(network, max_hosts);
    }

    target
        .parse::<IpAddr>()
        .map(|ip| vec![ip])
        .map_err(|_| RejectReason::InvalidAddress)
}

/// Usable host addresses of a network (host bits are masked off first).
fn network_hosts(network: IpNetwork, max_hosts: u64) -> Result<Vec<IpAddr>, RejectReason> {
    match network {
        IpNetwork::V4(net) => ipv4_hosts(net, max_hosts),
        IpNetwork::V6(net) => ipv6_hosts(net, max_hosts),
    }
}

fn check_size(hosts: u128, limit: u64) -> Result<(), RejectReason> {
    if hosts > u128::from(limit) {
        return Err(RejectReason::NetworkTooLarge { hosts, limit });
    }
    Ok(())
}

fn ipv4_hosts(net: Ipv4Network, max_hosts: u64) -> Result<Vec<IpAddr>, RejectReason> {
    let prefix = net.prefix();
    let start = u32::from(net.network());
    let size: u64 = 1u64 << (32 - u32::from(prefix));

    // /31 and /32 have no network/broadcast address to exclude
    let (first, count) = if prefix >= 31 {
        (start, size)
    } else {
        (start + 1, size - 2)
    };

    check_size(u128::from(count), max_hosts)?;

    Ok((0..count)
        .map(|offset| IpAddr::V4(Ipv4Addr::from(first + offset as u32)))
        .collect())
}

fn ipv6_hosts(net: Ipv6Network, max_hosts: u64) -> Result<Vec<IpAddr>, RejectReason> {
    let prefix = net.prefix();
    let start = u128::from(net.network());
    let host_bits = 128 - u32::from(prefix);

    // /127 and /128 keep every address; otherwise skip the subnet-router anycast
    let (first, count) = if prefix >= 127 {
        (start, 1u128 << host_bits)
    } else if host_bits >= 128 {
        (start + 1, u128::MAX)
    } else {
        (start + 1, (1u128 << host_bits) - 1)
    };

    check_size(count, max_hosts)?;

    Ok((0..count)
        .map(|offset| IpAddr::V6(Ipv6Addr::from(first + offset)))
        .collect())
}
