//! Expansion of CIDR-style network ranges into the addresses they cover.
//!
//! Size ceilings are not enforced here. Callers decide with [`admits`]
//! before expanding, using the range's prefix length.

use std::net::IpAddr;

use ipnetwork::IpNetwork;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed network range {input:?}: {reason}")]
pub struct MalformedRangeError {
    pub input: String,
    pub reason: String,
}

pub fn parse_range(notation: &str) -> Result<IpNetwork, MalformedRangeError> {
    notation
        .trim()
        .parse::<IpNetwork>()
        .map_err(|err| MalformedRangeError {
            input: notation.to_string(),
            reason: err.to_string(),
        })
}

/// Every address in the range, ascending, network and broadcast addresses
/// included.
pub fn expand(notation: &str) -> Result<Vec<IpAddr>, MalformedRangeError> {
    Ok(expand_network(parse_range(notation)?).collect())
}

/// Lazy form of [`expand`]; addresses are produced on demand, so even a
/// `/0` costs nothing until it is walked.
pub fn expand_network(network: IpNetwork) -> impl Iterator<Item = IpAddr> + Send {
    network.iter()
}

/// Admission ceiling for a range, expressed as an IPv4 prefix length.
///
/// IPv4 ranges are admitted when their prefix is at least `max_prefix`.
/// IPv6 ranges are held to the same address count: their host bits may not
/// exceed `32 - max_prefix`.
pub fn admits(network: &IpNetwork, max_prefix: u8) -> bool {
    match network {
        IpNetwork::V4(net) => net.prefix() >= max_prefix,
        IpNetwork::V6(net) => {
            let allowed_host_bits = 32u8.saturating_sub(max_prefix);
            128 - net.prefix() <= allowed_host_bits
        }
    }
}
