//! Local network address discovery

use beacon_core::{RegistryError, RegistryResult};
use std::net::{IpAddr, Ipv4Addr};

/// Non-loopback IPv4 addresses bound to this host.
///
/// Helper for callers constructing an instance descriptor; not part of
/// the registry protocol itself.
pub fn local_ipv4_addresses() -> RegistryResult<Vec<Ipv4Addr>> {
    let mut addresses = Vec::new();
    for interface in get_if_addrs::get_if_addrs()? {
        if interface.is_loopback() {
            continue;
        }
        if let IpAddr::V4(addr) = interface.ip() {
            addresses.push(addr);
        }
    }
    if addresses.is_empty() {
        return Err(RegistryError::NoNetworkInterface);
    }
    Ok(addresses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_never_reported() {
        // Address sets differ per host; either outcome is valid, but a
        // successful result must never contain loopback addresses.
        match local_ipv4_addresses() {
            Ok(addresses) => {
                assert!(!addresses.is_empty());
                assert!(addresses.iter().all(|addr| !addr.is_loopback()));
            }
            Err(err) => assert!(matches!(err, RegistryError::NoNetworkInterface)),
        }
    }
}
