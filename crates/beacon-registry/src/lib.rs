//! beacon-registry: Registry client and instance lifecycle
//!
//! This crate provides the producing and consuming side of registry
//! interaction:
//! - REST client for the registry's register/renew/deregister/fetch surface
//! - Instance lifecycle handle with the concurrent lease renewal task
//! - Local network address discovery

pub mod client;
pub mod lifecycle;
pub mod net;

#[cfg(test)]
mod testutil;

pub use client::RegistryClient;
pub use lifecycle::{InstanceHandle, DEFAULT_HEARTBEAT_INTERVAL};
pub use net::local_ipv4_addresses;
