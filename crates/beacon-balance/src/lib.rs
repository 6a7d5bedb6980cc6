//! beacon-balance: Client-side instance balancing
//!
//! This crate provides the consumer-side instance pool: cached
//! per-application instance lists with skip-down round-robin selection.

pub mod balancer;

pub use balancer::{InstanceBalancer, RoundRobinBalancer};
