//! Skip-down round robin over cached instance pools
//!
//! Down instances keep their positional slot instead of being removed,
//! so rotation among the UP subset stays fair and an instance that
//! comes back UP rejoins rotation without any list surgery.

use async_trait::async_trait;
use beacon_core::{rotation, Instance, RegistryError, RegistryResult};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Selection seam for callers that want to swap balancing policies
#[async_trait]
pub trait InstanceBalancer: Send + Sync {
    /// Pick one healthy instance for the application
    async fn get_instance(&self, app_name: &str) -> RegistryResult<Instance>;
}

/// Per-application rotation state: the cached list plus its cursor
struct Pool {
    instances: Vec<Instance>,
    cursor: usize,
}

/// Balancer holding one pool per application name.
///
/// All pools share a single lock; each `get_instance` call is one
/// atomic scan-and-advance, so concurrent callers are strictly
/// serialized per application.
#[derive(Default)]
pub struct RoundRobinBalancer {
    pools: Mutex<HashMap<String, Pool>>,
}

impl RoundRobinBalancer {
    /// Create an empty balancer
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached list for an application wholesale.
    ///
    /// The previous list and its cursor are discarded; there is no
    /// diffing or partial update.
    pub async fn update_instance_list(
        &self,
        app_name: impl Into<String>,
        instances: Vec<Instance>,
    ) {
        let app_name = app_name.into();
        debug!(app = %app_name, count = instances.len(), "Replacing instance list");
        self.pools
            .lock()
            .await
            .insert(app_name, Pool { instances, cursor: 0 });
    }
}

#[async_trait]
impl InstanceBalancer for RoundRobinBalancer {
    async fn get_instance(&self, app_name: &str) -> RegistryResult<Instance> {
        let mut pools = self.pools.lock().await;
        let pool = match pools.get_mut(app_name) {
            Some(pool) if !pool.instances.is_empty() => pool,
            _ => {
                warn!(app = %app_name, "No instances cached");
                return Err(RegistryError::NoInstanceAvailable(app_name.to_string()));
            }
        };

        match rotation::next_up(&pool.instances, pool.cursor) {
            Some(index) => {
                pool.cursor = index;
                Ok(pool.instances[index].clone())
            }
            None => {
                warn!(app = %app_name, "No instance is up");
                Err(RegistryError::NoInstanceUp(app_name.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::InstanceStatus;

    fn instance(host: &str, status: InstanceStatus) -> Instance {
        let mut instance = Instance::new("test", host, "10.0.0.1", 8080, 0);
        instance.status = status;
        instance
    }

    async fn hosts(balancer: &RoundRobinBalancer, n: usize) -> Vec<String> {
        let mut out = Vec::new();
        for _ in 0..n {
            out.push(balancer.get_instance("TEST").await.unwrap().host_name);
        }
        out
    }

    #[tokio::test]
    async fn test_unknown_app() {
        let balancer = RoundRobinBalancer::new();
        let err = balancer.get_instance("TEST").await.unwrap_err();
        assert!(matches!(err, RegistryError::NoInstanceAvailable(_)));
    }

    #[tokio::test]
    async fn test_empty_list() {
        let balancer = RoundRobinBalancer::new();
        balancer.update_instance_list("TEST", Vec::new()).await;
        let err = balancer.get_instance("TEST").await.unwrap_err();
        assert!(matches!(err, RegistryError::NoInstanceAvailable(_)));
    }

    #[tokio::test]
    async fn test_rotation_all_up() {
        use InstanceStatus::Up;
        let balancer = RoundRobinBalancer::new();
        balancer
            .update_instance_list(
                "TEST",
                vec![
                    instance("host-a", Up),
                    instance("host-b", Up),
                    instance("host-c", Up),
                ],
            )
            .await;

        assert_eq!(
            hosts(&balancer, 6).await,
            ["host-b", "host-c", "host-a", "host-b", "host-c", "host-a"]
        );
    }

    #[tokio::test]
    async fn test_down_instances_keep_their_slot() {
        use InstanceStatus::{Down, Up};
        let balancer = RoundRobinBalancer::new();
        balancer
            .update_instance_list(
                "TEST",
                vec![
                    instance("host-a", Down),
                    instance("host-b", Up),
                    instance("host-c", Up),
                ],
            )
            .await;

        assert_eq!(
            hosts(&balancer, 6).await,
            ["host-b", "host-c", "host-b", "host-c", "host-b", "host-c"]
        );
    }

    #[tokio::test]
    async fn test_single_up_instance_repeats() {
        use InstanceStatus::{Down, Up};
        let balancer = RoundRobinBalancer::new();
        balancer
            .update_instance_list(
                "TEST",
                vec![
                    instance("host-a", Down),
                    instance("host-b", Down),
                    instance("host-c", Up),
                ],
            )
            .await;

        assert_eq!(
            hosts(&balancer, 4).await,
            ["host-c", "host-c", "host-c", "host-c"]
        );
    }

    #[tokio::test]
    async fn test_all_down() {
        use InstanceStatus::Down;
        let balancer = RoundRobinBalancer::new();
        balancer
            .update_instance_list(
                "TEST",
                vec![instance("host-a", Down), instance("host-b", Down)],
            )
            .await;

        for _ in 0..3 {
            let err = balancer.get_instance("TEST").await.unwrap_err();
            assert!(matches!(err, RegistryError::NoInstanceUp(_)));
        }
    }

    #[tokio::test]
    async fn test_update_replaces_wholesale() {
        use InstanceStatus::Up;
        let balancer = RoundRobinBalancer::new();
        balancer
            .update_instance_list("TEST", vec![instance("old-a", Up), instance("old-b", Up)])
            .await;
        balancer.get_instance("TEST").await.unwrap();

        balancer
            .update_instance_list("TEST", vec![instance("new-a", Up), instance("new-b", Up)])
            .await;
        assert_eq!(hosts(&balancer, 2).await, ["new-b", "new-a"]);
    }

    #[tokio::test]
    async fn test_apps_rotate_independently() {
        use InstanceStatus::Up;
        let balancer = RoundRobinBalancer::new();
        balancer
            .update_instance_list("TEST", vec![instance("a-1", Up), instance("a-2", Up)])
            .await;
        balancer
            .update_instance_list("OTHER", vec![instance("b-1", Up), instance("b-2", Up)])
            .await;

        assert_eq!(
            balancer.get_instance("TEST").await.unwrap().host_name,
            "a-2"
        );
        assert_eq!(
            balancer.get_instance("OTHER").await.unwrap().host_name,
            "b-2"
        );
        assert_eq!(
            balancer.get_instance("TEST").await.unwrap().host_name,
            "a-1"
        );
    }
}
