//! Instance lifecycle: registration binding, status transitions, and
//! the lease renewal task
//!
//! Every operation that touches status or issues a registry call holds
//! the instance's state lock across the network call, so no request is
//! ever built from a status another caller is half-way through changing
//! and no two requests for the same instance are in flight at once.

use crate::client::RegistryClient;
use beacon_core::{Instance, InstanceStatus, RegistryError, RegistryResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

/// Default period between lease renewals
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(3);

/// Registration binding: present exactly while the instance is
/// registered. Dropping it (or sending on `stop`) ends the renewal task.
struct Binding {
    client: RegistryClient,
    stop: watch::Sender<bool>,
}

struct State {
    instance: Instance,
    binding: Option<Binding>,
}

struct Inner {
    instance_id: String,
    app: String,
    heartbeat_interval: Duration,
    state: Mutex<State>,
}

/// Handle to one registrable instance.
///
/// Created unbound in status STARTING. [`InstanceHandle::register`]
/// binds it to a registry and starts the renewal task;
/// [`InstanceHandle::deregister`] unbinds it and stops the task. The
/// handle is cheap to clone and all clones share the same instance.
#[derive(Clone)]
pub struct InstanceHandle {
    inner: Arc<Inner>,
}

impl InstanceHandle {
    /// Create a handle with the default renewal period
    pub fn new(instance: Instance) -> Self {
        Self::with_heartbeat_interval(instance, DEFAULT_HEARTBEAT_INTERVAL)
    }

    /// Create a handle with a custom renewal period
    pub fn with_heartbeat_interval(instance: Instance, period: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                instance_id: instance.instance_id.clone(),
                app: instance.app.clone(),
                heartbeat_interval: period,
                state: Mutex::new(State {
                    instance,
                    binding: None,
                }),
            }),
        }
    }

    /// Composite instance identity, stable for the life of the handle
    pub fn instance_id(&self) -> &str {
        &self.inner.instance_id
    }

    /// Canonical application name
    pub fn app(&self) -> &str {
        &self.inner.app
    }

    /// Currently asserted status
    pub async fn status(&self) -> InstanceStatus {
        self.inner.state.lock().await.instance.status
    }

    /// Whether the instance is currently bound to a registry
    pub async fn is_registered(&self) -> bool {
        self.inner.state.lock().await.binding.is_some()
    }

    /// Copy of the current wire descriptor
    pub async fn descriptor(&self) -> Instance {
        self.inner.state.lock().await.instance.clone()
    }

    /// Bind to a registry: push the descriptor in status STARTING and,
    /// on success, start the renewal task.
    ///
    /// Fails with `AlreadyRegistered` while bound. A failed push leaves
    /// the instance unbound and starts no task. A deregistered handle
    /// may be registered again.
    pub async fn register(&self, client: RegistryClient) -> RegistryResult<()> {
        let mut state = self.inner.state.lock().await;
        if state.binding.is_some() {
            return Err(RegistryError::AlreadyRegistered(
                self.inner.instance_id.clone(),
            ));
        }

        state.instance.status = InstanceStatus::Starting;
        client.register_instance(&state.instance).await?;

        let (stop, stop_rx) = watch::channel(false);
        state.binding = Some(Binding { client, stop });
        drop(state);

        info!(instance_id = %self.inner.instance_id, "Instance registered");
        self.spawn_renewal_task(stop_rx);
        Ok(())
    }

    /// Assert a new status and push the updated descriptor.
    ///
    /// On a push failure the new status is kept locally and the binding
    /// stays intact; the caller may retry.
    pub async fn set_status(&self, status: InstanceStatus) -> RegistryResult<()> {
        let mut state = self.inner.state.lock().await;
        let State { instance, binding } = &mut *state;
        let binding = binding.as_ref().ok_or(RegistryError::NotRegistered)?;

        instance.status = status;
        info!(instance_id = %self.inner.instance_id, status = %status, "Pushing status update");
        binding.client.register_instance(instance).await
    }

    /// Renew the lease once. Errors change neither status nor binding.
    pub async fn renew(&self) -> RegistryResult<()> {
        renew_bound(&self.inner).await
    }

    /// Delete the registration and unbind.
    ///
    /// The unbind happens even when the deletion call fails, so the
    /// renewal task always stops; the deletion outcome is returned to
    /// the caller either way.
    pub async fn deregister(&self) -> RegistryResult<()> {
        let mut state = self.inner.state.lock().await;
        let binding = state.binding.take().ok_or(RegistryError::NotRegistered)?;
        info!(instance_id = %self.inner.instance_id, "Deregistering instance");

        let result = binding
            .client
            .deregister_instance(&self.inner.app, &self.inner.instance_id)
            .await;

        let _ = binding.stop.send(true);
        result
    }

    fn spawn_renewal_task(&self, mut stop: watch::Receiver<bool>) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let period = inner.heartbeat_interval;
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => match renew_bound(&inner).await {
                        Ok(()) => {}
                        Err(RegistryError::NotRegistered) => break,
                        Err(e) => {
                            // The next tick is the retry.
                            warn!(instance_id = %inner.instance_id, error = %e, "Lease renewal failed");
                        }
                    },
                    _ = stop.changed() => break,
                }
            }
            debug!(instance_id = %inner.instance_id, "Renewal task stopped");
        });
    }
}

async fn renew_bound(inner: &Inner) -> RegistryResult<()> {
    let state = inner.state.lock().await;
    let binding = state.binding.as_ref().ok_or(RegistryError::NotRegistered)?;
    debug!(instance_id = %inner.instance_id, status = %state.instance.status, "Renewing lease");
    binding
        .client
        .renew_lease(&inner.app, &inner.instance_id)
        .await
}
