//! Eureka wire data model: instance descriptors, application snapshots,
//! and the fetch response envelope

use crate::rotation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Data center name for self-hosted deployments
pub const DATA_CENTER_MY_OWN: &str = "MyOwn";

/// Data center name for AWS deployments
pub const DATA_CENTER_AMAZON: &str = "Amazon";

/// Java class marker the registry expects alongside the data center name
pub const DATA_CENTER_CLASS: &str = "com.netflix.appinfo.InstanceInfo$DefaultDataCenterInfo";

/// Lifecycle status of an instance, asserted by the owning process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    /// Instance is starting up and not yet serving traffic
    Starting,
    /// Instance is healthy and serving traffic
    Up,
    /// Instance is down
    Down,
    /// Instance is administratively removed from rotation
    OutOfService,
    /// Status has not been asserted
    #[default]
    Unknown,
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceStatus::Starting => write!(f, "STARTING"),
            InstanceStatus::Up => write!(f, "UP"),
            InstanceStatus::Down => write!(f, "DOWN"),
            InstanceStatus::OutOfService => write!(f, "OUT_OF_SERVICE"),
            InstanceStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Port number plus its enabled flag, in the registry's `$`/`@enabled` encoding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortInfo {
    /// Port number
    #[serde(rename = "$")]
    pub port: u16,
    /// Whether the port is enabled ("true"/"false" on the wire)
    #[serde(rename = "@enabled")]
    pub enabled: String,
}

impl PortInfo {
    /// Create port info; port 0 means disabled
    pub fn new(port: u16) -> Self {
        Self {
            port,
            enabled: (port != 0).to_string(),
        }
    }
}

impl Default for PortInfo {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Data center descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataCenterInfo {
    /// Java class marker expected by the registry
    #[serde(rename = "@class")]
    pub class: String,
    /// Data center name
    pub name: String,
}

impl Default for DataCenterInfo {
    fn default() -> Self {
        Self {
            class: DATA_CENTER_CLASS.to_string(),
            name: DATA_CENTER_MY_OWN.to_string(),
        }
    }
}

/// Lease parameters and timestamps, owned by the registry and
/// round-tripped by the client without interpretation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaseInfo {
    pub renewal_interval_in_secs: u32,
    pub duration_in_secs: u32,
    pub registration_timestamp: i64,
    pub last_renewal_timestamp: i64,
    #[serde(rename = "evictionTimeStamp")]
    pub eviction_timestamp: i64,
    pub service_up_timestamp: i64,
}

/// One registrable network endpoint as known to the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instance {
    /// Composite identity: `{ip}:{app}:{port}`, stable once constructed
    pub instance_id: String,
    /// Host name
    pub host_name: String,
    /// Application name, canonicalized to upper case
    pub app: String,
    /// IP address
    pub ip_addr: String,
    /// Current lifecycle status
    pub status: InstanceStatus,
    /// Status override asserted by the registry, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overridden_status: Option<InstanceStatus>,
    /// Primary port
    pub port: PortInfo,
    /// Secure (TLS) port
    pub secure_port: PortInfo,
    /// Country identifier
    pub country_id: i32,
    /// Data center descriptor
    pub data_center_info: DataCenterInfo,
    /// Lease parameters, round-tripped only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_info: Option<LeaseInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_url: Option<String>,
    /// Virtual host name consumers resolve
    pub vip_address: String,
    /// Virtual host name for the secure port
    pub secure_vip_address: String,
    /// Registry-side flag, carried as a string on the wire
    pub is_coordinating_discovery_server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_dirty_timestamp: Option<String>,
    /// Free-form key/value metadata
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
}

impl Default for Instance {
    fn default() -> Self {
        Self {
            instance_id: String::new(),
            host_name: String::new(),
            app: String::new(),
            ip_addr: String::new(),
            status: InstanceStatus::Unknown,
            overridden_status: None,
            port: PortInfo::default(),
            secure_port: PortInfo::default(),
            country_id: 1,
            data_center_info: DataCenterInfo::default(),
            lease_info: None,
            home_page_url: None,
            status_page_url: None,
            health_check_url: None,
            vip_address: String::new(),
            secure_vip_address: String::new(),
            is_coordinating_discovery_server: "false".to_string(),
            last_updated_timestamp: None,
            last_dirty_timestamp: None,
            metadata: HashMap::new(),
            action_type: None,
        }
    }
}

impl Instance {
    /// Create a new instance descriptor in status STARTING
    pub fn new(
        app: impl Into<String>,
        host_name: impl Into<String>,
        ip_addr: impl Into<String>,
        port: u16,
        secure_port: u16,
    ) -> Self {
        let app = app.into();
        let ip_addr = ip_addr.into();
        Self {
            instance_id: format!("{}:{}:{}", ip_addr, app, port),
            host_name: host_name.into(),
            app: app.to_uppercase(),
            ip_addr,
            status: InstanceStatus::Starting,
            port: PortInfo::new(port),
            secure_port: PortInfo::new(secure_port),
            vip_address: app.clone(),
            secure_vip_address: app,
            ..Default::default()
        }
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether the instance asserts status UP
    pub fn is_up(&self) -> bool {
        self.status == InstanceStatus::Up
    }
}

impl std::fmt::Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}:{}) {}",
            self.app, self.ip_addr, self.port.port, self.status
        )
    }
}

/// One fetched application: a named, ordered instance list plus the
/// rotation cursor used by [`Application::next_instance`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    pub name: String,
    #[serde(rename = "instance")]
    pub instances: Vec<Instance>,
    #[serde(skip)]
    cursor: usize,
}

impl Application {
    /// Create an application snapshot from a list of instances
    pub fn new(name: impl Into<String>, instances: Vec<Instance>) -> Self {
        Self {
            name: name.into(),
            instances,
            cursor: 0,
        }
    }

    /// Advance the cursor to the next instance in status UP.
    ///
    /// Returns `None` once a full revolution finds nothing up. The
    /// snapshot is single-owner: `&mut self` is the whole concurrency
    /// story, there is no internal locking.
    pub fn next_instance(&mut self) -> Option<&Instance> {
        let next = rotation::next_up(&self.instances, self.cursor)?;
        self.cursor = next;
        Some(&self.instances[next])
    }
}

/// Multi-application fetch result with its version/hash markers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Applications {
    #[serde(rename = "versions__delta")]
    pub versions_delta: String,
    #[serde(rename = "apps__hashcode")]
    pub apps_hashcode: String,
    #[serde(rename = "application")]
    pub applications: Vec<Application>,
}

/// Fetch response envelope. Exactly one field is populated depending on
/// which fetch was issued; callers must tolerate the others being empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistryResponse {
    pub application: Option<Application>,
    pub applications: Option<Applications>,
    pub instance: Option<Instance>,
}

/// Envelope for register/update requests: `{"instance": {...}}`
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub instance: &'a Instance,
}
