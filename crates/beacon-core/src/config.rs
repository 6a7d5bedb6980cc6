//! Configuration types for beacon

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Registry connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL of the registry, including any path prefix
    /// (e.g. `http://127.0.0.1:8761/eureka`)
    pub base_url: String,
    /// Basic auth user name, sent as an Authorization header when set
    pub username: Option<String>,
    /// Basic auth password
    pub password: Option<String>,
    /// Seconds between lease renewals
    pub heartbeat_interval_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8761/eureka".to_string(),
            username: None,
            password: None,
            heartbeat_interval_secs: 3,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::RegistryError::Config(format!("Failed to read config file: {}", e))
        })?;
        toml::from_str(&content)
            .map_err(|e| crate::RegistryError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Renewal period as a [`Duration`]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }
}
