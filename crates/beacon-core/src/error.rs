//! Error types for beacon

use thiserror::Error;

/// Main error type for beacon operations
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Register called on an instance that is already bound
    #[error("Instance {0} is already registered")]
    AlreadyRegistered(String),

    /// Status change, renewal, or deregistration attempted while unbound
    #[error("Instance has not been registered")]
    NotRegistered,

    /// The request could not be sent or the response could not be read
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The registry answered outside the 200-299 range
    #[error("Unexpected response code {code}: {body}")]
    UnexpectedStatus { code: u16, body: String },

    /// The balancer has no cached list for the application
    #[error("Application {0} has no instances")]
    NoInstanceAvailable(String),

    /// A full rotation found no instance in status UP
    #[error("Application {0} has no instance up")]
    NoInstanceUp(String),

    /// Address discovery found no usable non-loopback interface
    #[error("Host has no non-loopback network interface")]
    NoNetworkInterface,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for beacon operations
pub type RegistryResult<T> = Result<T, RegistryError>;

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for RegistryError {
    fn from(err: toml::de::Error) -> Self {
        RegistryError::Config(err.to_string())
    }
}
