//! Error types for the metric fan-out system.

use thiserror::Error;

/// Failure reported by a sink while accepting an event.
///
/// Never surfaces to the emitting call site; the registry counts and logs it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("Sink buffer full")]
    Full,

    #[error("Sink closed")]
    Closed,

    #[error("Event rejected: {0}")]
    Rejected(String),
}

/// Sink table errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Sink table full: capacity {capacity}")]
    TableFull { capacity: usize },
}

/// Errors surfaced by configuration, logging, and the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for ApiError {
    fn from(err: toml::ser::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}
