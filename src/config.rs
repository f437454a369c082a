//! Configuration System
//!
//! Layered configuration for the sinks a host installs and for logging.
//! Sources, lowest precedence first: built-in defaults, the global config
//! file, an explicit config file, then `METRIC_FANOUT__*` environment variables.

use crate::logging::LoggingConfig;
use crate::telemetry::registry::DEFAULT_SINK_CAPACITY;
use crate::telemetry::sinks::OverflowPolicy;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FanoutConfig {
    /// Sinks installed on the registry
    #[serde(default)]
    pub sinks: SinksConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which sinks to install and how
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SinksConfig {
    #[serde(default)]
    pub log: LogSinkConfig,

    #[serde(default)]
    pub counter: CounterSinkConfig,

    #[serde(default)]
    pub memory: MemorySinkConfig,

    /// Bounded queue in front of the log sink
    #[serde(default)]
    pub queue: QueueConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSinkConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Level metric records are written at: trace, debug, info, warn, error
    #[serde(default = "default_log_sink_level")]
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSinkConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySinkConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_memory_capacity")]
    pub capacity: usize,

    #[serde(default)]
    pub overflow: OverflowPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_queue_capacity")]
    pub capacity: usize,
}

fn default_true() -> bool {
    true
}

fn default_log_sink_level() -> String {
    "info".to_string()
}

fn default_memory_capacity() -> usize {
    256
}

fn default_queue_capacity() -> usize {
    1024
}

impl Default for LogSinkConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_sink_level(),
        }
    }
}

impl Default for CounterSinkConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

impl Default for MemorySinkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            capacity: default_memory_capacity(),
            overflow: OverflowPolicy::default(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            capacity: default_queue_capacity(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Sink(String, String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Sink(name, msg) => write!(f, "Sink '{}': {}", name, msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl SinksConfig {
    /// Number of registry slots the enabled sinks occupy.
    pub fn enabled_count(&self) -> usize {
        [self.log.enabled, self.counter.enabled, self.memory.enabled]
            .iter()
            .filter(|enabled| **enabled)
            .count()
    }

    /// Validate against a registry of the default capacity.
    pub fn validate(&self) -> Vec<ValidationError> {
        self.validate_for_capacity(DEFAULT_SINK_CAPACITY)
    }

    /// Validate against a registry holding at most `capacity` sinks.
    pub fn validate_for_capacity(&self, capacity: usize) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.log.level.parse::<tracing::Level>().is_err() {
            errors.push(ValidationError::Sink(
                "log".to_string(),
                format!("Invalid level: {}", self.log.level),
            ));
        }
        if self.memory.enabled && self.memory.capacity == 0 {
            errors.push(ValidationError::Sink(
                "memory".to_string(),
                "Capacity must be greater than zero".to_string(),
            ));
        }
        if self.queue.enabled {
            if self.queue.capacity == 0 {
                errors.push(ValidationError::Sink(
                    "queue".to_string(),
                    "Capacity must be greater than zero".to_string(),
                ));
            }
            if !self.log.enabled {
                errors.push(ValidationError::Sink(
                    "queue".to_string(),
                    "Queue wraps the log sink, which is disabled".to_string(),
                ));
            }
        }
        if self.enabled_count() > capacity {
            errors.push(ValidationError::Sink(
                "*".to_string(),
                format!(
                    "{} sinks enabled but the registry holds {}",
                    self.enabled_count(),
                    capacity
                ),
            ));
        }

        errors
    }
}

impl FanoutConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = self.sinks.validate();
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
