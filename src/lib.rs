//! metric-fanout: fixed-capacity metric event fan-out
//!
//! A registry of up to N sinks receives every metric event emitted through it.
//! Emitting never fails and never blocks on a lock held by registration; with
//! the `enabled` feature off the call-site macros compile to nothing.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod telemetry;

pub use error::{ApiError, RegistryError, SinkError};
pub use telemetry::keys;
pub use telemetry::sinks;
pub use telemetry::{
    EmitStats, EventTag, InstalledSinks, MetricEvent, MetricKey, MetricRegistry, MetricSink,
    MetricValue, ScopedMetric, SinkHandle, DEFAULT_SINK_CAPACITY,
};
