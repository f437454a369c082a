//! Sink capability and the shipped sink implementations.
//!
//! A sink is anything that can accept a [`MetricEvent`]. The registry calls
//! [`MetricSink::accept`] synchronously on the emitting thread, so
//! implementations must return quickly and must not block. Backends that can
//! stall belong behind a [`QueuedSink`].

pub mod counter;
pub mod log;
pub mod memory;
pub mod null;
pub mod queued;

use crate::error::SinkError;
use crate::telemetry::events::MetricEvent;

pub use counter::{CounterSink, KeyCount};
pub use log::LogSink;
pub use memory::{MemorySink, OverflowPolicy};
pub use null::NullSink;
pub use queued::QueuedSink;

/// Consumer of emitted metric events.
pub trait MetricSink: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Accept one event. Errors are counted by the registry and never reach
    /// the emitting call site.
    fn accept(&self, event: &MetricEvent<'_>) -> Result<(), SinkError>;
}
