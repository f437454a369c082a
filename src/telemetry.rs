//! Telemetry domain: keys, events, the sink registry, sinks, and installation.

mod types;

pub mod events;
pub mod facade;
pub mod keys;
pub mod macros;
pub mod registry;
pub mod scoped;
pub mod sinks;

pub use events::{EventTag, MetricEvent, MetricValue, OwnedMetricEvent, OwnedMetricValue};
pub use facade::InstalledSinks;
pub use keys::MetricKey;
pub use registry::{EmitStats, MetricRegistry, SinkHandle, DEFAULT_SINK_CAPACITY};
pub use scoped::ScopedMetric;
pub use sinks::MetricSink;
pub use types::{format_millis, now_millis};
