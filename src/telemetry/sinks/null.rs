//! Sink that discards every event.

use crate::error::SinkError;
use crate::telemetry::events::MetricEvent;
use crate::telemetry::sinks::MetricSink;

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MetricSink for NullSink {
    fn name(&self) -> &'static str {
        "null"
    }

    fn accept(&self, _event: &MetricEvent<'_>) -> Result<(), SinkError> {
        Ok(())
    }
}
