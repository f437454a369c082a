//! Sink that forwards events to `tracing` as structured records.

use tracing::Level;

use crate::error::SinkError;
use crate::telemetry::events::MetricEvent;
use crate::telemetry::sinks::MetricSink;
use crate::telemetry::types::format_millis;

/// Target used for every record this sink writes.
pub const METRIC_LOG_TARGET: &str = "metric_fanout::metric";

macro_rules! metric_record {
    ($level:expr, $event:ident) => {
        tracing::event!(
            target: METRIC_LOG_TARGET,
            $level,
            key = %$event.key,
            tag = $event.tag.as_str(),
            value = %$event.value,
            ts = %format_millis($event.timestamp_ms),
            "metric"
        )
    };
}

/// Writes each event through the active `tracing` subscriber.
///
/// With no subscriber installed this is effectively free.
#[derive(Debug, Clone, Copy)]
pub struct LogSink {
    level: Level,
}

impl LogSink {
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Parse a level name (trace, debug, info, warn, error).
    pub fn from_level_name(name: &str) -> Option<Self> {
        name.parse::<Level>().ok().map(Self::new)
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(Level::INFO)
    }
}

impl MetricSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    fn accept(&self, event: &MetricEvent<'_>) -> Result<(), SinkError> {
        match self.level {
            Level::TRACE => metric_record!(Level::TRACE, event),
            Level::DEBUG => metric_record!(Level::DEBUG, event),
            Level::INFO => metric_record!(Level::INFO, event),
            Level::WARN => metric_record!(Level::WARN, event),
            _ => metric_record!(Level::ERROR, event),
        }
        Ok(())
    }
}
