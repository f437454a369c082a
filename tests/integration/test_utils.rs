//! Shared test utilities for integration tests
//!
//! Recording sinks that expose what they received, and a CLI command builder
//! isolated from the user's config directory and environment.

use metric_fanout::error::SinkError;
use metric_fanout::telemetry::{MetricEvent, MetricSink, OwnedMetricEvent};
use parking_lot::Mutex;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

/// Records every event it accepts, tagged with its own label.
pub struct LabelledSink {
    label: &'static str,
    journal: Arc<Mutex<Vec<(&'static str, OwnedMetricEvent)>>>,
}

impl LabelledSink {
    pub fn new(
        label: &'static str,
        journal: &Arc<Mutex<Vec<(&'static str, OwnedMetricEvent)>>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            label,
            journal: Arc::clone(journal),
        })
    }
}

impl MetricSink for LabelledSink {
    fn name(&self) -> &'static str {
        self.label
    }

    fn accept(&self, event: &MetricEvent<'_>) -> Result<(), SinkError> {
        self.journal.lock().push((self.label, event.to_owned_event()));
        Ok(())
    }
}

/// Always rejects.
pub struct RejectingSink;

impl MetricSink for RejectingSink {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    fn accept(&self, _event: &MetricEvent<'_>) -> Result<(), SinkError> {
        Err(SinkError::Rejected("test".to_string()))
    }
}

/// The CLI binary with HOME and XDG_CONFIG_HOME pointed into `root` and any
/// METRIC_FANOUT variables removed.
pub fn cli_command(root: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_metric-fanout"));
    command
        .env("HOME", root.join("home"))
        .env("XDG_CONFIG_HOME", root.join("config"))
        .env_remove("METRIC_FANOUT_LOG")
        .env_remove("METRIC_FANOUT_LOG_FORMAT")
        .env_remove("METRIC_FANOUT_LOG_OUTPUT");
    for (name, _) in std::env::vars() {
        if name.starts_with("METRIC_FANOUT__") {
            command.env_remove(name);
        }
    }
    command
}
