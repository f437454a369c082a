//! Per-key event counters.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::SinkError;
use crate::telemetry::events::{EventTag, MetricEvent, OwnedMetricValue};
use crate::telemetry::keys::MetricKey;
use crate::telemetry::sinks::MetricSink;

/// Counts for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCount {
    pub key: MetricKey,
    pub instants: u64,
    pub begins: u64,
    pub ends: u64,
    /// Value carried by the most recent event for this key
    pub last_value: OwnedMetricValue,
    pub last_timestamp_ms: u64,
}

impl KeyCount {
    fn new(key: MetricKey) -> Self {
        Self {
            key,
            instants: 0,
            begins: 0,
            ends: 0,
            last_value: OwnedMetricValue::None,
            last_timestamp_ms: 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.instants + self.begins + self.ends
    }

    /// Spans opened but not yet closed.
    pub fn open_spans(&self) -> u64 {
        self.begins.saturating_sub(self.ends)
    }
}

/// Aggregates event counts per key.
///
/// The only allocation happens the first time a key is seen.
#[derive(Debug, Default)]
pub struct CounterSink {
    counts: Mutex<HashMap<MetricKey, KeyCount>>,
}

impl CounterSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts for one key, if it has been seen.
    pub fn get(&self, key: MetricKey) -> Option<KeyCount> {
        self.counts.lock().get(&key).cloned()
    }

    /// All counts sorted by key.
    pub fn snapshot(&self) -> Vec<KeyCount> {
        let mut rows: Vec<KeyCount> = self.counts.lock().values().cloned().collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        rows
    }

    /// Total events across all keys.
    pub fn total(&self) -> u64 {
        self.counts.lock().values().map(KeyCount::total).sum()
    }

    pub fn reset(&self) {
        self.counts.lock().clear();
    }
}

impl MetricSink for CounterSink {
    fn name(&self) -> &'static str {
        "counter"
    }

    fn accept(&self, event: &MetricEvent<'_>) -> Result<(), SinkError> {
        let mut counts = self.counts.lock();
        let entry = counts
            .entry(event.key)
            .or_insert_with(|| KeyCount::new(event.key));
        match event.tag {
            EventTag::Instant => entry.instants += 1,
            EventTag::Begin => entry.begins += 1,
            EventTag::End => entry.ends += 1,
        }
        entry.last_value = event.value.to_owned_value();
        entry.last_timestamp_ms = event.timestamp_ms;
        Ok(())
    }
}
