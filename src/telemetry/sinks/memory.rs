//! Bounded in-memory recorder.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::SinkError;
use crate::telemetry::events::{MetricEvent, OwnedMetricEvent};
use crate::telemetry::sinks::MetricSink;

/// What a full [`MemorySink`] does with the next event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Refuse the new event with [`SinkError::Full`]
    #[default]
    Reject,
    /// Evict the oldest event to make room
    DropOldest,
}

/// Keeps up to `capacity` owned copies of the events it receives.
#[derive(Debug)]
pub struct MemorySink {
    events: Mutex<VecDeque<OwnedMetricEvent>>,
    capacity: usize,
    policy: OverflowPolicy,
}

impl MemorySink {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            policy,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Recorded events, oldest first.
    pub fn events(&self) -> Vec<OwnedMetricEvent> {
        self.events.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl MetricSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn accept(&self, event: &MetricEvent<'_>) -> Result<(), SinkError> {
        let mut events = self.events.lock();
        if events.len() >= self.capacity {
            match self.policy {
                OverflowPolicy::Reject => return Err(SinkError::Full),
                OverflowPolicy::DropOldest => {
                    events.pop_front();
                }
            }
        }
        events.push_back(event.to_owned_event());
        Ok(())
    }
}
