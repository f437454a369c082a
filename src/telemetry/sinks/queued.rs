//! Bounded, non-blocking hand-off to a slow sink.
//!
//! [`QueuedSink`] owns a worker thread that drains a fixed-size channel into
//! the wrapped sink. `accept` only ever calls `try_send`: when the queue is full
//! the event is dropped for this sink and counted, so a stalled backend cannot
//! hold up the emitting thread.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, warn};

use crate::error::SinkError;
use crate::telemetry::events::{MetricEvent, OwnedMetricEvent};
use crate::telemetry::sinks::MetricSink;

#[derive(Debug, Default)]
struct QueueCounters {
    forwarded: AtomicU64,
    failed: AtomicU64,
}

pub struct QueuedSink {
    name: &'static str,
    sender: Mutex<Option<SyncSender<OwnedMetricEvent>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    dropped: AtomicU64,
    counters: Arc<QueueCounters>,
}

impl QueuedSink {
    /// Start a worker draining a queue of `capacity` events into `inner`.
    pub fn spawn(inner: Arc<dyn MetricSink>, capacity: usize) -> std::io::Result<Self> {
        let name = inner.name();
        let (sender, receiver) = sync_channel(capacity.max(1));
        let counters = Arc::new(QueueCounters::default());
        let worker_counters = Arc::clone(&counters);
        let worker = std::thread::Builder::new()
            .name(format!("metric-queue-{}", name))
            .spawn(move || drain(inner, receiver, worker_counters))?;
        Ok(Self {
            name,
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            dropped: AtomicU64::new(0),
            counters,
        })
    }

    /// Events refused because the queue was full or closed.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Events the worker delivered to the wrapped sink.
    pub fn forwarded(&self) -> u64 {
        self.counters.forwarded.load(Ordering::Relaxed)
    }

    /// Events the wrapped sink reported as failed.
    pub fn failed(&self) -> u64 {
        self.counters.failed.load(Ordering::Relaxed)
    }

    /// Close the queue and wait for the worker to drain what is already queued.
    ///
    /// Later `accept` calls return [`SinkError::Closed`]. Idempotent.
    pub fn shutdown(&self) {
        self.sender.lock().take();
        if let Some(worker) = self.worker.lock().take() {
            if worker.join().is_err() {
                warn!(sink = self.name, "metric queue worker panicked");
            }
        }
    }
}

fn drain(
    inner: Arc<dyn MetricSink>,
    receiver: Receiver<OwnedMetricEvent>,
    counters: Arc<QueueCounters>,
) {
    for event in receiver {
        match inner.accept(&event.as_event()) {
            Ok(()) => {
                counters.forwarded.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                debug!(sink = inner.name(), key = %event.key, error = %err, "queued sink rejected event");
            }
        }
    }
}

impl MetricSink for QueuedSink {
    fn name(&self) -> &'static str {
        self.name
    }

    fn accept(&self, event: &MetricEvent<'_>) -> Result<(), SinkError> {
        let sender = self.sender.lock();
        let result = match sender.as_ref() {
            Some(sender) => match sender.try_send(event.to_owned_event()) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => Err(SinkError::Full),
                Err(TrySendError::Disconnected(_)) => Err(SinkError::Closed),
            },
            None => Err(SinkError::Closed),
        };
        if result.is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        result
    }
}

impl Drop for QueuedSink {
    /// Closes the queue without waiting. The last owner may be an emitting
    /// thread, so the worker finishes draining on its own; call
    /// [`shutdown`](QueuedSink::shutdown) to wait for it.
    fn drop(&mut self) {
        self.sender.get_mut().take();
        self.worker.get_mut().take();
    }
}

impl std::fmt::Debug for QueuedSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedSink")
            .field("name", &self.name)
            .field("dropped", &self.dropped())
            .field("forwarded", &self.forwarded())
            .finish()
    }
}
