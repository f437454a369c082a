//! Sink registry and emitter.
//!
//! [`MetricRegistry`] holds a fixed-size table of non-owning sink references
//! and fans every emitted event out to them in registration order.
//!
//! The table is an immutable snapshot behind a pointer. `emit` holds the read
//! lock only long enough to clone that pointer and dispatches with no lock
//! held; register and unregister build a new snapshot and swap it in. Readers
//! therefore never observe a partially written entry, and a slow sink cannot
//! hold up registration. Steady-state emission does not allocate.

use parking_lot::RwLock;
use serde::Serialize;
use std::num::NonZeroU64;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

use crate::error::RegistryError;
use crate::telemetry::events::{EventTag, MetricEvent, MetricValue};
use crate::telemetry::keys::MetricKey;
use crate::telemetry::scoped::ScopedMetric;
use crate::telemetry::sinks::MetricSink;

/// Sink table size used by [`MetricRegistry::new`].
pub const DEFAULT_SINK_CAPACITY: usize = 4;

/// Identifies one registration. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkHandle(NonZeroU64);

impl SinkHandle {
    pub fn id(&self) -> u64 {
        self.0.get()
    }
}

#[derive(Clone)]
struct SinkSlot {
    id: NonZeroU64,
    name: &'static str,
    sink: Weak<dyn MetricSink>,
}

#[derive(Clone)]
struct SinkTable<const N: usize> {
    slots: [Option<SinkSlot>; N],
    len: usize,
}

impl<const N: usize> SinkTable<N> {
    fn empty() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            len: 0,
        }
    }

    fn iter(&self) -> impl Iterator<Item = &SinkSlot> {
        self.slots[..self.len].iter().flatten()
    }

    fn position(&self, id: NonZeroU64) -> Option<usize> {
        self.slots[..self.len]
            .iter()
            .position(|slot| slot.as_ref().map(|s| s.id) == Some(id))
    }

    /// Remove the entry at `index`, shifting later entries down so
    /// registration order is preserved.
    fn remove(&mut self, index: usize) {
        self.slots[index..self.len].rotate_left(1);
        self.len -= 1;
        self.slots[self.len] = None;
    }
}

/// Emission counters. Sink failures are reported here instead of to callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmitStats {
    /// Events fanned out to a non-empty table
    pub emitted: u64,
    /// Successful `accept` calls
    pub delivered: u64,
    /// `accept` calls that returned an error
    pub failed: u64,
    /// `accept` calls that panicked
    pub panicked: u64,
    /// Deliveries skipped because the sink's owner dropped it
    pub orphaned: u64,
}

#[derive(Debug, Default)]
struct StatCounters {
    emitted: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    panicked: AtomicU64,
    orphaned: AtomicU64,
}

impl StatCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> EmitStats {
        EmitStats {
            emitted: self.emitted.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            orphaned: self.orphaned.load(Ordering::Relaxed),
        }
    }
}

/// Fan-out point for metric events.
///
/// Construct one per process (or per test) and pass it by reference to the
/// code that emits. The registry does not keep sinks alive: it stores weak
/// references and skips sinks whose owners have dropped them.
pub struct MetricRegistry<const N: usize = DEFAULT_SINK_CAPACITY> {
    table: RwLock<Arc<SinkTable<N>>>,
    next_id: AtomicU64,
    stats: StatCounters,
}

impl MetricRegistry {
    /// Registry with room for [`DEFAULT_SINK_CAPACITY`] sinks.
    pub fn new() -> Self {
        Self::bounded()
    }
}

impl<const N: usize> Default for MetricRegistry<N> {
    fn default() -> Self {
        Self::bounded()
    }
}

impl<const N: usize> MetricRegistry<N> {
    /// Registry with room for `N` sinks.
    pub fn bounded() -> Self {
        Self {
            table: RwLock::new(Arc::new(SinkTable::empty())),
            next_id: AtomicU64::new(1),
            stats: StatCounters::default(),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of registered sinks, including any whose owner has dropped them.
    pub fn sink_count(&self) -> usize {
        self.snapshot().len
    }

    /// Names of registered sinks in registration order.
    pub fn sink_names(&self) -> Vec<&'static str> {
        self.snapshot().iter().map(|slot| slot.name).collect()
    }

    /// Add a sink to the active set.
    ///
    /// The caller keeps ownership; once its last `Arc` is dropped the sink
    /// stops receiving events even if it was never unregistered.
    pub fn register_sink<S: MetricSink + 'static>(
        &self,
        sink: &Arc<S>,
    ) -> Result<SinkHandle, RegistryError> {
        let weak: Weak<S> = Arc::downgrade(sink);
        self.insert(sink.name(), weak)
    }

    /// [`register_sink`](Self::register_sink) for an already type-erased sink.
    pub fn register_shared(&self, sink: &Arc<dyn MetricSink>) -> Result<SinkHandle, RegistryError> {
        self.insert(sink.name(), Arc::downgrade(sink))
    }

    fn insert(
        &self,
        name: &'static str,
        sink: Weak<dyn MetricSink>,
    ) -> Result<SinkHandle, RegistryError> {
        let mut table = self.table.write();
        if table.len >= N {
            warn!(sink = name, capacity = N, "metric sink table full");
            return Err(RegistryError::TableFull { capacity: N });
        }
        let raw = self.next_id.fetch_add(1, Ordering::Relaxed);
        let id = NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN);
        let mut next = (**table).clone();
        let index = next.len;
        next.slots[index] = Some(SinkSlot { id, name, sink });
        next.len += 1;
        *table = Arc::new(next);
        debug!(sink = name, handle = raw, "metric sink registered");
        Ok(SinkHandle(id))
    }

    /// Remove a sink. Unknown or already removed handles are ignored.
    ///
    /// Returns whether a sink was removed.
    pub fn unregister_sink(&self, handle: SinkHandle) -> bool {
        let mut table = self.table.write();
        let Some(index) = table.position(handle.0) else {
            return false;
        };
        let mut next = (**table).clone();
        next.remove(index);
        *table = Arc::new(next);
        debug!(handle = handle.id(), "metric sink unregistered");
        true
    }

    /// Record an instant event and forward it to every active sink.
    ///
    /// Never fails. With no sinks registered this returns before reading
    /// the clock.
    #[inline]
    pub fn emit<'a>(&self, key: impl Into<MetricKey>, value: impl Into<MetricValue<'a>>) {
        self.emit_tagged(key.into(), EventTag::Instant, value.into());
    }

    /// Mark the start of a measured span.
    pub fn begin(&self, key: impl Into<MetricKey>) {
        self.emit_tagged(key.into(), EventTag::Begin, MetricValue::None);
    }

    /// Mark the end of a measured span.
    pub fn end<'a>(&self, key: impl Into<MetricKey>, value: impl Into<MetricValue<'a>>) {
        self.emit_tagged(key.into(), EventTag::End, value.into());
    }

    /// Start a span that ends when the returned guard drops.
    pub fn scoped(&self, key: impl Into<MetricKey>) -> ScopedMetric<'_, N> {
        ScopedMetric::start(self, key.into())
    }

    fn emit_tagged(&self, key: MetricKey, tag: EventTag, value: MetricValue<'_>) {
        let table = self.snapshot();
        if table.len == 0 {
            return;
        }
        let event = MetricEvent::with_now(key, tag, value);
        self.dispatch(&table, &event);
    }

    /// Forward a prepared event. Its timestamp is left as is.
    pub fn emit_event(&self, event: &MetricEvent<'_>) {
        let table = self.snapshot();
        if table.len == 0 {
            return;
        }
        self.dispatch(&table, event);
    }

    pub fn stats(&self) -> EmitStats {
        self.stats.snapshot()
    }

    fn snapshot(&self) -> Arc<SinkTable<N>> {
        Arc::clone(&self.table.read())
    }

    fn dispatch(&self, table: &SinkTable<N>, event: &MetricEvent<'_>) {
        StatCounters::bump(&self.stats.emitted);
        for slot in table.iter() {
            let Some(sink) = slot.sink.upgrade() else {
                StatCounters::bump(&self.stats.orphaned);
                continue;
            };
            match catch_unwind(AssertUnwindSafe(|| sink.accept(event))) {
                Ok(Ok(())) => StatCounters::bump(&self.stats.delivered),
                Ok(Err(err)) => {
                    StatCounters::bump(&self.stats.failed);
                    debug!(sink = slot.name, key = %event.key, error = %err, "metric sink rejected event");
                }
                Err(_) => {
                    StatCounters::bump(&self.stats.panicked);
                    warn!(sink = slot.name, key = %event.key, "metric sink panicked");
                }
            }
        }
    }
}

impl<const N: usize> std::fmt::Debug for MetricRegistry<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricRegistry")
            .field("capacity", &N)
            .field("sinks", &self.sink_names())
            .field("stats", &self.stats())
            .finish()
    }
}
