//! Integration tests for registration, delivery, and removal

use crate::integration::test_utils::{LabelledSink, RejectingSink};
use metric_fanout::keys::{CASE_SESSION, PASE_SESSION, WIFI_RSSI};
use metric_fanout::sinks::{CounterSink, MemorySink, OverflowPolicy, QueuedSink};
use metric_fanout::telemetry::{EventTag, MetricSink, OwnedMetricValue};
use metric_fanout::{MetricRegistry, RegistryError};
use parking_lot::Mutex;
use std::sync::Arc;

#[test]
fn test_two_sinks_then_unregister_one() {
    let registry = MetricRegistry::new();
    let a = Arc::new(MemorySink::new(8, OverflowPolicy::Reject));
    let b = Arc::new(MemorySink::new(8, OverflowPolicy::Reject));
    let handle_a = registry.register_sink(&a).unwrap();
    registry.register_sink(&b).unwrap();

    registry.emit(PASE_SESSION, 1);
    for sink in [&a, &b] {
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, PASE_SESSION);
        assert_eq!(events[0].value, OwnedMetricValue::Signed(1));
    }

    assert!(registry.unregister_sink(handle_a));
    registry.emit(CASE_SESSION, 0);

    assert_eq!(a.len(), 1, "unregistered sink must not see later events");
    let events = b.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].key, CASE_SESSION);
    assert_eq!(events[1].value, OwnedMetricValue::Signed(0));
}

#[test]
fn test_delivery_follows_registration_order() {
    let registry = MetricRegistry::new();
    let journal = Arc::new(Mutex::new(Vec::new()));
    let sinks = [
        LabelledSink::new("first", &journal),
        LabelledSink::new("second", &journal),
        LabelledSink::new("third", &journal),
        LabelledSink::new("fourth", &journal),
    ];
    let handles: Vec<_> = sinks
        .iter()
        .map(|sink| registry.register_sink(sink).unwrap())
        .collect();

    registry.emit(WIFI_RSSI, -48);
    let labels: Vec<_> = journal.lock().iter().map(|(label, _)| *label).collect();
    assert_eq!(labels, vec!["first", "second", "third", "fourth"]);

    // Removing from the middle keeps the relative order of the rest.
    registry.unregister_sink(handles[1]);
    journal.lock().clear();
    registry.emit(WIFI_RSSI, -50);
    let labels: Vec<_> = journal.lock().iter().map(|(label, _)| *label).collect();
    assert_eq!(labels, vec!["first", "third", "fourth"]);
}

#[test]
fn test_fifth_sink_is_rejected_and_set_unchanged() {
    let registry = MetricRegistry::new();
    let counters: Vec<_> = (0..4).map(|_| Arc::new(CounterSink::new())).collect();
    for counter in &counters {
        registry.register_sink(counter).unwrap();
    }

    let extra = Arc::new(CounterSink::new());
    let err = registry.register_sink(&extra).unwrap_err();
    assert_eq!(err, RegistryError::TableFull { capacity: 4 });
    assert_eq!(registry.sink_count(), 4);

    registry.emit(PASE_SESSION, ());
    assert!(counters.iter().all(|c| c.total() == 1));
    assert_eq!(extra.total(), 0);
}

#[test]
fn test_failing_sink_does_not_stop_later_sinks() {
    let registry = MetricRegistry::new();
    let rejecting = Arc::new(RejectingSink);
    let counter = Arc::new(CounterSink::new());
    registry.register_sink(&rejecting).unwrap();
    registry.register_sink(&counter).unwrap();

    registry.emit(CASE_SESSION, 7u32);

    assert_eq!(counter.total(), 1);
    let stats = registry.stats();
    assert_eq!(stats.emitted, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.delivered, 1);
}

#[test]
fn test_scoped_span_reaches_every_sink() {
    let registry = MetricRegistry::new();
    let counter = Arc::new(CounterSink::new());
    let memory = Arc::new(MemorySink::new(4, OverflowPolicy::Reject));
    registry.register_sink(&counter).unwrap();
    registry.register_sink(&memory).unwrap();

    {
        let mut span = registry.scoped(CASE_SESSION);
        span.set_error_code(0x32);
    }

    let count = counter.get(CASE_SESSION).unwrap();
    assert_eq!((count.begins, count.ends, count.open_spans()), (1, 1, 0));
    let events = memory.events();
    assert_eq!(events[0].tag, EventTag::Begin);
    assert_eq!(events[1].tag, EventTag::End);
    assert_eq!(events[1].value, OwnedMetricValue::ErrorCode(0x32));
}

#[test]
fn test_queued_sink_forwards_after_shutdown() {
    let registry = MetricRegistry::new();
    let counter = Arc::new(CounterSink::new());
    let inner: Arc<dyn MetricSink> = counter.clone();
    let queued = Arc::new(QueuedSink::spawn(inner, 64).unwrap());
    registry.register_sink(&queued).unwrap();

    for _ in 0..10 {
        registry.emit(PASE_SESSION, 1);
    }
    queued.shutdown();

    assert_eq!(queued.forwarded() + queued.dropped(), 10);
    assert_eq!(counter.total(), queued.forwarded());
}

#[test]
fn test_dropping_sink_owner_stops_delivery() {
    let registry = MetricRegistry::new();
    let kept = Arc::new(CounterSink::new());
    let dropped = Arc::new(CounterSink::new());
    registry.register_sink(&kept).unwrap();
    registry.register_sink(&dropped).unwrap();
    drop(dropped);

    registry.emit(PASE_SESSION, ());

    assert_eq!(kept.total(), 1);
    assert_eq!(registry.stats().orphaned, 1);
    // The slot stays occupied until it is unregistered.
    assert_eq!(registry.sink_count(), 2);
}
