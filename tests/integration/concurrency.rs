//! Integration tests for emitting from many threads

use crate::integration::test_utils::LabelledSink;
use metric_fanout::keys::{self, PASE_SESSION};
use metric_fanout::sinks::{CounterSink, MemorySink, OverflowPolicy};
use metric_fanout::MetricRegistry;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const PER_THREAD: u64 = 500;

#[test]
fn test_concurrent_emits_are_each_delivered_once() {
    let registry = Arc::new(MetricRegistry::new());
    let counters: Vec<_> = (0..3).map(|_| Arc::new(CounterSink::new())).collect();
    for counter in &counters {
        registry.register_sink(counter).unwrap();
    }

    let workers: Vec<_> = (0..THREADS)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let key = keys::ALL[i % keys::ALL.len()];
                for n in 0..PER_THREAD {
                    registry.emit(key, n);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let expected = THREADS as u64 * PER_THREAD;
    for counter in &counters {
        assert_eq!(counter.total(), expected);
    }
    let stats = registry.stats();
    assert_eq!(stats.emitted, expected);
    assert_eq!(stats.delivered, expected * counters.len() as u64);
    assert_eq!(stats.failed + stats.panicked + stats.orphaned, 0);
}

#[test]
fn test_per_thread_order_is_preserved() {
    let registry = Arc::new(MetricRegistry::new());
    let recorder = Arc::new(MemorySink::new(
        THREADS * PER_THREAD as usize,
        OverflowPolicy::Reject,
    ));
    registry.register_sink(&recorder).unwrap();

    let workers: Vec<_> = (0..THREADS)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let key = keys::ALL[i];
                for n in 0..PER_THREAD {
                    registry.emit(key, n);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let events = recorder.events();
    assert_eq!(events.len(), THREADS * PER_THREAD as usize);
    for key in &keys::ALL[..THREADS] {
        let values: Vec<String> = events
            .iter()
            .filter(|e| e.key == *key)
            .map(|e| e.value.to_string())
            .collect();
        let expected: Vec<String> = (0..PER_THREAD).map(|n| n.to_string()).collect();
        assert_eq!(values, expected, "events for {} arrived out of order", key);
    }
}

#[test]
fn test_registration_churn_during_emission() {
    let registry = Arc::new(MetricRegistry::new());
    let stable = Arc::new(CounterSink::new());
    registry.register_sink(&stable).unwrap();

    let emitters: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    registry.emit(PASE_SESSION, 1);
                }
            })
        })
        .collect();

    let churn = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            let journal = Arc::new(Mutex::new(Vec::new()));
            for _ in 0..200 {
                let transient = LabelledSink::new("transient", &journal);
                if let Ok(handle) = registry.register_sink(&transient) {
                    registry.unregister_sink(handle);
                }
            }
        })
    };

    for emitter in emitters {
        emitter.join().unwrap();
    }
    churn.join().unwrap();

    // The sink registered throughout sees every event exactly once.
    assert_eq!(stable.total(), 4 * PER_THREAD);
    assert_eq!(registry.sink_count(), 1);
}
