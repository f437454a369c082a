//! Property-based tests for register/unregister/emit sequences
//!
//! A simple model (a Vec of live sink ids in registration order) is run
//! alongside the registry; after every step delivery must match the model.

use metric_fanout::keys;
use metric_fanout::sinks::CounterSink;
use metric_fanout::{EmitStats, MetricRegistry, RegistryError, SinkHandle};
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Op {
    Register,
    Unregister(usize),
    Emit(usize, i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Register),
        1 => (0usize..8).prop_map(Op::Unregister),
        3 => (0usize..keys::ALL.len(), any::<i64>()).prop_map(|(k, v)| Op::Emit(k, v)),
    ]
}

/// Every emit reaches exactly the sinks registered at that moment, once each.
#[test]
fn test_delivery_matches_model() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(op_strategy(), 1..64), |ops| {
            let registry = MetricRegistry::new();
            let mut sinks: Vec<(Arc<CounterSink>, SinkHandle)> = Vec::new();
            let mut expected: Vec<u64> = Vec::new();
            let mut active: Vec<usize> = Vec::new();

            for op in ops {
                match op {
                    Op::Register => {
                        let sink = Arc::new(CounterSink::new());
                        match registry.register_sink(&sink) {
                            Ok(handle) => {
                                prop_assert!(active.len() < registry.capacity());
                                active.push(sinks.len());
                                sinks.push((sink, handle));
                                expected.push(0);
                            }
                            Err(RegistryError::TableFull { capacity }) => {
                                prop_assert_eq!(capacity, 4);
                                prop_assert_eq!(active.len(), 4);
                            }
                        }
                    }
                    Op::Unregister(pick) => {
                        if sinks.is_empty() {
                            continue;
                        }
                        let index = pick % sinks.len();
                        let was_active = active.contains(&index);
                        let removed = registry.unregister_sink(sinks[index].1);
                        prop_assert_eq!(removed, was_active);
                        active.retain(|i| *i != index);
                    }
                    Op::Emit(key, value) => {
                        registry.emit(keys::ALL[key], value);
                        for i in &active {
                            expected[*i] += 1;
                        }
                    }
                }
                prop_assert_eq!(registry.sink_count(), active.len());
            }

            for (i, (sink, _)) in sinks.iter().enumerate() {
                prop_assert_eq!(sink.total(), expected[i]);
            }
            let stats = registry.stats();
            prop_assert_eq!(stats.failed + stats.panicked + stats.orphaned, 0);
            Ok(())
        })
        .unwrap();
}

/// Handles are never reused, even after the slot they named is freed.
#[test]
fn test_handles_are_unique() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(1usize..40), |rounds| {
            let registry = MetricRegistry::<2>::bounded();
            let sink = Arc::new(CounterSink::new());
            let mut seen = std::collections::HashSet::new();
            for _ in 0..rounds {
                let handle = registry.register_sink(&sink).unwrap();
                prop_assert!(seen.insert(handle.id()));
                prop_assert!(registry.unregister_sink(handle));
                prop_assert!(!registry.unregister_sink(handle));
            }
            Ok(())
        })
        .unwrap();
}

/// Emitting into an empty registry has no effect, whatever the input.
#[test]
fn test_empty_registry_emit_is_inert() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(any::<String>(), any::<i64>()), |(text, value)| {
            let registry = MetricRegistry::new();
            registry.emit(keys::PASE_SESSION, text.as_str());
            registry.emit(keys::WIFI_RSSI, value);
            prop_assert_eq!(registry.stats(), EmitStats::default());
            Ok(())
        })
        .unwrap();
}
