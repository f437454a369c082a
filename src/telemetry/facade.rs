//! Sink installation from configuration.
//!
//! The registry only holds weak references, so something has to own the
//! configured sinks for as long as they should receive events. That owner is
//! [`InstalledSinks`].

use std::sync::Arc;
use tracing::info;

use crate::config::SinksConfig;
use crate::error::ApiError;
use crate::telemetry::registry::{MetricRegistry, SinkHandle};
use crate::telemetry::sinks::{CounterSink, LogSink, MemorySink, MetricSink, QueuedSink};

/// Owns the sinks built from a [`SinksConfig`] and their registrations.
#[derive(Debug, Default)]
pub struct InstalledSinks {
    log: Option<Arc<LogSink>>,
    queue: Option<Arc<QueuedSink>>,
    counter: Option<Arc<CounterSink>>,
    memory: Option<Arc<MemorySink>>,
    handles: Vec<SinkHandle>,
}

impl InstalledSinks {
    /// Build the enabled sinks and register them in a fixed order:
    /// log (possibly queued), counter, memory.
    ///
    /// On failure every sink registered so far is unregistered again.
    pub fn install<const N: usize>(
        registry: &MetricRegistry<N>,
        config: &SinksConfig,
    ) -> Result<Self, ApiError> {
        let mut installed = Self::default();
        if let Err(err) = installed.register_all(registry, config) {
            installed.uninstall(registry);
            return Err(err);
        }
        info!(sinks = ?registry.sink_names(), "metric sinks installed");
        Ok(installed)
    }

    fn register_all<const N: usize>(
        &mut self,
        registry: &MetricRegistry<N>,
        config: &SinksConfig,
    ) -> Result<(), ApiError> {
        if config.log.enabled {
            let log = Arc::new(LogSink::from_level_name(&config.log.level).ok_or_else(|| {
                ApiError::ConfigError(format!("Invalid log sink level: {}", config.log.level))
            })?);
            if config.queue.enabled {
                let inner: Arc<dyn MetricSink> = log;
                let queue = Arc::new(QueuedSink::spawn(inner, config.queue.capacity)?);
                self.handles.push(registry.register_sink(&queue)?);
                self.queue = Some(queue);
            } else {
                self.handles.push(registry.register_sink(&log)?);
                self.log = Some(log);
            }
        }
        if config.counter.enabled {
            let counter = Arc::new(CounterSink::new());
            self.handles.push(registry.register_sink(&counter)?);
            self.counter = Some(counter);
        }
        if config.memory.enabled {
            let memory = Arc::new(MemorySink::new(
                config.memory.capacity,
                config.memory.overflow,
            ));
            self.handles.push(registry.register_sink(&memory)?);
            self.memory = Some(memory);
        }
        Ok(())
    }

    /// The directly registered log sink; `None` when it sits behind the queue.
    pub fn log(&self) -> Option<&Arc<LogSink>> {
        self.log.as_ref()
    }

    pub fn counter(&self) -> Option<&Arc<CounterSink>> {
        self.counter.as_ref()
    }

    pub fn memory(&self) -> Option<&Arc<MemorySink>> {
        self.memory.as_ref()
    }

    pub fn queue(&self) -> Option<&Arc<QueuedSink>> {
        self.queue.as_ref()
    }

    pub fn handles(&self) -> &[SinkHandle] {
        &self.handles
    }

    /// Unregister everything and drain the queue, if any.
    pub fn uninstall<const N: usize>(mut self, registry: &MetricRegistry<N>) {
        for handle in self.handles.drain(..) {
            registry.unregister_sink(handle);
        }
        if let Some(queue) = self.queue.take() {
            queue.shutdown();
        }
    }
}
