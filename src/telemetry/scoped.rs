//! Begin/end span guard.

use crate::telemetry::events::{EventTag, MetricValue};
use crate::telemetry::keys::MetricKey;
use crate::telemetry::registry::MetricRegistry;

/// Emits a `Begin` event when created and the matching `End` event when
/// dropped. The `End` event carries whatever value was last set, or
/// [`MetricValue::None`].
#[must_use = "the span ends as soon as the guard is dropped"]
pub struct ScopedMetric<'r, const N: usize> {
    registry: &'r MetricRegistry<N>,
    key: MetricKey,
    end_value: MetricValue<'r>,
}

impl<'r, const N: usize> ScopedMetric<'r, N> {
    pub(crate) fn start(registry: &'r MetricRegistry<N>, key: MetricKey) -> Self {
        registry.begin(key);
        Self {
            registry,
            key,
            end_value: MetricValue::None,
        }
    }

    pub fn key(&self) -> MetricKey {
        self.key
    }

    /// Value reported with the `End` event.
    pub fn set_value(&mut self, value: impl Into<MetricValue<'r>>) {
        self.end_value = value.into();
    }

    /// Report an error code with the `End` event. Zero conventionally means success.
    pub fn set_error_code(&mut self, code: u32) {
        self.end_value = MetricValue::ErrorCode(code);
    }
}

impl<const N: usize> Drop for ScopedMetric<'_, N> {
    fn drop(&mut self) {
        self.registry.end(self.key, self.end_value);
    }
}

impl<const N: usize> std::fmt::Debug for ScopedMetric<'_, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedMetric")
            .field("key", &self.key)
            .field("tag", &EventTag::Begin)
            .field("end_value", &self.end_value)
            .finish()
    }
}
