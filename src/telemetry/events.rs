//! Event schema for metric emission.
//!
//! [`MetricEvent`] is the stack value handed to every sink. It borrows its
//! text payload, so building one never allocates. Sinks that keep events past
//! the `accept` call convert them to [`OwnedMetricEvent`].

use serde::Serialize;
use std::fmt;

use crate::telemetry::keys::MetricKey;
use crate::telemetry::types::now_millis;

/// Position of an event within a measured span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTag {
    /// Standalone sample
    Instant,
    /// Start of a measured span
    Begin,
    /// End of a measured span
    End,
}

impl EventTag {
    pub fn as_str(self) -> &'static str {
        match self {
            EventTag::Instant => "instant",
            EventTag::Begin => "begin",
            EventTag::End => "end",
        }
    }
}

/// Optional payload attached to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricValue<'a> {
    #[default]
    None,
    Signed(i64),
    Unsigned(u64),
    /// Stack error code reported at the end of a span
    ErrorCode(u32),
    Text(&'a str),
}

impl MetricValue<'_> {
    pub fn is_none(&self) -> bool {
        matches!(self, MetricValue::None)
    }

    pub fn to_owned_value(&self) -> OwnedMetricValue {
        match *self {
            MetricValue::None => OwnedMetricValue::None,
            MetricValue::Signed(v) => OwnedMetricValue::Signed(v),
            MetricValue::Unsigned(v) => OwnedMetricValue::Unsigned(v),
            MetricValue::ErrorCode(code) => OwnedMetricValue::ErrorCode(code),
            MetricValue::Text(text) => OwnedMetricValue::Text(text.to_string()),
        }
    }
}

impl fmt::Display for MetricValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::None => f.write_str("-"),
            MetricValue::Signed(v) => write!(f, "{}", v),
            MetricValue::Unsigned(v) => write!(f, "{}", v),
            MetricValue::ErrorCode(code) => write!(f, "err:0x{:08x}", code),
            MetricValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<()> for MetricValue<'_> {
    fn from(_: ()) -> Self {
        MetricValue::None
    }
}

impl From<i32> for MetricValue<'_> {
    fn from(v: i32) -> Self {
        MetricValue::Signed(i64::from(v))
    }
}

impl From<i64> for MetricValue<'_> {
    fn from(v: i64) -> Self {
        MetricValue::Signed(v)
    }
}

impl From<u32> for MetricValue<'_> {
    fn from(v: u32) -> Self {
        MetricValue::Unsigned(u64::from(v))
    }
}

impl From<u64> for MetricValue<'_> {
    fn from(v: u64) -> Self {
        MetricValue::Unsigned(v)
    }
}

impl From<bool> for MetricValue<'_> {
    fn from(v: bool) -> Self {
        MetricValue::Unsigned(u64::from(v))
    }
}

impl<'a> From<&'a str> for MetricValue<'a> {
    fn from(text: &'a str) -> Self {
        MetricValue::Text(text)
    }
}

impl<'a, T: Into<MetricValue<'a>>> From<Option<T>> for MetricValue<'a> {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(MetricValue::None)
    }
}

/// One emitted metric sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricEvent<'a> {
    pub key: MetricKey,
    pub tag: EventTag,
    pub value: MetricValue<'a>,
    /// Capture time, milliseconds since Unix epoch
    pub timestamp_ms: u64,
}

impl<'a> MetricEvent<'a> {
    pub fn new(key: MetricKey, tag: EventTag, value: MetricValue<'a>, timestamp_ms: u64) -> Self {
        Self {
            key,
            tag,
            value,
            timestamp_ms,
        }
    }

    /// Instant event stamped with the current time.
    pub fn instant(key: MetricKey, value: impl Into<MetricValue<'a>>) -> Self {
        Self::with_now(key, EventTag::Instant, value.into())
    }

    pub fn with_now(key: MetricKey, tag: EventTag, value: MetricValue<'a>) -> Self {
        Self::new(key, tag, value, now_millis())
    }

    pub fn to_owned_event(&self) -> OwnedMetricEvent {
        OwnedMetricEvent {
            key: self.key,
            tag: self.tag,
            value: self.value.to_owned_value(),
            timestamp_ms: self.timestamp_ms,
        }
    }
}

/// Owned counterpart of [`MetricValue`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OwnedMetricValue {
    #[default]
    None,
    Signed(i64),
    Unsigned(u64),
    ErrorCode(u32),
    Text(String),
}

impl OwnedMetricValue {
    pub fn as_value(&self) -> MetricValue<'_> {
        match self {
            OwnedMetricValue::None => MetricValue::None,
            OwnedMetricValue::Signed(v) => MetricValue::Signed(*v),
            OwnedMetricValue::Unsigned(v) => MetricValue::Unsigned(*v),
            OwnedMetricValue::ErrorCode(code) => MetricValue::ErrorCode(*code),
            OwnedMetricValue::Text(text) => MetricValue::Text(text),
        }
    }
}

impl fmt::Display for OwnedMetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_value(), f)
    }
}

/// A metric event retained beyond the emit call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnedMetricEvent {
    pub key: MetricKey,
    pub tag: EventTag,
    pub value: OwnedMetricValue,
    pub timestamp_ms: u64,
}

impl OwnedMetricEvent {
    pub fn as_event(&self) -> MetricEvent<'_> {
        MetricEvent {
            key: self.key,
            tag: self.tag,
            value: self.value.as_value(),
            timestamp_ms: self.timestamp_ms,
        }
    }
}
