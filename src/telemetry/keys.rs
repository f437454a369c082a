//! Metric keys: opaque labels naming a class of telemetry event.
//!
//! The registry never validates keys. The constants below are the well-known
//! labels used by the commissioning and connectivity paths; any other
//! `&'static str` is an equally valid key.

use serde::{Serialize, Serializer};
use std::fmt;

/// Identifier for a class of metric events.
///
/// A thin `Copy` wrapper around a static string. Two keys are equal when their
/// text is equal; the registry does not enforce uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricKey(&'static str);

impl MetricKey {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl From<&'static str> for MetricKey {
    fn from(name: &'static str) -> Self {
        Self(name)
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for MetricKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

/// Commissionee discovery over BLE
pub const DISCOVERY_OVER_BLE: MetricKey = MetricKey::new("disc-over-ble");

/// Commissionee discovery on the operational network
pub const DISCOVERY_ON_NETWORK: MetricKey = MetricKey::new("disc-on-nw");

/// PASE session establishment
pub const PASE_SESSION: MetricKey = MetricKey::new("pase-session");

/// PASE pairing step
pub const PASE_SESSION_PAIR: MetricKey = MetricKey::new("pase-session-pair");

/// PASE session established over BLE
pub const PASE_SESSION_BLE: MetricKey = MetricKey::new("pase-session-ble");

/// Device attestation verdict
pub const ATTESTATION_RESULT: MetricKey = MetricKey::new("attestation-result");

/// Device attestation failure overridden by the commissioner
pub const ATTESTATION_OVERRIDDEN: MetricKey = MetricKey::new("attestation-overridden");

/// CASE session establishment
pub const CASE_SESSION: MetricKey = MetricKey::new("case-session");

/// CASE connection establishment state
pub const CASE_SESSION_EST_STATE: MetricKey = MetricKey::new("case-conn-est");

/// Wi-Fi signal strength
pub const WIFI_RSSI: MetricKey = MetricKey::new("wifi_rssi");

/// Every well-known key, in declaration order.
pub const ALL: [MetricKey; 10] = [
    DISCOVERY_OVER_BLE,
    DISCOVERY_ON_NETWORK,
    PASE_SESSION,
    PASE_SESSION_PAIR,
    PASE_SESSION_BLE,
    ATTESTATION_RESULT,
    ATTESTATION_OVERRIDDEN,
    CASE_SESSION,
    CASE_SESSION_EST_STATE,
    WIFI_RSSI,
];

/// Find a well-known key by its text. Unknown names return `None`.
pub fn lookup(name: &str) -> Option<MetricKey> {
    ALL.iter().copied().find(|key| key.as_str() == name)
}
