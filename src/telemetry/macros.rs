//! Call-site macros.
//!
//! With the `enabled` feature off every macro expands to a dead branch: the
//! arguments are still type-checked but never evaluated, and the optimizer
//! removes the call site entirely.

/// Emit an instant metric event: `metric!(registry, key)` or `metric!(registry, key, value)`.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! metric {
    ($registry:expr, $key:expr $(,)?) => {
        $registry.emit($key, ())
    };
    ($registry:expr, $key:expr, $value:expr $(,)?) => {
        $registry.emit($key, $value)
    };
}

#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! metric {
    ($registry:expr, $key:expr $(, $value:expr)? $(,)?) => {
        if false {
            let _ = (&$registry, &$key $(, &$value)?);
        }
    };
}

/// Mark the start of a measured span.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! metric_begin {
    ($registry:expr, $key:expr $(,)?) => {
        $registry.begin($key)
    };
}

#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! metric_begin {
    ($registry:expr, $key:expr $(,)?) => {
        if false {
            let _ = (&$registry, &$key);
        }
    };
}

/// Mark the end of a measured span, optionally with a value.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! metric_end {
    ($registry:expr, $key:expr $(,)?) => {
        $registry.end($key, ())
    };
    ($registry:expr, $key:expr, $value:expr $(,)?) => {
        $registry.end($key, $value)
    };
}

#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! metric_end {
    ($registry:expr, $key:expr $(, $value:expr)? $(,)?) => {
        if false {
            let _ = (&$registry, &$key $(, &$value)?);
        }
    };
}

/// Open a span that closes when the returned guard goes out of scope.
///
/// Bind the result (`let _span = metric_scope!(..)`); with the feature off
/// the binding is `()`.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! metric_scope {
    ($registry:expr, $key:expr $(,)?) => {
        $registry.scoped($key)
    };
}

#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! metric_scope {
    ($registry:expr, $key:expr $(,)?) => {
        if false {
            let _ = (&$registry, &$key);
        }
    };
}
