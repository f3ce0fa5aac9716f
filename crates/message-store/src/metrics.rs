//! Metric hooks for the store service.
//!
//! Compiled to no-ops without the `metrics` feature.

#[cfg(feature = "metrics")]
use store_telemetry::{EVENTS_PUBLISHED, STORE_READS, STORE_REJECTIONS, STORE_WRITES};

/// A read call was served.
#[inline]
pub fn record_read() {
    #[cfg(feature = "metrics")]
    STORE_READS.inc();
}

/// A write committed.
#[inline]
pub fn record_write(_operation: &str) {
    #[cfg(feature = "metrics")]
    STORE_WRITES.with_label_values(&[_operation]).inc();
}

/// A write was rejected.
#[inline]
pub fn record_rejection(_operation: &str, _kind: &str) {
    #[cfg(feature = "metrics")]
    STORE_REJECTIONS
        .with_label_values(&[_operation, _kind])
        .inc();
}

/// A notification was handed to the bus.
#[inline]
pub fn record_published() {
    #[cfg(feature = "metrics")]
    EVENTS_PUBLISHED.inc();
}
