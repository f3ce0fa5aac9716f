//! Prometheus metrics for the message store.
//!
//! All metrics follow the naming convention: `message_store_<metric>_<unit>`
//!
//! - **Counter**: reads served, events published
//! - **CounterVec**: writes committed by operation, calls rejected by reason

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Read calls served (any accessor)
    pub static ref STORE_READS: Counter = Counter::new(
        "message_store_reads_total",
        "Total number of read calls served"
    ).expect("metric creation failed");

    /// Committed writes, labelled by operation
    pub static ref STORE_WRITES: CounterVec = CounterVec::new(
        Opts::new("message_store_writes_total", "Total committed writes"),
        &["operation"]  // set_message, transfer_ownership
    ).expect("metric creation failed");

    /// Rejected calls, labelled by error kind
    pub static ref STORE_REJECTIONS: CounterVec = CounterVec::new(
        Opts::new("message_store_rejections_total", "Total rejected write calls"),
        &["operation", "kind"]  // kind: unauthorized, invalid_input
    ).expect("metric creation failed");

    /// Notifications handed to the bus
    pub static ref EVENTS_PUBLISHED: Counter = Counter::new(
        "message_store_events_published_total",
        "Total notifications published to the event bus"
    ).expect("metric creation failed");
}

/// Handle proving metrics were registered.
#[derive(Debug, Clone, Copy)]
pub struct MetricsHandle {
    _private: (),
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already-registered collectors are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(STORE_READS.clone()),
        Box::new(STORE_WRITES.clone()),
        Box::new(STORE_REJECTIONS.clone()),
        Box::new(EVENTS_PUBLISHED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle { _private: () })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
