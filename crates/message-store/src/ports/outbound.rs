//! # Driven Ports (SPI - Outbound)
//!
//! What the store needs from its environment. Only the creation time is
//! environment-supplied; caller identity arrives with each call.

use shared_types::Timestamp;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Unix seconds.
    fn now(&self) -> Timestamp;
}
