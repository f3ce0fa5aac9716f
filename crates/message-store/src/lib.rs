//! # Message Store - Owner-Gated Shared State
//!
//! A single piece of on-chain-style state: one bounded text message and one
//! owner. Anyone can read; only the owner can replace the message or hand
//! ownership to someone else. Every committed write emits a typed
//! notification onto the shared bus.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Message is 1..=256 bytes | `domain/services.rs` - `validate_message()` |
//! | Owner is never the zero address | `domain/services.rs` - `validate_new_owner()` |
//! | Only the owner mutates | `domain/services.rs` - `require_owner()` |
//! | `deployed_at` never changes | `domain/entities.rs` - no setter |
//! | Failed calls leave no trace | `domain/entities.rs` - validate before mutate |
//! | Bus order equals commit order | `service.rs` - publish under the write lock |
//!
//! ## Operations
//!
//! | Operation | Access | Mutates | Failure modes |
//! |-----------|--------|---------|---------------|
//! | `get_message` | any | no | none |
//! | `get_owner` | any | no | none |
//! | `get_deployed_at` | any | no | none |
//! | `get_info` | any | no | none |
//! | `set_message` | owner | message | `Unauthorized`, `InvalidInput` |
//! | `transfer_ownership` | owner | owner | `Unauthorized`, `InvalidInput` |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `Clock` | Creation time |
//! | `shared_bus::EventPublisher` | Notification delivery |
//!
//! ## Usage Example
//!
//! ```ignore
//! use message_store::prelude::*;
//!
//! let bus = Arc::new(InMemoryEventBus::new());
//! let store = MessageStoreService::deploy(deployer, &SystemClock, bus, ServiceConfig::default()).await?;
//!
//! store.set_message(deployer, "gm".to_string()).await?;
//! assert_eq!(store.get_message().await, "gm");
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod calls;
pub mod domain;
pub mod errors;
mod metrics;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::entities::MessageStore;
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };
    pub use crate::domain::services::compute_store_address;
    pub use crate::domain::value_objects::{StoreInfo, DEFAULT_MESSAGE, MAX_MESSAGE_LENGTH};

    // Ports
    pub use crate::ports::inbound::MessageStoreApi;
    pub use crate::ports::outbound::Clock;

    // Calls
    pub use crate::calls::{CallRequest, CallResponse, StoreCall, StoreCallResult};

    // Errors
    pub use crate::errors::{InputError, StoreError};

    // Adapters
    pub use crate::adapters::{FixedClock, ManualClock, SystemClock};

    // Service
    pub use crate::service::{MessageStoreService, ServiceConfig, ServiceStats};

    // Bus and identity types callers always need alongside the store
    pub use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, StoreEvent, StoreEventKind};
    pub use shared_types::{Address, Timestamp};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
