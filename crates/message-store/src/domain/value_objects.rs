//! # Value Objects
//!
//! Constants and read-only projections of store state.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Timestamp};

/// Upper bound on message length, in UTF-8 bytes.
pub const MAX_MESSAGE_LENGTH: usize = 256;

/// Message every store starts with.
pub const DEFAULT_MESSAGE: &str = "Hello from ZeroKeyCI! No private keys in CI/CD!";

/// Snapshot of the three state fields, returned by `get_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    /// Current message.
    pub message: String,
    /// Current owner.
    pub owner: Address,
    /// Creation time.
    pub deployed_at: Timestamp,
}
