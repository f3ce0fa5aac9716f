//! # Notification Payloads
//!
//! Typed records emitted by a message store on every committed state change.
//! Watchers receive them in commit order through the shared bus.
//!
//! | Payload | Emitted by |
//! |---------|-----------|
//! | `StoreDeployed` | construction |
//! | `MessageUpdated` | `set_message` |
//! | `OwnershipTransferred` | `transfer_ownership` |

use crate::entities::{Address, Timestamp};
use serde::{Deserialize, Serialize};

/// A store instance was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDeployed {
    /// Address of the new store.
    pub store: Address,
    /// Initial owner (the deployer).
    pub owner: Address,
    /// Creation time, fixed for the store's lifetime.
    pub deployed_at: Timestamp,
    /// The default message the store starts with.
    pub message: String,
}

/// The stored message was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageUpdated {
    /// Value before the write.
    pub old_message: String,
    /// Value after the write.
    pub new_message: String,
    /// Caller that performed the write (the owner at call time).
    pub updater: Address,
}

/// Ownership moved to a new identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransferred {
    /// Owner before the transfer.
    pub previous_owner: Address,
    /// Owner after the transfer.
    pub new_owner: Address,
}
