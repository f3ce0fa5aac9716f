//! # Core Domain Entities
//!
//! The message store state machine: three state fields, two guarded
//! mutators and an append-only notification log.

use crate::domain::services::{
    compute_store_address, require_owner, validate_message, validate_new_owner,
};
use crate::domain::value_objects::{StoreInfo, DEFAULT_MESSAGE};
use crate::errors::StoreError;
use shared_bus::{StoreEvent, StoreEventKind};
use shared_types::{Address, MessageUpdated, OwnershipTransferred, StoreDeployed, Timestamp};

// =============================================================================
// MESSAGE STORE
// =============================================================================

/// A single deployed message store.
///
/// Every mutator checks all of its preconditions before touching any field,
/// then mutates and appends its notification in one step. A failed call
/// leaves the store (including its log) exactly as it was.
#[derive(Debug, Clone)]
pub struct MessageStore {
    /// This store's own address.
    address: Address,
    /// Current message, always `1..=MAX_MESSAGE_LENGTH` bytes.
    message: String,
    /// Sole identity allowed to mutate.
    owner: Address,
    /// Creation time.
    deployed_at: Timestamp,
    /// Notification log; `log[i].sequence == i`.
    log: Vec<StoreEvent>,
}

impl MessageStore {
    /// Create a store owned by `deployer`.
    ///
    /// `nonce` is the deployer's account nonce and only feeds the store
    /// address. `now` becomes the immutable creation time.
    ///
    /// # Errors
    ///
    /// `InvalidInput(ZeroOwner)` if `deployer` is the null identity.
    pub fn deploy(deployer: Address, nonce: u64, now: Timestamp) -> Result<Self, StoreError> {
        validate_new_owner(deployer)?;

        let address = compute_store_address(deployer, nonce);
        let deployed = StoreEvent {
            store: address,
            sequence: 0,
            kind: StoreEventKind::Deployed(StoreDeployed {
                store: address,
                owner: deployer,
                deployed_at: now,
                message: DEFAULT_MESSAGE.to_string(),
            }),
        };

        Ok(Self {
            address,
            message: DEFAULT_MESSAGE.to_string(),
            owner: deployer,
            deployed_at: now,
            log: vec![deployed],
        })
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// The store's address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Current message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Current owner.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Creation time.
    #[must_use]
    pub fn deployed_at(&self) -> Timestamp {
        self.deployed_at
    }

    /// All three state fields at once.
    #[must_use]
    pub fn info(&self) -> StoreInfo {
        StoreInfo {
            message: self.message.clone(),
            owner: self.owner,
            deployed_at: self.deployed_at,
        }
    }

    /// Full notification log, oldest first.
    #[must_use]
    pub fn events(&self) -> &[StoreEvent] {
        &self.log
    }

    /// Notifications with `sequence >= from`.
    #[must_use]
    pub fn events_since(&self, from: u64) -> &[StoreEvent] {
        let start = usize::try_from(from).map_or(self.log.len(), |i| i.min(self.log.len()));
        &self.log[start..]
    }

    /// Sequence number the next notification will get.
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.log.len() as u64
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Replace the message.
    ///
    /// Checks, in order: caller is owner, candidate non-empty, candidate
    /// within `MAX_MESSAGE_LENGTH` bytes. Writing the current value again is
    /// a normal write and emits a notification.
    ///
    /// # Errors
    ///
    /// `Unauthorized` or `InvalidInput`; the store is unchanged.
    pub fn set_message(&mut self, caller: Address, candidate: &str) -> Result<StoreEvent, StoreError> {
        require_owner(caller, self.owner)?;
        validate_message(candidate)?;

        let old_message = std::mem::replace(&mut self.message, candidate.to_string());
        Ok(self.append(StoreEventKind::MessageUpdated(MessageUpdated {
            old_message,
            new_message: candidate.to_string(),
            updater: caller,
        })))
    }

    /// Hand ownership to `new_owner`.
    ///
    /// The previous owner loses write access as soon as this returns.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if `caller` is not the owner, `InvalidInput(ZeroOwner)`
    /// if `new_owner` is the null identity; the store is unchanged.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<StoreEvent, StoreError> {
        require_owner(caller, self.owner)?;
        validate_new_owner(new_owner)?;

        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        Ok(self.append(StoreEventKind::OwnershipTransferred(OwnershipTransferred {
            previous_owner,
            new_owner,
        })))
    }

    fn append(&mut self, kind: StoreEventKind) -> StoreEvent {
        let event = StoreEvent {
            store: self.address,
            sequence: self.next_sequence(),
            kind,
        };
        self.log.push(event.clone());
        event
    }
}

// =============================================================================
// TESTS
// =============================================================================
