//! # Driving Ports (API - Inbound)
//!
//! The public operations of a message store. Reads are open to any caller;
//! writes take the caller identity explicitly and are gated on ownership.

use crate::domain::value_objects::{StoreInfo, MAX_MESSAGE_LENGTH};
use crate::errors::StoreError;
use async_trait::async_trait;
use shared_bus::StoreEvent;
use shared_types::{Address, Timestamp};

/// Message store API.
///
/// Every write either commits fully and returns the notification it
/// emitted, or fails and leaves no trace.
#[async_trait]
pub trait MessageStoreApi: Send + Sync {
    /// Current message.
    async fn get_message(&self) -> String;

    /// Current owner.
    async fn get_owner(&self) -> Address;

    /// Creation time.
    async fn get_deployed_at(&self) -> Timestamp;

    /// All three state fields, read together.
    async fn get_info(&self) -> StoreInfo;

    /// Upper bound on message length in bytes.
    fn max_message_length(&self) -> usize {
        MAX_MESSAGE_LENGTH
    }

    /// This store's own address.
    fn store_address(&self) -> Address;

    /// Notifications with `sequence >= from`, oldest first.
    async fn events_since(&self, from: u64) -> Vec<StoreEvent>;

    /// Replace the message.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `caller` is not the owner
    /// - `InvalidInput` if `message` is empty or longer than the bound
    async fn set_message(&self, caller: Address, message: String)
        -> Result<StoreEvent, StoreError>;

    /// Hand ownership to `new_owner`.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `caller` is not the owner
    /// - `InvalidInput` if `new_owner` is the zero address
    async fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<StoreEvent, StoreError>;
}
