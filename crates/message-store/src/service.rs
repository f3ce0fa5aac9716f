//! # Message Store Service
//!
//! Async service that owns one [`MessageStore`], serializes its writes and
//! publishes every committed notification to the event bus.
//!
//! ## Ordering
//!
//! A write holds the store's write lock across validation, mutation, log
//! append and publish. Two writes can therefore never interleave, and bus
//! order equals commit order. Reads take the read lock and always see the
//! last committed write.

use crate::calls::{StoreCall, StoreCallResult};
use crate::domain::entities::MessageStore;
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::value_objects::StoreInfo;
use crate::errors::StoreError;
use crate::metrics;
use crate::ports::inbound::MessageStoreApi;
use crate::ports::outbound::Clock;
use async_trait::async_trait;
use shared_bus::{EventPublisher, StoreEvent};
use shared_types::{Address, Timestamp};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Message store service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Deployer's account nonce, used to derive the store address.
    pub deployer_nonce: u64,
    /// Run invariant checks after every committed write.
    pub enable_invariant_checks: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            deployer_nonce: 0,
            enable_invariant_checks: cfg!(debug_assertions),
        }
    }
}

/// Statistics for the message store service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Read calls served.
    pub reads_served: u64,
    /// Writes that committed.
    pub writes_committed: u64,
    /// Writes rejected because the caller was not the owner.
    pub rejected_unauthorized: u64,
    /// Writes rejected for invalid input.
    pub rejected_invalid_input: u64,
    /// Notifications handed to the bus, including the deployment record.
    pub events_published: u64,
}

/// The message store service.
pub struct MessageStoreService<P: EventPublisher> {
    /// Service configuration.
    config: ServiceConfig,
    /// Immutable after deploy; kept outside the lock.
    address: Address,
    /// The store itself.
    store: RwLock<MessageStore>,
    /// Notification sink.
    publisher: Arc<P>,
    /// Service statistics.
    stats: RwLock<ServiceStats>,
}

impl<P: EventPublisher> MessageStoreService<P> {
    /// Deploy a new store owned by `deployer` and publish its deployment
    /// record.
    ///
    /// # Errors
    ///
    /// `InvalidInput(ZeroOwner)` if `deployer` is the zero address.
    #[instrument(skip_all, fields(deployer = %deployer.short()))]
    pub async fn deploy(
        deployer: Address,
        clock: &dyn Clock,
        publisher: Arc<P>,
        config: ServiceConfig,
    ) -> Result<Self, StoreError> {
        let store = MessageStore::deploy(deployer, config.deployer_nonce, clock.now())?;
        let address = store.address();
        let deployed = store.events()[0].clone();

        info!(
            store = %address,
            owner = %deployer,
            deployed_at = store.deployed_at(),
            "Message store deployed"
        );

        publisher.publish(deployed).await;
        metrics::record_published();

        Ok(Self {
            config,
            address,
            store: RwLock::new(store),
            publisher,
            stats: RwLock::new(ServiceStats {
                events_published: 1,
                ..ServiceStats::default()
            }),
        })
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// The configuration this service was deployed with.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Dispatch one call.
    ///
    /// # Errors
    ///
    /// Whatever the underlying operation returns.
    pub async fn handle_call(
        &self,
        caller: Address,
        call: StoreCall,
    ) -> Result<StoreCallResult, StoreError> {
        debug!(caller = %caller.short(), operation = call.operation(), "Handling call");

        let result = match call {
            StoreCall::GetMessage => StoreCallResult::Message(self.get_message().await),
            StoreCall::GetOwner => StoreCallResult::Owner(self.get_owner().await),
            StoreCall::GetDeployedAt => {
                StoreCallResult::DeployedAt(self.get_deployed_at().await)
            }
            StoreCall::GetInfo => StoreCallResult::Info(self.get_info().await),
            StoreCall::MaxMessageLength => {
                self.record_read().await;
                StoreCallResult::MaxMessageLength(self.max_message_length())
            }
            StoreCall::SetMessage { message } => {
                StoreCallResult::Event(self.set_message(caller, message).await?)
            }
            StoreCall::TransferOwnership { new_owner } => {
                StoreCallResult::Event(self.transfer_ownership(caller, new_owner).await?)
            }
        };

        Ok(result)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    async fn record_read(&self) {
        self.stats.write().await.reads_served += 1;
        metrics::record_read();
    }

    /// Run `apply` under the write lock and publish its notification before
    /// releasing the lock.
    async fn commit<F>(
        &self,
        operation: &'static str,
        caller: Address,
        apply: F,
    ) -> Result<StoreEvent, StoreError>
    where
        F: FnOnce(&mut MessageStore) -> Result<StoreEvent, StoreError> + Send,
    {
        let mut store = self.store.write().await;

        let event = match apply(&mut *store) {
            Ok(event) => event,
            Err(err) => {
                drop(store);
                warn!(
                    operation,
                    caller = %caller,
                    kind = err.kind(),
                    error = %err,
                    "Call rejected"
                );
                metrics::record_rejection(operation, err.kind());
                let mut stats = self.stats.write().await;
                if err.is_unauthorized() {
                    stats.rejected_unauthorized += 1;
                } else {
                    stats.rejected_invalid_input += 1;
                }
                return Err(err);
            }
        };

        if self.config.enable_invariant_checks {
            if let InvariantCheckResult::Invalid(violations) = check_all_invariants(&*store) {
                for violation in &violations {
                    error!(store = %self.address, %violation, "Invariant violated after write");
                }
            }
        }

        let receivers = self.publisher.publish(event.clone()).await;
        drop(store);

        info!(
            operation,
            store = %self.address,
            sequence = event.sequence,
            receivers,
            "Write committed"
        );
        metrics::record_write(operation);
        metrics::record_published();

        let mut stats = self.stats.write().await;
        stats.writes_committed += 1;
        stats.events_published += 1;

        Ok(event)
    }
}

#[async_trait]
impl<P: EventPublisher> MessageStoreApi for MessageStoreService<P> {
    async fn get_message(&self) -> String {
        self.record_read().await;
        self.store.read().await.message().to_string()
    }

    async fn get_owner(&self) -> Address {
        self.record_read().await;
        self.store.read().await.owner()
    }

    async fn get_deployed_at(&self) -> Timestamp {
        self.record_read().await;
        self.store.read().await.deployed_at()
    }

    async fn get_info(&self) -> StoreInfo {
        self.record_read().await;
        self.store.read().await.info()
    }

    fn store_address(&self) -> Address {
        self.address
    }

    async fn events_since(&self, from: u64) -> Vec<StoreEvent> {
        self.store.read().await.events_since(from).to_vec()
    }

    #[instrument(skip_all, fields(caller = %caller.short(), len = message.len()))]
    async fn set_message(&self, caller: Address, message: String) -> Result<StoreEvent, StoreError> {
        self.commit("set_message", caller, move |store| {
            store.set_message(caller, &message)
        })
        .await
    }

    #[instrument(skip_all, fields(caller = %caller.short(), new_owner = %new_owner.short()))]
    async fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<StoreEvent, StoreError> {
        self.commit("transfer_ownership", caller, move |store| {
            store.transfer_ownership(caller, new_owner)
        })
        .await
    }
}

// =============================================================================
// TESTS
// =============================================================================
