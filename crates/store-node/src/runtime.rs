//! # Store Node Runtime
//!
//! Wires one message store to an in-memory event bus and drives it from a
//! line-oriented JSON transport.
//!
//! ## Startup Sequence
//!
//! 1. Validate configuration
//! 2. Create the event bus
//! 3. Subscribe the notification watcher (so it sees the deployment record)
//! 4. Deploy the store
//! 5. Start the watcher task
//! 6. Serve calls until input ends or shutdown is signalled
//!
//! ## Watcher Guarantees
//!
//! The watcher logs every notification of the node's store exactly once, in
//! sequence order. If it falls more than the bus capacity behind, it replays
//! the gap from the store's own log. On shutdown it drains everything
//! already buffered before exiting.

use crate::config::{ConfigError, NodeConfig};
use message_store::prelude::*;
use shared_bus::{EventPublisher, EventSubscriber, Subscription};
use std::sync::Arc;
use store_telemetry::{encode_metrics, TelemetryError};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Errors raised while bringing a node up or serving calls.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The store refused to deploy.
    #[error("deploy failed: {0}")]
    Deploy(#[from] StoreError),

    /// Reading calls or writing responses failed.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Metrics could not be gathered.
    #[error("metrics error: {0}")]
    Metrics(#[from] TelemetryError),
}

/// A running store node.
pub struct StoreNode {
    /// The store.
    service: Arc<MessageStoreService<InMemoryEventBus>>,
    /// Notification bus shared with watchers.
    bus: Arc<InMemoryEventBus>,
    /// Notification watcher task, yielding how many notifications it logged.
    watcher: JoinHandle<u64>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
}

impl StoreNode {
    /// Validate `config`, deploy the store and start the watcher.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the configuration is invalid or the deploy is
    /// rejected.
    pub async fn start(config: &NodeConfig, clock: &dyn Clock) -> Result<Self, NodeError> {
        config.validate()?;

        let bus = Arc::new(InMemoryEventBus::with_capacity(config.bus_capacity));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let store = compute_store_address(config.deployer, config.deployer_nonce);
        let subscription = subscribe_watcher(bus.as_ref(), store);

        let service = Arc::new(
            MessageStoreService::deploy(
                config.deployer,
                clock,
                Arc::clone(&bus),
                ServiceConfig {
                    deployer_nonce: config.deployer_nonce,
                    ..ServiceConfig::default()
                },
            )
            .await?,
        );

        let watcher = spawn_watcher(subscription, Arc::clone(&service), shutdown_rx);

        info!(
            chain_id = config.chain_id,
            store = %service.store_address(),
            owner = %config.deployer,
            bus_capacity = config.bus_capacity,
            "Store node ready"
        );

        Ok(Self {
            service,
            bus,
            watcher,
            shutdown_tx,
        })
    }

    /// The deployed store.
    #[must_use]
    pub fn service(&self) -> Arc<MessageStoreService<InMemoryEventBus>> {
        Arc::clone(&self.service)
    }

    /// The notification bus.
    #[must_use]
    pub fn bus(&self) -> Arc<InMemoryEventBus> {
        Arc::clone(&self.bus)
    }

    /// Handle one input line.
    ///
    /// Returns `None` for blank lines.
    pub async fn handle_line(&self, line: &str) -> Option<CallResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response: CallResponse = match serde_json::from_str::<CallRequest>(line) {
            Ok(request) => self
                .service
                .handle_call(request.caller, request.call)
                .await
                .into(),
            Err(e) => {
                debug!(error = %e, "Malformed call");
                CallResponse::malformed(e.to_string())
            }
        };
        Some(response)
    }

    /// Serve calls from `reader`, one JSON object per line, writing one JSON
    /// response per line to `writer`. Returns when `reader` is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `Err` if reading, encoding or writing fails.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<u64, NodeError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut served = 0u64;

        while let Some(line) = lines.next_line().await? {
            let Some(response) = self.handle_line(&line).await else {
                continue;
            };

            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
            served += 1;
        }

        Ok(served)
    }

    /// Stop the watcher and log final statistics.
    ///
    /// Every notification committed before this call is logged before the
    /// watcher exits. Returns how many notifications the watcher logged.
    pub async fn shutdown(self) -> u64 {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
        let watched = match self.watcher.await {
            Ok(watched) => watched,
            Err(e) => {
                error!("Watcher task failed: {}", e);
                0
            }
        };

        let stats = self.service.stats().await;
        info!(
            reads = stats.reads_served,
            writes = stats.writes_committed,
            rejected_unauthorized = stats.rejected_unauthorized,
            rejected_invalid_input = stats.rejected_invalid_input,
            published = self.bus.events_published(),
            watched,
            "Shutdown complete"
        );
        watched
    }
}

/// Prometheus text exposition of the store counters.
///
/// Empty unless the collectors were registered, which `init_telemetry` does
/// when metrics are enabled.
///
/// # Errors
///
/// Returns `Err` if the registry cannot be encoded.
pub fn render_metrics() -> Result<String, NodeError> {
    Ok(encode_metrics()?)
}

// =============================================================================
// NOTIFICATION WATCHER
// =============================================================================

fn subscribe_watcher(bus: &dyn EventSubscriber, store: Address) -> Subscription {
    bus.subscribe(EventFilter::for_store(store))
}

/// Log every notification until shutdown, then drain what is buffered.
fn spawn_watcher(
    mut subscription: Subscription,
    service: Arc<MessageStoreService<InMemoryEventBus>>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<u64> {
    tokio::spawn(async move {
        let mut watcher = Watcher {
            service,
            next_sequence: 0,
            logged: 0,
        };

        loop {
            tokio::select! {
                biased;
                next = subscription.recv() => match next {
                    Some(event) => watcher.observe(event).await,
                    None => return watcher.logged,
                },
                _ = shutdown.changed() => {
                    debug!("Watcher shutdown signal received");
                    break;
                }
            }
        }

        // Writes publish before they return, so everything committed before
        // shutdown is already in the buffer
        for event in subscription.drain() {
            watcher.observe(event).await;
        }
        watcher.logged
    })
}

/// Logs one store's notifications in sequence order.
struct Watcher {
    service: Arc<MessageStoreService<InMemoryEventBus>>,
    /// Sequence number of the next notification to log.
    next_sequence: u64,
    logged: u64,
}

impl Watcher {
    async fn observe(&mut self, event: StoreEvent) {
        if event.sequence < self.next_sequence {
            return;
        }

        if event.sequence > self.next_sequence {
            warn!(
                from = self.next_sequence,
                to = event.sequence,
                missed = event.sequence - self.next_sequence,
                "Watcher fell behind, replaying from store log"
            );
            let replay = self.service.events_since(self.next_sequence).await;
            for missed in replay.iter().take_while(|e| e.sequence < event.sequence) {
                self.log(missed);
            }
        }

        self.log(&event);
    }

    fn log(&mut self, event: &StoreEvent) {
        log_event(event);
        self.logged += 1;
        self.next_sequence = event.sequence + 1;
    }
}

fn log_event(event: &StoreEvent) {
    match &event.kind {
        StoreEventKind::Deployed(d) => info!(
            seq = event.sequence,
            store = %d.store,
            owner = %d.owner,
            deployed_at = d.deployed_at,
            "StoreDeployed"
        ),
        StoreEventKind::MessageUpdated(m) => info!(
            seq = event.sequence,
            store = %event.store,
            updater = %m.updater,
            old = %m.old_message,
            new = %m.new_message,
            "MessageUpdated"
        ),
        StoreEventKind::OwnershipTransferred(t) => info!(
            seq = event.sequence,
            store = %event.store,
            previous_owner = %t.previous_owner,
            new_owner = %t.new_owner,
            "OwnershipTransferred"
        ),
    }
}
