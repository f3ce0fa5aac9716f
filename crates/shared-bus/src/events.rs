//! # Store Events
//!
//! Defines the event envelope that flows through the shared bus. The payloads
//! themselves live in `shared-types/src/notifications.rs`.

use serde::{Deserialize, Serialize};
use shared_types::{Address, MessageUpdated, OwnershipTransferred, StoreDeployed};

/// A notification emitted by one store instance.
///
/// `sequence` starts at 0 with the deployment record and increases by one for
/// every committed write, so a watcher can detect gaps after lagging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEvent {
    /// The store that emitted this event.
    pub store: Address,
    /// Position in the store's notification log.
    pub sequence: u64,
    /// What happened.
    pub kind: StoreEventKind,
}

/// All notification kinds a store can emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum StoreEventKind {
    /// The store was created.
    Deployed(StoreDeployed),
    /// The message was replaced by the owner.
    MessageUpdated(MessageUpdated),
    /// Ownership moved to a new identity.
    OwnershipTransferred(OwnershipTransferred),
}

impl StoreEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self.kind {
            StoreEventKind::Deployed(_) => EventTopic::Lifecycle,
            StoreEventKind::MessageUpdated(_) => EventTopic::Message,
            StoreEventKind::OwnershipTransferred(_) => EventTopic::Ownership,
        }
    }

    /// Get the originating store address.
    #[must_use]
    pub fn source_store(&self) -> Address {
        self.store
    }

    /// Short event name for log lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self.kind {
            StoreEventKind::Deployed(_) => "StoreDeployed",
            StoreEventKind::MessageUpdated(_) => "MessageUpdated",
            StoreEventKind::OwnershipTransferred(_) => "OwnershipTransferred",
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Store creation.
    Lifecycle,
    /// Message writes.
    Message,
    /// Ownership changes.
    Ownership,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Source stores to include. Empty means all stores.
    pub stores: Vec<Address>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            stores: Vec::new(),
        }
    }

    /// Create a filter for events from one store.
    #[must_use]
    pub fn for_store(store: Address) -> Self {
        Self {
            topics: Vec::new(),
            stores: vec![store],
        }
    }

    /// Narrow an existing filter to the given topics.
    #[must_use]
    pub fn with_topics(mut self, topics: Vec<EventTopic>) -> Self {
        self.topics = topics;
        self
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &StoreEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let store_match = self.stores.is_empty() || self.stores.contains(&event.source_store());

        topic_match && store_match
    }
}
