//! # Integration Test Flows
//!
//! Tests that the message store service and the shared bus work together:
//! every committed write reaches watchers in commit order, and every rejected
//! call leaves both the store and the bus untouched.
//!
//! ## Flows Tested:
//!
//! 1. **Deploy → Bus**: the deployment record is the first event a watcher sees
//! 2. **Write → Bus**: `MessageUpdated` / `OwnershipTransferred` payloads
//! 3. **Rejected write**: nothing published, nothing changed
//! 4. **Filtering**: by topic and by source store across two stores

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    use message_store::prelude::*;
    use shared_bus::{EventPublisher, Subscription};
    use shared_types::{MessageUpdated, OwnershipTransferred};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const DEPLOYED_AT: Timestamp = 1_733_000_000;

    fn owner() -> Address {
        "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap()
    }

    fn addr1() -> Address {
        "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".parse().unwrap()
    }

    fn addr2() -> Address {
        "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc".parse().unwrap()
    }

    /// Deploy a store on `bus` with invariant checks on.
    async fn deploy_on(
        bus: &Arc<InMemoryEventBus>,
        deployer: Address,
        nonce: u64,
    ) -> MessageStoreService<InMemoryEventBus> {
        MessageStoreService::deploy(
            deployer,
            &FixedClock(DEPLOYED_AT),
            Arc::clone(bus),
            ServiceConfig {
                deployer_nonce: nonce,
                enable_invariant_checks: true,
            },
        )
        .await
        .unwrap()
    }

    async fn next(sub: &mut Subscription) -> StoreEvent {
        timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("timed out waiting for event")
            .expect("bus closed")
    }

    // =============================================================================
    // DEPLOYMENT
    // =============================================================================

    #[tokio::test]
    async fn test_deploy_publishes_deployment_record() {
        let bus = Arc::new(InMemoryEventBus::new());
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Lifecycle]));

        let store = deploy_on(&bus, owner(), 0).await;

        let event = next(&mut sub).await;
        assert_eq!(event.sequence, 0);
        assert_eq!(event.store, store.store_address());
        let StoreEventKind::Deployed(deployed) = event.kind else {
            panic!("expected deployment record");
        };
        assert_eq!(deployed.owner, owner());
        assert_eq!(deployed.deployed_at, DEPLOYED_AT);
        assert_eq!(deployed.message, DEFAULT_MESSAGE);
    }

    #[tokio::test]
    async fn test_initial_state() {
        let bus = Arc::new(InMemoryEventBus::new());
        let store = deploy_on(&bus, owner(), 0).await;

        assert_eq!(store.get_message().await, DEFAULT_MESSAGE);
        assert_eq!(store.get_owner().await, owner());
        assert!(store.get_deployed_at().await > 0);

        let info = store.get_info().await;
        assert_eq!(info.message, DEFAULT_MESSAGE);
        assert_eq!(info.owner, owner());
        assert_eq!(info.deployed_at, DEPLOYED_AT);
    }

    // =============================================================================
    // WRITES → BUS
    // =============================================================================

    #[tokio::test]
    async fn test_message_updated_payload() {
        let bus = Arc::new(InMemoryEventBus::new());
        let store = deploy_on(&bus, owner(), 0).await;
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Message]));

        store
            .set_message(owner(), "Updated message".to_string())
            .await
            .unwrap();

        let event = next(&mut sub).await;
        assert_eq!(
            event.kind,
            StoreEventKind::MessageUpdated(MessageUpdated {
                old_message: DEFAULT_MESSAGE.to_string(),
                new_message: "Updated message".to_string(),
                updater: owner(),
            })
        );
    }

    #[tokio::test]
    async fn test_updater_is_new_owner_after_transfer() {
        let bus = Arc::new(InMemoryEventBus::new());
        let store = deploy_on(&bus, owner(), 0).await;
        let mut sub = bus.subscribe(EventFilter::all());

        store.transfer_ownership(owner(), addr1()).await.unwrap();
        store
            .set_message(addr1(), "Message from addr1".to_string())
            .await
            .unwrap();

        let transferred = next(&mut sub).await;
        assert_eq!(
            transferred.kind,
            StoreEventKind::OwnershipTransferred(OwnershipTransferred {
                previous_owner: owner(),
                new_owner: addr1(),
            })
        );

        let updated = next(&mut sub).await;
        assert_eq!(
            updated.kind,
            StoreEventKind::MessageUpdated(MessageUpdated {
                old_message: DEFAULT_MESSAGE.to_string(),
                new_message: "Message from addr1".to_string(),
                updater: addr1(),
            })
        );
        assert_eq!(updated.sequence, transferred.sequence + 1);
    }

    #[tokio::test]
    async fn test_sequential_updates_arrive_in_order() {
        let bus = Arc::new(InMemoryEventBus::new());
        let store = deploy_on(&bus, owner(), 0).await;
        let mut sub = bus.subscribe(EventFilter::all());

        for text in ["First update", "Second update", "Third update"] {
            store.set_message(owner(), text.to_string()).await.unwrap();
            assert_eq!(store.get_message().await, text);
        }

        let received: Vec<String> = sub
            .drain()
            .into_iter()
            .filter_map(|e| match e.kind {
                StoreEventKind::MessageUpdated(m) => Some(m.new_message),
                _ => None,
            })
            .collect();
        assert_eq!(received, ["First update", "Second update", "Third update"]);
        assert_eq!(store.get_deployed_at().await, DEPLOYED_AT);
    }

    #[tokio::test]
    async fn test_identical_writes_each_emit() {
        let bus = Arc::new(InMemoryEventBus::new());
        let store = deploy_on(&bus, owner(), 0).await;
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Message]));

        store.set_message(owner(), "same".to_string()).await.unwrap();
        store.set_message(owner(), "same".to_string()).await.unwrap();

        assert_eq!(sub.drain().len(), 2);
    }

    // =============================================================================
    // REJECTED CALLS
    // =============================================================================

    #[tokio::test]
    async fn test_rejected_calls_publish_nothing() {
        let bus = Arc::new(InMemoryEventBus::new());
        let store = deploy_on(&bus, owner(), 0).await;
        let mut sub = bus.subscribe(EventFilter::all());
        let published_before = bus.events_published();

        let unauthorized = store
            .set_message(addr1(), "Unauthorized message".to_string())
            .await
            .unwrap_err();
        assert_eq!(
            unauthorized,
            StoreError::Unauthorized {
                caller: addr1(),
                owner: owner()
            }
        );

        let empty = store.set_message(owner(), String::new()).await.unwrap_err();
        assert_eq!(empty, StoreError::InvalidInput(InputError::EmptyMessage));

        let long = store
            .set_message(owner(), "a".repeat(257))
            .await
            .unwrap_err();
        assert!(long.to_string().contains("message exceeds maximum length"));

        let zero = store
            .transfer_ownership(owner(), Address::ZERO)
            .await
            .unwrap_err();
        assert_eq!(zero, StoreError::InvalidInput(InputError::ZeroOwner));

        let hijack = store.transfer_ownership(addr1(), addr1()).await.unwrap_err();
        assert!(hijack.is_unauthorized());

        assert!(sub.drain().is_empty());
        assert_eq!(bus.events_published(), published_before);
        assert_eq!(store.get_info().await.message, DEFAULT_MESSAGE);
        assert_eq!(store.get_owner().await, owner());
        assert_eq!(store.events_since(0).await.len(), 1);
    }

    #[tokio::test]
    async fn test_previous_owner_locked_out() {
        let bus = Arc::new(InMemoryEventBus::new());
        let store = deploy_on(&bus, owner(), 0).await;

        store.transfer_ownership(owner(), addr1()).await.unwrap();

        let err = store
            .set_message(owner(), "still mine?".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.rejected_caller(), Some(owner()));
    }

    // =============================================================================
    // READ ACCESS
    // =============================================================================

    #[tokio::test]
    async fn test_anyone_can_read() {
        let bus = Arc::new(InMemoryEventBus::new());
        let store = deploy_on(&bus, owner(), 0).await;

        for reader in [owner(), addr1(), addr2(), Address::ZERO] {
            let result = store.handle_call(reader, StoreCall::GetInfo).await.unwrap();
            assert_eq!(
                result,
                StoreCallResult::Info(StoreInfo {
                    message: DEFAULT_MESSAGE.to_string(),
                    owner: owner(),
                    deployed_at: DEPLOYED_AT,
                })
            );

            let result = store
                .handle_call(reader, StoreCall::MaxMessageLength)
                .await
                .unwrap();
            assert_eq!(result, StoreCallResult::MaxMessageLength(MAX_MESSAGE_LENGTH));
        }
    }

    // =============================================================================
    // FILTERING ACROSS STORES
    // =============================================================================

    #[tokio::test]
    async fn test_filter_by_store() {
        let bus = Arc::new(InMemoryEventBus::new());
        let first = deploy_on(&bus, owner(), 0).await;
        let second = deploy_on(&bus, owner(), 1).await;
        assert_ne!(first.store_address(), second.store_address());

        let mut only_second = bus.event_stream(EventFilter::for_store(second.store_address()));

        first.set_message(owner(), "to first".to_string()).await.unwrap();
        second.set_message(owner(), "to second".to_string()).await.unwrap();

        let event = timeout(Duration::from_secs(1), only_second.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.store, second.store_address());
        assert!(matches!(
            event.kind,
            StoreEventKind::MessageUpdated(ref m) if m.new_message == "to second"
        ));
    }

    #[tokio::test]
    async fn test_store_and_topic_filter_combined() {
        let bus = Arc::new(InMemoryEventBus::new());
        let store = deploy_on(&bus, owner(), 0).await;
        let mut ownership = bus.subscribe(
            EventFilter::for_store(store.store_address())
                .with_topics(vec![EventTopic::Ownership]),
        );

        store.set_message(owner(), "noise".to_string()).await.unwrap();
        store.transfer_ownership(owner(), addr2()).await.unwrap();

        let event = next(&mut ownership).await;
        assert_eq!(event.topic(), EventTopic::Ownership);
        assert!(ownership.drain().is_empty());
    }

    // =============================================================================
    // CONCURRENCY
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_and_readers() {
        let bus = Arc::new(InMemoryEventBus::new());
        let store = Arc::new(deploy_on(&bus, owner(), 0).await);
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Message]));

        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                // Half the writers are not the owner
                let caller = if i % 2 == 0 { owner() } else { addr1() };
                let _ = store.set_message(caller, format!("write {i}")).await;
                store.get_message().await
            }));
        }
        for task in tasks {
            let observed = task.await.unwrap();
            assert!(!observed.is_empty());
        }

        let events = sub.drain();
        assert_eq!(events.len(), 8);

        // Commit order is a chain: each old value is the previous new value
        let mut current = DEFAULT_MESSAGE.to_string();
        for event in &events {
            let StoreEventKind::MessageUpdated(m) = &event.kind else {
                panic!("unexpected {event:?}");
            };
            assert_eq!(m.old_message, current);
            assert_eq!(m.updater, owner());
            current = m.new_message.clone();
        }
        assert_eq!(store.get_message().await, current);

        let stats = store.stats().await;
        assert_eq!(stats.writes_committed, 8);
        assert_eq!(stats.rejected_unauthorized, 8);
    }
}
