//! # Store Node Flows
//!
//! Drives an in-process store node through its JSON-lines transport, the
//! same way the binary does with stdin and stdout.

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tokio::io::BufReader;
    use tokio::time::timeout;

    use message_store::prelude::*;
    use serde_json::{json, Value};
    use store_node::{NodeConfig, StoreNode};

    const OWNER: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
    const ADDR1: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

    fn call(caller: &str, call: Value) -> String {
        json!({ "caller": caller, "call": call }).to_string()
    }

    /// Feed `lines` to a fresh node and collect the responses.
    async fn run(lines: &[String]) -> Vec<Value> {
        let node = StoreNode::start(&NodeConfig::default(), &FixedClock(1_733_000_000))
            .await
            .unwrap();

        let input = lines.join("\n");
        let mut output = Vec::new();
        node.serve(BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();
        node.shutdown().await;

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_ownership_handover_session() {
        let responses = run(&[
            call(OWNER, json!({ "type": "get_owner" })),
            call(OWNER, json!({ "type": "transfer_ownership", "new_owner": ADDR1 })),
            call(OWNER, json!({ "type": "set_message", "message": "too late" })),
            call(ADDR1, json!({ "type": "set_message", "message": "Message from new owner" })),
            call(ADDR1, json!({ "type": "get_info" })),
        ])
        .await;

        assert_eq!(responses.len(), 5);
        assert_eq!(responses[0], json!({ "ok": OWNER }));

        let transferred = &responses[1]["ok"];
        assert_eq!(transferred["sequence"], 1);
        assert_eq!(transferred["kind"]["event"], "OwnershipTransferred");
        assert_eq!(transferred["kind"]["payload"]["previous_owner"], OWNER);
        assert_eq!(transferred["kind"]["payload"]["new_owner"], ADDR1);

        assert_eq!(responses[2]["kind"], "unauthorized");
        assert!(responses[2].get("ok").is_none());

        let updated = &responses[3]["ok"]["kind"];
        assert_eq!(updated["event"], "MessageUpdated");
        assert_eq!(updated["payload"]["old_message"], DEFAULT_MESSAGE);
        assert_eq!(updated["payload"]["updater"], ADDR1);

        assert_eq!(
            responses[4],
            json!({
                "ok": {
                    "message": "Message from new owner",
                    "owner": ADDR1,
                    "deployed_at": 1_733_000_000u64,
                }
            })
        );
    }

    #[tokio::test]
    async fn test_input_validation_over_the_wire() {
        let responses = run(&[
            call(OWNER, json!({ "type": "set_message", "message": "" })),
            call(OWNER, json!({ "type": "set_message", "message": "a".repeat(257) })),
            call(OWNER, json!({ "type": "set_message", "message": "a".repeat(256) })),
            call(
                OWNER,
                json!({
                    "type": "transfer_ownership",
                    "new_owner": "0x0000000000000000000000000000000000000000"
                }),
            ),
            call(OWNER, json!({ "type": "get_message" })),
        ])
        .await;

        assert_eq!(responses[0]["kind"], "invalid_input");
        assert_eq!(
            responses[0]["error"],
            "invalid input: message cannot be empty"
        );
        assert_eq!(responses[1]["kind"], "invalid_input");
        assert!(responses[2].get("ok").is_some());
        assert_eq!(responses[3]["kind"], "invalid_input");
        assert_eq!(responses[4]["ok"], "a".repeat(256));
    }

    #[tokio::test]
    async fn test_malformed_lines_do_not_stop_the_node() {
        let responses = run(&[
            "not json".to_string(),
            call("0x1234", json!({ "type": "get_message" })),
            call(OWNER, json!({ "type": "renounce_ownership" })),
            String::new(),
            call(OWNER, json!({ "type": "max_message_length" })),
        ])
        .await;

        // The blank line produces no response
        assert_eq!(responses.len(), 4);
        assert_eq!(responses[0]["kind"], "malformed");
        assert_eq!(responses[1]["kind"], "malformed");
        assert_eq!(responses[2]["kind"], "malformed");
        assert_eq!(responses[3], json!({ "ok": 256 }));
    }

    #[tokio::test]
    async fn test_external_watcher_sees_node_writes() {
        let node = StoreNode::start(&NodeConfig::default(), &FixedClock(1))
            .await
            .unwrap();
        let mut sub = node.bus().subscribe(EventFilter::for_store(
            node.service().store_address(),
        ));

        let line = call(OWNER, json!({ "type": "set_message", "message": "watched" }));
        let response = node.handle_line(&line).await.unwrap();
        assert!(response.is_ok());

        let event = timeout(Duration::from_secs(1), sub.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            event.kind,
            StoreEventKind::MessageUpdated(ref m) if m.new_message == "watched"
        ));

        node.shutdown().await;
    }
}
