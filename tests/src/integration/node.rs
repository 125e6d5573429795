//! # Full Node Flow
//!
//! Two `NodeRuntime`s on loopback. Node A is configured with B as bootstrap
//! peer; the discovery poller hands B to A's room, gossip carries A's
//! message to B, and B answers once it has learned A.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gc_02_room_gossip::RoomRegistryApi;
    use node_runtime::{NodeConfig, NodeRuntime};

    fn fast_config(name: &str) -> NodeConfig {
        let mut config = NodeConfig::default();
        config.network.bind_addr = "127.0.0.1".parse().unwrap();
        config.network.listen_port = 0;
        config.chat.display_name = name.to_string();
        config.gossip.gossip_interval_secs = 1;
        config.discovery.poll_interval_secs = 1;
        config
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_bootstrap_peer_receives_and_replies() {
        let b = NodeRuntime::new(fast_config("deviceB")).unwrap();
        let topic = b.start();
        let b_addr = b.container().local_addr().unwrap();

        let mut a_config = fast_config("deviceA");
        a_config.network.bootstrap_peers = vec![b_addr.to_string()];
        let a = NodeRuntime::new(a_config).unwrap();
        assert_eq!(a.start(), topic);

        let a_registry = a.container().registry.clone();
        let b_registry = b.container().registry.clone();
        a_registry.post(topic, "ping").unwrap();

        let b_room = b_registry.room(&topic).unwrap();
        let mut received = false;
        for _ in 0..100 {
            if b_room.history_len() == 1 {
                received = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(received, "B received A's message");

        b_registry.post(topic, "pong").unwrap();
        let a_room = a_registry.room(&topic).unwrap();
        let mut replied = false;
        for _ in 0..100 {
            if a_room.history_len() == 2 {
                replied = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(replied, "A received B's reply");

        let texts: Vec<String> = a_room
            .history_snapshot()
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert!(texts.contains(&"ping".to_string()));
        assert!(texts.contains(&"pong".to_string()));

        a.shutdown();
        b.shutdown();
    }
}
