//! # Registry Convergence
//!
//! Two room registries on loopback UDP, each with its own listener, exchange
//! history until both hold the same entries. Only one side is told about
//! the other; the second learns the first from inbound datagrams.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use gc_02_room_gossip::{
        run_listener, GossipConfig, RoomRegistry, RoomRegistryApi, SystemTimeSource,
        UdpTransport,
    };
    use shared_types::{Author, PeerAddress, TopicHash};

    type Registry = RoomRegistry<UdpTransport, SystemTimeSource>;

    struct TestNode {
        registry: Arc<Registry>,
        addr: PeerAddress,
        listener: tokio::task::JoinHandle<()>,
    }

    impl TestNode {
        fn start(name: &str) -> Self {
            let transport = Arc::new(UdpTransport::bind("127.0.0.1:0".parse().unwrap()).unwrap());
            let addr = PeerAddress::from(transport.local_addr().unwrap());
            let config = GossipConfig {
                gossip_interval_secs: 1,
                ..Default::default()
            };
            let registry = Arc::new(RoomRegistry::new(
                config,
                Author::new(name).unwrap(),
                Arc::clone(&transport),
                Arc::new(SystemTimeSource::new()),
            ));
            let listener = tokio::spawn(run_listener(transport, Arc::clone(&registry)));
            Self {
                registry,
                addr,
                listener,
            }
        }

        fn history_len(&self, topic: &TopicHash) -> usize {
            self.registry
                .room(topic)
                .map(|room| room.history_len())
                .unwrap_or(0)
        }

        fn stop(self) {
            self.listener.abort();
            self.registry.shutdown();
        }
    }

    async fn wait_until<F: Fn() -> bool>(condition: F) -> bool {
        for _ in 0..100 {
            if condition() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        condition()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_two_nodes_converge() {
        let a = TestNode::start("deviceA");
        let b = TestNode::start("deviceB");
        let topic = a.registry.join("chatik");
        assert_eq!(b.registry.join("chatik"), topic);

        a.registry.offer_peers(topic, vec![b.addr]).unwrap();
        a.registry.post(topic, "hello from A").unwrap();
        b.registry.post(topic, "hello from B").unwrap();

        assert!(wait_until(|| a.history_len(&topic) == 2 && b.history_len(&topic) == 2).await);

        let a_room = a.registry.room(&topic).unwrap();
        let b_room = b.registry.room(&topic).unwrap();
        assert_eq!(a_room.history_snapshot(), b_room.history_snapshot());
        assert!(b_room.has_peer(&a.addr), "B learned A from inbound traffic");

        a.stop();
        b.stop();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_rooms_stay_isolated_across_nodes() {
        let a = TestNode::start("deviceA");
        let b = TestNode::start("deviceB");
        let alpha = a.registry.join("alpha");
        let beta = a.registry.join("beta");
        b.registry.join("alpha");

        a.registry.offer_peers(alpha, vec![b.addr]).unwrap();
        a.registry.offer_peers(beta, vec![b.addr]).unwrap();
        a.registry.post(alpha, "for alpha").unwrap();
        a.registry.post(beta, "for beta").unwrap();

        assert!(wait_until(|| b.history_len(&alpha) == 1).await);
        // Give beta gossip a few more ticks to (not) arrive.
        tokio::time::sleep(Duration::from_secs(2)).await;

        let b_alpha = b.registry.room(&alpha).unwrap();
        assert_eq!(b_alpha.history_len(), 1);
        assert_eq!(b_alpha.history_snapshot()[0].text, "for alpha");
        assert!(b.registry.room(&beta).is_none());

        a.stop();
        b.stop();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_redelivery_does_not_grow_history() {
        let a = TestNode::start("deviceA");
        let b = TestNode::start("deviceB");
        let topic = a.registry.join("chatik");
        b.registry.join("chatik");

        a.registry.offer_peers(topic, vec![b.addr]).unwrap();
        a.registry.post(topic, "once").unwrap();

        assert!(wait_until(|| b.history_len(&topic) == 1).await);
        // Several more ticks re-send the same entry.
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(b.history_len(&topic), 1);

        a.stop();
        b.stop();
    }
}
