//! # Node Runtime
//!
//! Starts the subsystem tasks and tears them down on shutdown.
//!
//! ## Tasks
//!
//! - listener: one receive loop on the chat socket
//! - room workers: one per joined room (started by `join`)
//! - discovery poller
//! - console handler (optional; tests run without one)

use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use shared_types::TopicHash;
use tokio::task::JoinHandle;
use tracing::info;

use gc_02_room_gossip::{run_listener, RoomRegistryApi};

use crate::container::{NodeConfig, SubsystemContainer};
use crate::handlers::ConsoleHandler;

/// The chat node.
pub struct NodeRuntime {
    container: Arc<SubsystemContainer>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl NodeRuntime {
    /// Bind sockets and wire subsystems. Nothing runs until [`start`](Self::start).
    pub fn new(config: NodeConfig) -> Result<Self> {
        Ok(Self {
            container: Arc::new(SubsystemContainer::new(config)?),
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Start the listener and poller and join the configured room.
    ///
    /// Returns the topic of the joined room.
    pub fn start(&self) -> TopicHash {
        let container = &self.container;
        let config = &container.config;

        info!("===========================================");
        info!("  Gossip-Chat Node v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let listener = tokio::spawn(run_listener(
            Arc::clone(&container.transport),
            Arc::clone(&container.registry),
        ));

        let topic = container.registry.join(&config.chat.room);

        let poller = tokio::spawn(Arc::clone(&container.poller).run());
        self.tasks.lock().extend([listener, poller]);

        info!("Author:    {}", container.registry.author());
        info!("Room:      {} ({})", config.chat.room, topic);
        info!("Peer port: {}", config.network.peer_port);
        if config.network.lan_discovery {
            info!("LAN discovery on port {}", config.network.discovery_port);
        }

        topic
    }

    /// Post stdin lines into `topic` until input closes.
    pub fn attach_console(&self, topic: TopicHash) {
        let console = ConsoleHandler::new(Arc::clone(&self.container.registry), topic);
        let handle = tokio::spawn(async move {
            console.run_stdin().await;
        });
        self.tasks.lock().push(handle);
    }

    /// Abort every task. Pending queue contents are dropped.
    pub fn shutdown(&self) {
        info!("Shutting down...");

        for handle in self.tasks.lock().drain(..) {
            handle.abort();
        }
        if let Some(lan) = &self.container.lan {
            lan.shutdown();
        }
        self.container.registry.shutdown();

        info!("Shutdown complete");
    }

    pub fn container(&self) -> Arc<SubsystemContainer> {
        Arc::clone(&self.container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gc_02_room_gossip::wire;
    use shared_types::{Author, ChatMessage, PeerAddress, Timestamp};
    use std::time::Duration;
    use tokio::net::UdpSocket;

    fn test_config() -> NodeConfig {
        let mut config = NodeConfig::default();
        config.network.bind_addr = "127.0.0.1".parse().unwrap();
        config.network.listen_port = 0;
        config
    }

    #[tokio::test]
    async fn test_node_receives_and_learns_sender() {
        let runtime = NodeRuntime::new(test_config()).unwrap();
        let topic = runtime.start();
        let container = runtime.container();
        let node_addr = container.local_addr().unwrap();

        let remote = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let remote_addr = PeerAddress::from(remote.local_addr().unwrap());
        let message = ChatMessage::new(
            topic,
            1,
            Author::new("deviceB").unwrap(),
            Timestamp::now(),
            "hello",
        );
        remote.send_to(&wire::encode(&message), node_addr).await.unwrap();

        let room = container.registry.room(&topic).unwrap();
        for _ in 0..100 {
            if room.has_peer(&remote_addr) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(room.has_peer(&remote_addr));
        assert!(room.contains(&message.key()));

        runtime.shutdown();
    }

    #[tokio::test]
    async fn test_start_joins_configured_room() {
        let mut config = test_config();
        config.chat.room = "alpha".into();
        let runtime = NodeRuntime::new(config).unwrap();

        let topic = runtime.start();
        assert_eq!(topic, TopicHash::from_room_name("alpha"));
        assert_eq!(runtime.container().registry.joined_topics(), vec![topic]);

        runtime.shutdown();
    }
}
