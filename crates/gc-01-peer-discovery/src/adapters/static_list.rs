use async_trait::async_trait;
use shared_types::{PeerAddress, TopicHash};

use crate::events::DiscoveryError;
use crate::ports::DiscoverySubstrate;

/// Configured bootstrap peers, returned for every topic.
///
/// Announcing is a no-op: the list is the whole network view.
#[derive(Debug, Clone, Default)]
pub struct StaticSubstrate {
    peers: Vec<PeerAddress>,
}

impl StaticSubstrate {
    #[must_use]
    pub fn new(peers: Vec<PeerAddress>) -> Self {
        let mut peers = peers;
        peers.sort();
        peers.dedup();
        Self { peers }
    }

    pub fn peers(&self) -> &[PeerAddress] {
        &self.peers
    }
}

#[async_trait]
impl DiscoverySubstrate for StaticSubstrate {
    async fn announce(&self, _topic: TopicHash) -> Result<(), DiscoveryError> {
        Ok(())
    }

    async fn lookup_peers(&self, _topic: TopicHash) -> Result<Vec<PeerAddress>, DiscoveryError> {
        Ok(self.peers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_peers_for_every_topic() {
        let a: PeerAddress = "10.0.0.2:3301".parse().unwrap();
        let b: PeerAddress = "10.0.0.3:3301".parse().unwrap();
        let substrate = StaticSubstrate::new(vec![b, a, b]);

        for room in ["alpha", "beta"] {
            let peers = substrate
                .lookup_peers(TopicHash::from_room_name(room))
                .await
                .unwrap();
            assert_eq!(peers, vec![a, b]);
        }
    }
}
