//! Outbound ports (SPI) for the Peer Discovery subsystem.

use async_trait::async_trait;
use shared_types::{PeerAddress, TopicHash};

use crate::events::DiscoveryError;

/// A source of peers keyed by topic (static list, LAN beacons, a DHT...).
///
/// # Thread Safety
///
/// Shared between the poller and the runtime, so `Send + Sync`.
#[async_trait]
pub trait DiscoverySubstrate: Send + Sync {
    /// Advertise that this node participates in `topic`.
    async fn announce(&self, topic: TopicHash) -> Result<(), DiscoveryError>;

    /// Currently known participants of `topic`.
    async fn lookup_peers(&self, topic: TopicHash) -> Result<Vec<PeerAddress>, DiscoveryError>;
}

/// Consumer of discovered peers; the runtime implements this over the room
/// registry.
pub trait PeerSink: Send + Sync {
    /// Topics to look up.
    fn joined_topics(&self) -> Vec<TopicHash>;

    /// Hand discovered peers for `topic` to their room.
    fn offer_peers(&self, topic: TopicHash, peers: Vec<PeerAddress>);
}
