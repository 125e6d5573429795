//! Glue between peer discovery (gc-01) and room gossip (gc-02).

use async_trait::async_trait;
use shared_types::{PeerAddress, TopicHash};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

use gc_01_peer_discovery::{DiscoveryError, DiscoverySubstrate, PeerSink};
use gc_02_room_gossip::RoomRegistryApi;

/// Feeds discovered peers into room intakes.
pub struct RegistryPeerSink<R: ?Sized> {
    registry: Arc<R>,
}

impl<R: RoomRegistryApi + ?Sized> RegistryPeerSink<R> {
    pub fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }
}

impl<R: RoomRegistryApi + ?Sized> PeerSink for RegistryPeerSink<R> {
    fn joined_topics(&self) -> Vec<TopicHash> {
        self.registry.joined_topics()
    }

    fn offer_peers(&self, topic: TopicHash, peers: Vec<PeerAddress>) {
        if let Err(e) = self.registry.offer_peers(topic, peers) {
            debug!("[gc-01] Discovered peers not delivered: {}", e);
        }
    }
}

/// Several substrates behind one port: announces go to all, lookups are
/// merged. One failing substrate does not hide the others' peers.
pub struct CombinedSubstrate {
    sources: Vec<Arc<dyn DiscoverySubstrate>>,
}

impl CombinedSubstrate {
    pub fn new(sources: Vec<Arc<dyn DiscoverySubstrate>>) -> Self {
        Self { sources }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[async_trait]
impl DiscoverySubstrate for CombinedSubstrate {
    async fn announce(&self, topic: TopicHash) -> Result<(), DiscoveryError> {
        let mut last_error = None;
        let mut any_ok = self.sources.is_empty();
        for source in &self.sources {
            match source.announce(topic).await {
                Ok(()) => any_ok = true,
                Err(e) => {
                    warn!("[gc-01] Announce on one substrate failed: {}", e);
                    last_error = Some(e);
                }
            }
        }
        match (any_ok, last_error) {
            (false, Some(e)) => Err(e),
            _ => Ok(()),
        }
    }

    async fn lookup_peers(&self, topic: TopicHash) -> Result<Vec<PeerAddress>, DiscoveryError> {
        let mut peers = BTreeSet::new();
        let mut last_error = None;
        let mut any_ok = self.sources.is_empty();
        for source in &self.sources {
            match source.lookup_peers(topic).await {
                Ok(found) => {
                    any_ok = true;
                    peers.extend(found);
                }
                Err(e) => {
                    warn!("[gc-01] Lookup on one substrate failed: {}", e);
                    last_error = Some(e);
                }
            }
        }
        match (any_ok, last_error) {
            (false, Some(e)) => Err(e),
            _ => Ok(peers.into_iter().collect()),
        }
    }
}
