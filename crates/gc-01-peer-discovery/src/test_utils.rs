//! Test utilities for peer discovery.
//!
//! Enable with the `test-utils` feature flag.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{PeerAddress, TopicHash};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::events::DiscoveryError;
use crate::ports::{DiscoverySubstrate, PeerSink};

/// Substrate backed by a map; announcements are recorded.
#[derive(Debug, Default)]
pub struct InMemorySubstrate {
    peers: Mutex<HashMap<TopicHash, BTreeSet<PeerAddress>>>,
    announced: Mutex<Vec<TopicHash>>,
    failing: HashSet<TopicHash>,
}

impl InMemorySubstrate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make lookups for `topic` fail with `Unreachable`.
    pub fn failing_for(mut self, topic: TopicHash) -> Self {
        self.failing.insert(topic);
        self
    }

    pub fn insert(&self, topic: TopicHash, peer: PeerAddress) {
        self.peers.lock().entry(topic).or_default().insert(peer);
    }

    pub fn announcements(&self) -> Vec<TopicHash> {
        self.announced.lock().clone()
    }
}

#[async_trait]
impl DiscoverySubstrate for InMemorySubstrate {
    async fn announce(&self, topic: TopicHash) -> Result<(), DiscoveryError> {
        self.announced.lock().push(topic);
        Ok(())
    }

    async fn lookup_peers(&self, topic: TopicHash) -> Result<Vec<PeerAddress>, DiscoveryError> {
        if self.failing.contains(&topic) {
            return Err(DiscoveryError::Unreachable("test".into()));
        }
        Ok(self
            .peers
            .lock()
            .get(&topic)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }
}

/// Sink with a fixed topic list that records every offer.
#[derive(Debug, Default)]
pub struct RecordingSink {
    topics: Vec<TopicHash>,
    offers: Mutex<Vec<(TopicHash, Vec<PeerAddress>)>>,
}

impl RecordingSink {
    pub fn with_topics(topics: Vec<TopicHash>) -> Self {
        Self {
            topics,
            offers: Mutex::new(Vec::new()),
        }
    }

    pub fn offers(&self) -> Vec<(TopicHash, Vec<PeerAddress>)> {
        self.offers.lock().clone()
    }
}

impl PeerSink for RecordingSink {
    fn joined_topics(&self) -> Vec<TopicHash> {
        self.topics.clone()
    }

    fn offer_peers(&self, topic: TopicHash, peers: Vec<PeerAddress>) {
        self.offers.lock().push((topic, peers));
    }
}
