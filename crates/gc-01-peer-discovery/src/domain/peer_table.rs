//! Last-seen table of peers per topic.

use shared_types::{PeerAddress, TopicHash};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Peers heard from, keyed by topic, with the time they were last heard.
#[derive(Debug, Default)]
pub struct PeerTable {
    entries: HashMap<TopicHash, HashMap<PeerAddress, Instant>>,
}

impl PeerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `peer` advertised `topic` at `seen_at`.
    ///
    /// Returns `true` if the peer was not in the table for this topic.
    pub fn record(&mut self, topic: TopicHash, peer: PeerAddress, seen_at: Instant) -> bool {
        self.entries
            .entry(topic)
            .or_default()
            .insert(peer, seen_at)
            .is_none()
    }

    /// Peers of `topic` seen within `ttl` of `now`, in address order.
    pub fn live(&self, topic: &TopicHash, now: Instant, ttl: Duration) -> Vec<PeerAddress> {
        let mut peers: Vec<PeerAddress> = self
            .entries
            .get(topic)
            .map(|seen| {
                seen.iter()
                    .filter(|(_, at)| now.saturating_duration_since(**at) <= ttl)
                    .map(|(peer, _)| *peer)
                    .collect()
            })
            .unwrap_or_default();
        peers.sort();
        peers
    }

    /// Drop entries older than `ttl`. Returns how many were removed.
    pub fn expire(&mut self, now: Instant, ttl: Duration) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, seen| {
            let before = seen.len();
            seen.retain(|_, at| now.saturating_duration_since(*at) <= ttl);
            removed += before - seen.len();
            !seen.is_empty()
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
