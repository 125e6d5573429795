//! Value objects for room gossip configuration and reporting.

use std::time::Duration;

/// Room gossip configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GossipConfig {
    /// Seconds between two dissemination ticks of a room.
    pub gossip_interval_secs: u64,
    /// Maximum age (seconds) of a history entry still re-broadcast.
    pub retention_secs: u32,
    /// Entries older than this (seconds) are removed by the eviction sweep.
    pub history_horizon_secs: u32,
    /// Seconds between two eviction sweeps.
    pub eviction_interval_secs: u64,
    /// Largest datagram a locally authored message may encode to.
    pub max_datagram_bytes: usize,
}

impl GossipConfig {
    pub fn gossip_interval(&self) -> Duration {
        Duration::from_secs(self.gossip_interval_secs)
    }

    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval_secs)
    }
}

impl Default for GossipConfig {
    fn default() -> Self {
        Self {
            gossip_interval_secs: 10,
            retention_secs: 86_400,             // 24 hours
            history_horizon_secs: 3 * 86_400,   // 72 hours
            eviction_interval_secs: 600,
            max_datagram_bytes: 1_400, // below a 1500-byte Ethernet MTU
        }
    }
}

/// Outcome of a single dissemination tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Peers in the snapshot.
    pub peers: usize,
    /// History entries within the retention window.
    pub eligible: usize,
    /// History entries skipped for age.
    pub skipped_expired: usize,
    /// Datagrams handed to the transport successfully.
    pub sent: usize,
    /// Datagrams the transport rejected.
    pub failed: usize,
}

impl TickReport {
    /// Total send attempts (`peers × eligible`).
    pub fn attempts(&self) -> usize {
        self.sent + self.failed
    }
}

/// Point-in-time room statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoomStats {
    /// Entries in history.
    pub history: usize,
    /// Entries still inside the retention window.
    pub live: usize,
    /// Known peers.
    pub peers: usize,
}
