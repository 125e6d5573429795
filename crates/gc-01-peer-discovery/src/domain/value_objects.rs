//! Value objects for peer discovery.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Peer discovery configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Seconds between two lookups per joined topic.
    pub poll_interval_secs: u64,
    /// Seconds between two LAN beacons.
    pub beacon_interval_secs: u64,
    /// A LAN peer not heard from for this long is forgotten.
    pub peer_ttl_secs: u64,
    /// Where LAN beacons are sent.
    pub broadcast_addr: IpAddr,
}

impl DiscoveryConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn beacon_interval(&self) -> Duration {
        Duration::from_secs(self.beacon_interval_secs)
    }

    pub fn peer_ttl(&self) -> Duration {
        Duration::from_secs(self.peer_ttl_secs)
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
            beacon_interval_secs: 10,
            peer_ttl_secs: 120,
            broadcast_addr: IpAddr::V4(Ipv4Addr::BROADCAST),
        }
    }
}

/// Outcome of one discovery poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Topics queried.
    pub topics: usize,
    /// Peer addresses handed to the sink (before dedup).
    pub offered: usize,
    /// Lookups that failed.
    pub failures: usize,
}
