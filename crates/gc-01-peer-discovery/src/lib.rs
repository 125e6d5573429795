//! # Peer Discovery Subsystem (gc-01)
//!
//! Finds the other participants of each joined room and hands them to the
//! room gossip layer.
//!
//! ## Architecture Role
//!
//! ```text
//! [DiscoverySubstrate] ←─announce / lookup_peers── [DiscoveryPoller]
//!   static list | LAN beacons                          │ every poll_interval
//!                                                      ↓ offer_peers
//!                                                 [PeerSink] → room intake
//! ```
//!
//! Discovery is additive only. Peers are never removed from a room once
//! offered; a LAN peer that goes quiet simply stops being offered again.

pub mod adapters;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{LanBeaconSubstrate, StaticSubstrate};
pub use domain::{Beacon, DiscoveryConfig, PeerTable, PollReport};
pub use events::DiscoveryError;
pub use ports::{DiscoverySubstrate, PeerDiscoveryApi, PeerSink};
pub use service::DiscoveryPoller;
