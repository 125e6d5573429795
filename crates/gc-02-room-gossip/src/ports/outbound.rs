//! Outbound ports (SPI) for the Room Gossip subsystem.

use shared_types::{PeerAddress, Timestamp};

use crate::events::GossipError;

/// Connectionless datagram transport.
///
/// Sends are fire-and-forget: implementations must not block and must not
/// retry. A failure is reported once and the caller moves on.
pub trait DatagramTransport: Send + Sync {
    /// Send one datagram to a peer.
    fn send_to(&self, datagram: &[u8], peer: PeerAddress) -> Result<(), GossipError>;
}

/// Wall-clock source, injectable for deterministic tests.
pub trait TimeSource: Send + Sync {
    /// Current unix time.
    fn now(&self) -> Timestamp;
}
