//! Events and error types for the Room Gossip subsystem.

use shared_types::{PeerAddress, TopicHash};
use thiserror::Error;

/// Room gossip errors.
///
/// None of these are fatal: the overlay is best-effort and the next gossip
/// tick repairs whatever a dropped datagram or failed send lost.
#[derive(Debug, Error)]
pub enum GossipError {
    #[error("Malformed datagram: {reason}")]
    MalformedDatagram { reason: String },

    #[error("No joined room for topic {0}")]
    UnknownTopic(TopicHash),

    #[error("Send to {peer} failed: {reason}")]
    SendFailure { peer: PeerAddress, reason: String },

    #[error("Message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: usize, max: usize },

    #[error("Room not joined: {0}")]
    RoomNotJoined(TopicHash),

    #[error("Message ids exhausted for this author")]
    IdsExhausted,
}

impl GossipError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDatagram {
            reason: reason.into(),
        }
    }
}
