//! Invariants for room history and dissemination.

use shared_types::{ChatMessage, Timestamp};

use super::{wire, GossipConfig};

/// INVARIANT-1: Retention
/// Only entries at most `retention_secs` old are re-broadcast.
pub fn invariant_retention(message: &ChatMessage, now: Timestamp, retention_secs: u32) -> bool {
    message.sent_at.age_at(now) <= retention_secs
}

/// INVARIANT-2: Datagram Size
/// A locally authored message must fit one datagram.
pub fn invariant_datagram_size(text_len: usize, config: &GossipConfig) -> bool {
    wire::encoded_len(text_len) <= config.max_datagram_bytes
}

/// INVARIANT-3: Horizon Covers Retention
/// Eviction never removes an entry that is still eligible for gossip.
pub fn invariant_horizon_covers_retention(config: &GossipConfig) -> bool {
    config.history_horizon_secs >= config.retention_secs
}

/// Configuration check result.
#[derive(Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    HorizonShorterThanRetention,
    ZeroGossipInterval,
    DatagramBoundBelowHeader,
}

/// Check a gossip configuration before any room starts.
pub fn check_config(config: &GossipConfig) -> Result<(), InvariantViolation> {
    if config.gossip_interval_secs == 0 || config.eviction_interval_secs == 0 {
        return Err(InvariantViolation::ZeroGossipInterval);
    }

    if !invariant_horizon_covers_retention(config) {
        return Err(InvariantViolation::HorizonShorterThanRetention);
    }

    if config.max_datagram_bytes <= wire::HEADER_LEN {
        return Err(InvariantViolation::DatagramBoundBelowHeader);
    }

    Ok(())
}
