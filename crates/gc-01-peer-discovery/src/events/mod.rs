//! Error types for the Peer Discovery subsystem.

use thiserror::Error;

/// Peer discovery errors.
///
/// A failed lookup only delays peer learning until the next poll; none of
/// these stop the node.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Discovery substrate unreachable: {0}")]
    Unreachable(String),

    #[error("Discovery I/O error: {0}")]
    Io(String),

    #[error("Malformed beacon: {reason}")]
    MalformedBeacon { reason: String },
}

impl DiscoveryError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedBeacon {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for DiscoveryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
