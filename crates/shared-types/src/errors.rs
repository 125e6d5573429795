//! # Error Types
//!
//! Errors raised while constructing shared entities.

use thiserror::Error;

/// Errors from entity validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// Display name is empty, too long for the wire field, or contains NUL.
    #[error("Invalid author {name:?}: {reason}")]
    InvalidAuthor { name: String, reason: &'static str },

    /// Peer address could not be parsed.
    #[error("Invalid peer address: {0}")]
    InvalidPeerAddress(String),

    /// Topic hash is not 40 hex characters.
    #[error("Invalid topic hash: {0}")]
    InvalidTopicHash(String),
}
