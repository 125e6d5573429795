//! # Shared Types Crate
//!
//! This crate contains the entities every gossip-chat subsystem agrees on.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `TopicHash`, `PeerAddress`, `Author` and
//!   `ChatMessage` are defined once and reused by discovery, gossip and runtime.
//! - **Validated at Construction**: an `Author` always fits its 32-byte wire
//!   field, so encoders never have to fail.
//! - **Composite Identity**: messages are deduplicated by `(author, id)`, see
//!   [`MessageKey`].

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
