//! # Room Gossip Subsystem (gc-02)
//!
//! Topic-addressed chat rooms over UDP with epidemic dissemination.
//!
//! ## Architecture Role
//!
//! ```text
//! [Console] ──post──→ [RoomRegistry] ──join──→ room worker (one per room)
//!                          ↑                        │
//!               route_inbound                       ↓ every tick: history × peers
//!                          │                 ┌──────┴──────┐
//!                    [Listener] ←── UDP ──── [Peer A]   [Peer B] ...
//! ```
//!
//! ## Guarantees
//!
//! - A message is identified by `(author, id)`; redelivery never changes history
//! - A datagram is routed only to the room whose topic it carries
//! - Entries older than the retention window are no longer re-broadcast
//!
//! Delivery is best-effort. There are no acknowledgements and no retries
//! beyond the next gossip tick.

pub mod adapters;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{SystemTimeSource, UdpTransport};
pub use domain::*;
pub use events::GossipError;
pub use ports::inbound::RoomRegistryApi;
pub use ports::outbound::{DatagramTransport, TimeSource};
pub use service::{run_listener, RoomRegistry};
