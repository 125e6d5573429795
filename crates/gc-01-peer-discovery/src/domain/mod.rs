//! # Domain Layer for Peer Discovery
//!
//! - **beacon**: LAN beacon codec
//! - **peer_table**: last-seen table with expiry
//! - **value_objects**: `DiscoveryConfig`, `PollReport`

pub mod beacon;
mod peer_table;
mod value_objects;

pub use beacon::Beacon;
pub use peer_table::PeerTable;
pub use value_objects::*;
