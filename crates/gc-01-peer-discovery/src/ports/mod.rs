//! # Ports
//!
//! - **inbound**: `PeerDiscoveryApi`, what the runtime drives
//! - **outbound**: `DiscoverySubstrate` (where peers come from) and
//!   `PeerSink` (where they go)

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
