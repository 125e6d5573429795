//! # Adapters
//!
//! Port implementations connecting the subsystems.

pub mod peer_discovery;

pub use peer_discovery::{CombinedSubstrate, RegistryPeerSink};
