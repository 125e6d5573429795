//! # Domain Layer for Room Gossip
//!
//! Pure state and encoding logic with no socket or timer I/O.
//!
//! ## Contents
//!
//! - **wire**: Datagram codec (`encode`, `decode`)
//! - **room**: Per-topic state (`Room`, `Queue`, `Delivery`)
//! - **value_objects**: Configuration and reports (`GossipConfig`, `TickReport`)
//! - **invariants**: Retention, datagram size and config checks

mod invariants;
mod room;
mod value_objects;
pub mod wire;

pub use invariants::*;
pub use room::*;
pub use value_objects::*;
