//! # Ports
//!
//! - **inbound**: the API this subsystem offers (`RoomRegistryApi`)
//! - **outbound**: what the host must provide (`DatagramTransport`, `TimeSource`)

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
