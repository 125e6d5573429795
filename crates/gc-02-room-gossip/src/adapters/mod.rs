//! # Adapters
//!
//! Production implementations of the outbound ports.
//!
//! - `UdpTransport` - the node's single bound UDP socket
//! - `SystemTimeSource` - wall clock

pub mod time;
pub mod udp;

pub use time::SystemTimeSource;
pub use udp::UdpTransport;
