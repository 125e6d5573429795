//! # Service Layer
//!
//! - **registry**: `RoomRegistry`, the `RoomRegistryApi` implementation
//! - **gossip**: per-room worker and the dissemination tick
//! - **listener**: inbound receive loop and dispatch

pub mod gossip;
pub mod listener;
pub mod registry;

pub use gossip::{disseminate, run_room_worker};
pub use listener::{dispatch, run_listener, RECV_BUFFER_LEN};
pub use registry::RoomRegistry;
