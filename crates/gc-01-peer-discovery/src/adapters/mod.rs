//! # Discovery Substrates
//!
//! - `StaticSubstrate` - fixed bootstrap list, same peers for every topic
//! - `LanBeaconSubstrate` - UDP broadcast beacons on the local segment

pub mod lan;
pub mod static_list;

pub use lan::LanBeaconSubstrate;
pub use static_list::StaticSubstrate;
