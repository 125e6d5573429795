//! # Subsystem Container
//!
//! Configuration plus the wired subsystem instances.

pub mod config;
pub mod subsystems;

pub use config::{ChatConfig, ConfigError, NetworkConfig, NodeConfig};
pub use subsystems::{ChatPoller, ChatRegistry, SubsystemContainer};
