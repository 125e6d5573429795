//! # Node Runtime Library
//!
//! This library exposes the internal modules of the node runtime for testing.
//! The main entry point is the `main.rs` binary.
//!
//! ## Modules
//!
//! - `container/` - configuration and subsystem wiring
//! - `adapters/` - port implementations connecting gc-01 to gc-02
//! - `handlers/` - local input (console)
//! - `runtime` - task lifecycle

pub mod adapters;
pub mod container;
pub mod handlers;
pub mod runtime;

pub use container::{ConfigError, NodeConfig, SubsystemContainer};
pub use runtime::NodeRuntime;
