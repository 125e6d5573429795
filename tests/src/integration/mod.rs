//! # Integration Flows
//!
//! - **convergence**: two registries exchanging history over real sockets
//! - **node**: full `NodeRuntime` instances wired through bootstrap discovery

pub mod convergence;
pub mod node;
