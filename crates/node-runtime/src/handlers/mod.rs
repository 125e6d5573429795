//! # Handlers
//!
//! Producers that feed local input into the subsystems.

pub mod console;

pub use console::ConsoleHandler;
