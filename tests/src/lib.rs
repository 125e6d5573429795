//! # Gossip-Chat Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # Multi-node flows over loopback UDP
//! └── benches/           # Codec and dissemination throughput
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p gc-tests
//! cargo bench -p gc-tests
//! ```

pub mod integration;
