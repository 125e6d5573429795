//! Test utilities for room gossip.
//!
//! Mock port implementations for deterministic testing.
//! Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust,ignore
//! use gc_02_room_gossip::test_utils::RecordingTransport;
//! use gc_02_room_gossip::DatagramTransport;
//!
//! let transport = RecordingTransport::new();
//! transport.send_to(b"datagram", "127.0.0.1:3301".parse().unwrap()).unwrap();
//! assert_eq!(transport.count(), 1);
//! ```

use parking_lot::Mutex;
use shared_types::{PeerAddress, Timestamp};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::events::GossipError;
use crate::ports::outbound::{DatagramTransport, TimeSource};

/// Transport that records every datagram instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(PeerAddress, Vec<u8>)>>,
    failing: HashSet<PeerAddress>,
    /// Datagrams accepted before the buffer counts as full.
    capacity: Option<usize>,
    buffered: AtomicUsize,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to `peer` fail with `SendFailure`.
    pub fn failing_for(mut self, peer: PeerAddress) -> Self {
        self.failing.insert(peer);
        self
    }

    /// Behave like a send buffer of `datagrams` slots: once full, sends fail
    /// until [`RecordingTransport::flush`].
    pub fn with_capacity(mut self, datagrams: usize) -> Self {
        self.capacity = Some(datagrams);
        self
    }

    /// Empty the simulated send buffer.
    pub fn flush(&self) {
        self.buffered.store(0, Ordering::SeqCst);
    }

    /// Number of datagrams accepted so far.
    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Datagrams accepted for one peer, in send order.
    pub fn sent_to(&self, peer: PeerAddress) -> Vec<Vec<u8>> {
        self.sent
            .lock()
            .iter()
            .filter(|(to, _)| *to == peer)
            .map(|(_, data)| data.clone())
            .collect()
    }

    /// Every accepted datagram with its destination.
    pub fn take(&self) -> Vec<(PeerAddress, Vec<u8>)> {
        std::mem::take(&mut *self.sent.lock())
    }
}

impl DatagramTransport for RecordingTransport {
    fn send_to(&self, datagram: &[u8], peer: PeerAddress) -> Result<(), GossipError> {
        if self.failing.contains(&peer) {
            return Err(GossipError::SendFailure {
                peer,
                reason: "unreachable (test)".into(),
            });
        }
        if let Some(capacity) = self.capacity {
            if self.buffered.fetch_add(1, Ordering::SeqCst) >= capacity {
                return Err(GossipError::SendFailure {
                    peer,
                    reason: "send buffer full (test)".into(),
                });
            }
        }
        self.sent.lock().push((peer, datagram.to_vec()));
        Ok(())
    }
}

/// A time source that returns a settable timestamp.
#[derive(Debug)]
pub struct FixedTimeSource {
    secs: AtomicU32,
}

impl FixedTimeSource {
    pub fn new(secs: u32) -> Self {
        Self {
            secs: AtomicU32::new(secs),
        }
    }

    /// Move the clock to `secs`.
    pub fn set(&self, secs: u32) {
        self.secs.store(secs, Ordering::SeqCst);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.secs.load(Ordering::SeqCst))
    }
}
