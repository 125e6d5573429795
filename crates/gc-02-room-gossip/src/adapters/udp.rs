//! UDP transport over a single bound socket.
//!
//! The node listens and sends on the same socket, so the source address a
//! peer observes on our datagrams is our listening address. Receivers rely on
//! that to learn us as a peer.

use shared_types::PeerAddress;
use std::io;
use std::net::{SocketAddr, UdpSocket as StdUdpSocket};
use std::sync::Arc;
use tokio::net::UdpSocket;

use crate::events::GossipError;
use crate::ports::DatagramTransport;

/// The node's UDP socket, shared by the listener and every room worker.
///
/// Receives go through the tokio reactor; sends use a non-blocking duplicate
/// of the same descriptor so room workers can send synchronously.
#[derive(Debug, Clone)]
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    sender: Arc<StdUdpSocket>,
}

impl UdpTransport {
    /// Bind to a local address (e.g. `0.0.0.0:3300`).
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the port cannot be bound.
    pub fn bind(addr: SocketAddr) -> io::Result<Self> {
        let std_socket = StdUdpSocket::bind(addr)?;
        std_socket.set_nonblocking(true)?;
        let sender = std_socket.try_clone()?;
        Ok(Self {
            socket: Arc::new(UdpSocket::from_std(std_socket)?),
            sender: Arc::new(sender),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Wait for the next datagram.
    pub async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, PeerAddress)> {
        let (len, from) = self.socket.recv_from(buf).await?;
        Ok((len, PeerAddress::from(from)))
    }
}

impl DatagramTransport for UdpTransport {
    /// Non-blocking send. A full socket buffer counts as a failed send.
    fn send_to(&self, datagram: &[u8], peer: PeerAddress) -> Result<(), GossipError> {
        match self.sender.send_to(datagram, peer.to_socket_addr()) {
            Ok(_) => Ok(()),
            Err(e) => Err(GossipError::SendFailure {
                peer,
                reason: e.to_string(),
            }),
        }
    }
}
