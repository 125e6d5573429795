//! # Inbound Dispatcher
//!
//! Single receive loop for the node's socket. Every datagram is decoded and
//! routed by topic; bad input is logged and dropped, never fatal.

use std::sync::Arc;

use shared_types::PeerAddress;
use tracing::{debug, error, info, warn};

use crate::adapters::UdpTransport;
use crate::events::GossipError;
use crate::ports::inbound::RoomRegistryApi;

/// Receive buffer size. Large enough for any UDP payload.
pub const RECV_BUFFER_LEN: usize = 65_535;

/// Route one datagram and log the outcome.
///
/// Returns `true` if the datagram reached a room.
pub fn dispatch<R>(registry: &R, datagram: &[u8], source: PeerAddress) -> bool
where
    R: RoomRegistryApi + ?Sized,
{
    match registry.route_inbound(datagram, source) {
        Ok(_) => true,
        Err(GossipError::UnknownTopic(topic)) => {
            debug!("[gc-02] Dropped datagram from {}: unknown chat {}", source, topic);
            false
        }
        Err(e) => {
            warn!("[gc-02] Dropped datagram from {}: {}", source, e);
            false
        }
    }
}

/// Receive loop. Runs until the task is aborted.
pub async fn run_listener<R>(transport: Arc<UdpTransport>, registry: Arc<R>)
where
    R: RoomRegistryApi + ?Sized,
{
    let mut buf = vec![0u8; RECV_BUFFER_LEN];
    if let Ok(addr) = transport.local_addr() {
        info!("[gc-02] Listening on {}", addr);
    }

    loop {
        match transport.recv_from(&mut buf).await {
            Ok((len, source)) => {
                dispatch(&*registry, &buf[..len], source);
            }
            Err(e) => {
                // ICMP port-unreachable surfaces here on some platforms.
                error!("[gc-02] Receive error: {}", e);
            }
        }
    }
}
