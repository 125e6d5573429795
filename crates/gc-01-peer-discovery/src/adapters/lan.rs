//! LAN beacon substrate.
//!
//! A beacon task broadcasts one [`Beacon`] per announced topic every
//! `beacon_interval`; a receive task records `(source ip, advertised port)`
//! per topic. Lookups return peers heard within `peer_ttl`.
//!
//! The beacon socket sets `SO_REUSEADDR` (and `SO_REUSEPORT` on unix) so
//! several nodes on one host can share the discovery port. A node hears its
//! own broadcasts too; those carry its instance id and are skipped.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_types::{PeerAddress, TopicHash};
use socket2::{Domain, Protocol, Socket, Type};
use std::collections::BTreeSet;
use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket as StdUdpSocket};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::domain::beacon::BEACON_LEN;
use crate::domain::{Beacon, DiscoveryConfig, PeerTable};
use crate::events::DiscoveryError;
use crate::ports::DiscoverySubstrate;

/// Discovery through UDP broadcast on `discovery_port`.
pub struct LanBeaconSubstrate {
    socket: UdpSocket,
    /// Chat listening port advertised in our beacons.
    listen_port: u16,
    discovery_port: u16,
    /// Random id stamped on our beacons.
    instance: u64,
    config: DiscoveryConfig,
    topics: RwLock<BTreeSet<TopicHash>>,
    table: Mutex<PeerTable>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl LanBeaconSubstrate {
    /// Bind `0.0.0.0:discovery_port` (shared, broadcast enabled) and start
    /// the beacon and receive tasks.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// `Io` if the port cannot be bound or broadcast is not permitted.
    pub fn start(
        discovery_port: u16,
        listen_port: u16,
        config: DiscoveryConfig,
    ) -> Result<Arc<Self>, DiscoveryError> {
        let socket = UdpSocket::from_std(shared_broadcast_socket(discovery_port)?)?;
        let discovery_port = socket.local_addr()?.port();

        let substrate = Arc::new(Self {
            socket,
            listen_port,
            discovery_port,
            instance: rand::random(),
            config,
            topics: RwLock::new(BTreeSet::new()),
            table: Mutex::new(PeerTable::new()),
            tasks: Mutex::new(Vec::new()),
        });

        let beacon = tokio::spawn(Arc::clone(&substrate).beacon_loop());
        let receive = tokio::spawn(Arc::clone(&substrate).receive_loop());
        substrate.tasks.lock().extend([beacon, receive]);

        info!(
            "[gc-01] LAN discovery on port {} (beacons to {})",
            discovery_port, substrate.config.broadcast_addr
        );
        Ok(substrate)
    }

    /// Port the beacon socket is bound to.
    pub fn discovery_port(&self) -> u16 {
        self.discovery_port
    }

    /// Stop the beacon and receive tasks. Later lookups fail with
    /// `Unreachable`.
    pub fn shutdown(&self) {
        for handle in self.tasks.lock().drain(..) {
            handle.abort();
        }
    }

    async fn beacon_loop(self: Arc<Self>) {
        let target = SocketAddr::new(self.config.broadcast_addr, self.discovery_port);
        let mut ticker = interval(self.config.beacon_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let topics: Vec<TopicHash> = self.topics.read().iter().copied().collect();
            for topic in topics {
                let beacon = Beacon::new(topic, self.listen_port, self.instance).encode();
                if let Err(e) = self.socket.send_to(&beacon, target).await {
                    warn!("[gc-01] Beacon to {} failed: {}", target, e);
                }
            }
            self.table
                .lock()
                .expire(Instant::now(), self.config.peer_ttl());
        }
    }

    async fn receive_loop(self: Arc<Self>) {
        // One spare byte so oversized datagrams fail the length check.
        let mut buf = [0u8; BEACON_LEN + 1];
        loop {
            match self.socket.recv_from(&mut buf).await {
                Ok((len, from)) => self.on_datagram(&buf[..len], from),
                Err(e) => warn!("[gc-01] Beacon receive error: {}", e),
            }
        }
    }

    fn on_datagram(&self, data: &[u8], from: SocketAddr) {
        match Beacon::decode(data) {
            Ok(beacon) if beacon.instance == self.instance => {}
            Ok(beacon) => {
                let peer = PeerAddress::new(from.ip(), beacon.port);
                let fresh = self.table.lock().record(beacon.topic, peer, Instant::now());
                if fresh {
                    debug!("[gc-01] Heard {} in topic {}", peer, beacon.topic);
                }
            }
            Err(e) => debug!("[gc-01] Ignored datagram from {}: {}", from, e),
        }
    }
}

#[async_trait]
impl DiscoverySubstrate for LanBeaconSubstrate {
    async fn announce(&self, topic: TopicHash) -> Result<(), DiscoveryError> {
        self.topics.write().insert(topic);
        Ok(())
    }

    async fn lookup_peers(&self, topic: TopicHash) -> Result<Vec<PeerAddress>, DiscoveryError> {
        if self.tasks.lock().is_empty() {
            return Err(DiscoveryError::Unreachable(format!(
                "LAN discovery on port {} is stopped",
                self.discovery_port
            )));
        }
        Ok(self
            .table
            .lock()
            .live(&topic, Instant::now(), self.config.peer_ttl()))
    }
}

/// UDP socket on `0.0.0.0:port` that other processes on the host can bind
/// as well, set up the way the tokio reactor expects.
fn shared_broadcast_socket(port: u16) -> io::Result<StdUdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_broadcast(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)).into())?;
    Ok(socket.into())
}
