//! # Subsystem Container
//!
//! Builds and holds the node's subsystems.
//!
//! ## Initialization Order
//!
//! ```text
//! 1. UDP transport (bind listen port)
//! 2. Room registry (gc-02) over the transport
//! 3. Discovery substrates (gc-01): static list, then LAN beacons if enabled
//! 4. Discovery poller, sinking into the registry
//! ```
//!
//! ## Thread Safety
//!
//! Everything is behind `Arc`; the registry and substrates synchronize
//! internally.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use gc_01_peer_discovery::{
    DiscoveryPoller, DiscoverySubstrate, LanBeaconSubstrate, StaticSubstrate,
};
use gc_02_room_gossip::{RoomRegistry, SystemTimeSource, UdpTransport};

use crate::adapters::{CombinedSubstrate, RegistryPeerSink};
use crate::container::config::NodeConfig;

/// Concrete registry type used by the node.
pub type ChatRegistry = RoomRegistry<UdpTransport, SystemTimeSource>;

/// Concrete discovery poller type used by the node.
pub type ChatPoller = DiscoveryPoller<CombinedSubstrate, RegistryPeerSink<ChatRegistry>>;

/// Central container holding all subsystem instances.
pub struct SubsystemContainer {
    /// Merged configuration.
    pub config: NodeConfig,
    /// The node's single chat socket.
    pub transport: Arc<UdpTransport>,
    /// Room Gossip (gc-02).
    pub registry: Arc<ChatRegistry>,
    /// Peer Discovery (gc-01).
    pub poller: Arc<ChatPoller>,
    /// LAN beacons, when enabled. Kept for shutdown.
    pub lan: Option<Arc<LanBeaconSubstrate>>,
}

impl SubsystemContainer {
    /// Bind sockets and wire the subsystems. Must run inside a tokio runtime.
    pub fn new(config: NodeConfig) -> Result<Self> {
        let author = config.author()?;

        let listen = SocketAddr::new(config.network.bind_addr, config.network.listen_port);
        let transport = Arc::new(
            UdpTransport::bind(listen)
                .with_context(|| format!("Failed to bind chat socket on {}", listen))?,
        );
        let local = transport.local_addr()?;
        info!("[gc-02] Chat socket bound on {}", local);

        let registry = Arc::new(RoomRegistry::new(
            config.gossip.clone(),
            author,
            Arc::clone(&transport),
            Arc::new(SystemTimeSource::new()),
        ));

        let mut sources: Vec<Arc<dyn DiscoverySubstrate>> = Vec::new();

        let bootstrap = config.network.bootstrap_addresses()?;
        if !bootstrap.is_empty() {
            info!("[gc-01] {} bootstrap peers configured", bootstrap.len());
            sources.push(Arc::new(StaticSubstrate::new(bootstrap)));
        }

        let lan = if config.network.lan_discovery {
            let lan = LanBeaconSubstrate::start(
                config.network.discovery_port,
                local.port(),
                config.discovery.clone(),
            )
            .context("Failed to start LAN discovery")?;
            sources.push(Arc::clone(&lan) as Arc<dyn DiscoverySubstrate>);
            Some(lan)
        } else {
            None
        };

        if sources.is_empty() {
            info!("[gc-01] No discovery sources; only peers that message us will be learned");
        }

        let poller = Arc::new(DiscoveryPoller::new(
            Arc::new(CombinedSubstrate::new(sources)),
            Arc::new(RegistryPeerSink::new(Arc::clone(&registry))),
            config.discovery.clone(),
        ));

        Ok(Self {
            config,
            transport,
            registry,
            poller,
            lan,
        })
    }

    /// Local address of the chat socket.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.transport.local_addr()?)
    }
}
