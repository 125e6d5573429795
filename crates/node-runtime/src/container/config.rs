//! # Node Configuration
//!
//! Unified configuration for the chat node.
//!
//! ## Layering
//!
//! 1. Built-in defaults (`NodeConfig::default()`)
//! 2. Optional TOML file (`--config`)
//! 3. Environment (`GC_LISTEN_PORT`, `GC_PEER_PORT`, `GC_NICK`, `GC_ROOM`)
//! 4. Command-line flags (applied by `main.rs`)
//!
//! `validate()` runs once on the merged result.

use gc_01_peer_discovery::DiscoveryConfig;
use gc_02_room_gossip::{check_config, GossipConfig, InvariantViolation};
use serde::Deserialize;
use shared_types::{Author, EntityError, PeerAddress};
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeConfig {
    /// Sockets and bootstrap peers.
    pub network: NetworkConfig,
    /// Identity and room.
    pub chat: ChatConfig,
    /// Room gossip tunables.
    pub gossip: GossipConfig,
    /// Discovery tunables.
    pub discovery: DiscoveryConfig,
}

/// Network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Address the chat socket binds to.
    pub bind_addr: IpAddr,
    /// Chat listening port. Messages are also sent from this port.
    pub listen_port: u16,
    /// Port assumed for bootstrap peers given without one.
    pub peer_port: u16,
    /// UDP port for LAN discovery beacons.
    pub discovery_port: u16,
    /// Bootstrap peers, `"ip"` or `"ip:port"`.
    pub bootstrap_peers: Vec<String>,
    /// Broadcast beacons and listen for other nodes on the LAN.
    pub lan_discovery: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            listen_port: 3300,
            peer_port: 3301,
            discovery_port: 6881,
            bootstrap_peers: Vec::new(),
            lan_discovery: false,
        }
    }
}

impl NetworkConfig {
    /// Parse `bootstrap_peers`, filling in `peer_port` where none is given.
    pub fn bootstrap_addresses(&self) -> Result<Vec<PeerAddress>, ConfigError> {
        self.bootstrap_peers
            .iter()
            .map(|s| PeerAddress::parse_with_default_port(s, self.peer_port))
            .collect::<Result<_, _>>()
            .map_err(ConfigError::InvalidPeer)
    }
}

/// Chat identity configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Author name carried in every message this node writes.
    pub display_name: String,
    /// Room joined at startup.
    pub room: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            display_name: "deviceA".to_string(),
            room: "chatik".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("Invalid display name: {0}")]
    InvalidAuthor(EntityError),

    #[error("Invalid bootstrap peer: {0}")]
    InvalidPeer(EntityError),

    #[error("Room name must not be empty")]
    EmptyRoom,

    #[error("Port {port} is used for both {first} and {second}")]
    PortClash {
        port: u16,
        first: &'static str,
        second: &'static str,
    },

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Invalid gossip settings: {0:?}")]
    Gossip(InvariantViolation),

    #[error("Discovery intervals must be positive")]
    ZeroDiscoveryInterval,
}

// =============================================================================
// TOML FILE
// =============================================================================

/// Configuration file structure. Every field is optional; missing values keep
/// their defaults.
///
/// ```toml
/// [network]
/// listen_port = 3300
/// peer_port = 3301
/// bootstrap_peers = ["192.168.1.20", "10.0.0.7:4000"]
/// lan_discovery = true
///
/// [chat]
/// display_name = "deviceB"
/// room = "chatik"
///
/// [gossip]
/// gossip_interval_secs = 10
/// retention_secs = 86400
///
/// [discovery]
/// poll_interval_secs = 10
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    network: NetworkFile,
    #[serde(default)]
    chat: ChatFile,
    #[serde(default)]
    gossip: GossipFile,
    #[serde(default)]
    discovery: DiscoveryFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NetworkFile {
    bind_addr: Option<IpAddr>,
    listen_port: Option<u16>,
    peer_port: Option<u16>,
    discovery_port: Option<u16>,
    bootstrap_peers: Option<Vec<String>>,
    lan_discovery: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChatFile {
    display_name: Option<String>,
    room: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GossipFile {
    gossip_interval_secs: Option<u64>,
    retention_secs: Option<u32>,
    history_horizon_secs: Option<u32>,
    eviction_interval_secs: Option<u64>,
    max_datagram_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DiscoveryFile {
    poll_interval_secs: Option<u64>,
    beacon_interval_secs: Option<u64>,
    peer_ttl_secs: Option<u64>,
    broadcast_addr: Option<IpAddr>,
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl NodeConfig {
    /// Load a TOML file on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse TOML on top of the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut config = Self::default();

        let n = file.network;
        set(&mut config.network.bind_addr, n.bind_addr);
        set(&mut config.network.listen_port, n.listen_port);
        set(&mut config.network.peer_port, n.peer_port);
        set(&mut config.network.discovery_port, n.discovery_port);
        set(&mut config.network.bootstrap_peers, n.bootstrap_peers);
        set(&mut config.network.lan_discovery, n.lan_discovery);

        let c = file.chat;
        set(&mut config.chat.display_name, c.display_name);
        set(&mut config.chat.room, c.room);

        let g = file.gossip;
        set(&mut config.gossip.gossip_interval_secs, g.gossip_interval_secs);
        set(&mut config.gossip.retention_secs, g.retention_secs);
        set(&mut config.gossip.history_horizon_secs, g.history_horizon_secs);
        set(&mut config.gossip.eviction_interval_secs, g.eviction_interval_secs);
        set(&mut config.gossip.max_datagram_bytes, g.max_datagram_bytes);

        let d = file.discovery;
        set(&mut config.discovery.poll_interval_secs, d.poll_interval_secs);
        set(&mut config.discovery.beacon_interval_secs, d.beacon_interval_secs);
        set(&mut config.discovery.peer_ttl_secs, d.peer_ttl_secs);
        set(&mut config.discovery.broadcast_addr, d.broadcast_addr);

        Ok(config)
    }

    /// Apply `GC_*` overrides read through `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = |name: &'static str| -> Result<Option<u16>, ConfigError> {
            lookup(name)
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidEnv { name, value })
                })
                .transpose()
        };

        set(&mut self.network.listen_port, port("GC_LISTEN_PORT")?);
        set(&mut self.network.peer_port, port("GC_PEER_PORT")?);
        set(&mut self.chat.display_name, lookup("GC_NICK"));
        set(&mut self.chat.room, lookup("GC_ROOM"));
        Ok(())
    }

    /// The configured display name as a validated author.
    pub fn author(&self) -> Result<Author, ConfigError> {
        Author::new(self.chat.display_name.clone()).map_err(ConfigError::InvalidAuthor)
    }

    /// Check the merged configuration before anything binds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.author()?;
        self.network.bootstrap_addresses()?;

        if self.chat.room.is_empty() {
            return Err(ConfigError::EmptyRoom);
        }

        if self.network.lan_discovery
            && self.network.listen_port != 0
            && self.network.listen_port == self.network.discovery_port
        {
            return Err(ConfigError::PortClash {
                port: self.network.listen_port,
                first: "listen_port",
                second: "discovery_port",
            });
        }

        check_config(&self.gossip).map_err(ConfigError::Gossip)?;

        if self.discovery.poll_interval_secs == 0 || self.discovery.beacon_interval_secs == 0 {
            return Err(ConfigError::ZeroDiscoveryInterval);
        }

        Ok(())
    }
}
