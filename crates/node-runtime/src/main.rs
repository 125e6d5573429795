//! # Gossip-Chat Node
//!
//! Command-line chat node: joins one room, gossips its history to every
//! known peer and prints messages as they arrive.
//!
//! ## Startup Sequence
//!
//! 1. Parse flags
//! 2. Install logging
//! 3. Merge configuration (defaults → file → env → flags) and validate
//! 4. Bind sockets and wire subsystems
//! 5. Join the room, start tasks, attach stdin
//! 6. Run until Ctrl+C

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use node_runtime::{NodeConfig, NodeRuntime};

/// Decentralized topic-based chat over UDP gossip.
#[derive(Parser, Debug)]
#[command(name = "gossip-chat")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Chat listening port (also the source port of our datagrams)
    #[arg(long = "port")]
    listen_port: Option<u16>,

    /// Port assumed for peers given without one
    #[arg(long = "dstport")]
    peer_port: Option<u16>,

    /// UDP port for LAN discovery beacons
    #[arg(long = "dhtport")]
    discovery_port: Option<u16>,

    /// Bootstrap peers, comma separated (`ip` or `ip:port`)
    #[arg(long = "nodes", value_delimiter = ',')]
    nodes: Vec<String>,

    /// Display name
    #[arg(long = "nik")]
    nick: Option<String>,

    /// Room to join
    #[arg(long)]
    room: Option<String>,

    /// Address to bind the chat socket to
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Discover peers on the local network with broadcast beacons
    #[arg(long)]
    lan: bool,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Load configuration from file, environment and flags.
fn load_config(args: &Args) -> Result<NodeConfig> {
    let mut config = match &args.config {
        Some(path) => NodeConfig::from_file(path)?,
        None => NodeConfig::default(),
    };

    config.apply_env(|name| std::env::var(name).ok())?;

    if let Some(port) = args.listen_port {
        config.network.listen_port = port;
    }
    if let Some(port) = args.peer_port {
        config.network.peer_port = port;
    }
    if let Some(port) = args.discovery_port {
        config.network.discovery_port = port;
    }
    if let Some(bind) = args.bind {
        config.network.bind_addr = bind;
    }
    let nodes: Vec<String> = args
        .nodes
        .iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    if !nodes.is_empty() {
        config.network.bootstrap_peers = nodes;
    }
    if let Some(nick) = &args.nick {
        config.chat.display_name = nick.clone();
    }
    if let Some(room) = &args.room {
        config.chat.room = room.clone();
    }
    if args.lan {
        config.network.lan_discovery = true;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("Invalid log level")?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&args).context("Invalid configuration")?;

    let runtime = NodeRuntime::new(config)?;
    let topic = runtime.start();
    runtime.attach_console(topic);

    info!("Node is running. Type a line to chat, Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown();

    Ok(())
}
