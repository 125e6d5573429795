//! Configuration layering through the public API: file, then environment.

use std::io::Write;

use node_runtime::{ConfigError, NodeConfig};

#[test]
fn test_env_overrides_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[network]
listen_port = 3301
peer_port = 3300
bootstrap_peers = ["192.168.1.20"]

[chat]
display_name = "deviceB"
room = "alpha"
"#
    )
    .unwrap();

    let mut config = NodeConfig::from_file(file.path()).unwrap();
    config
        .apply_env(|name| match name {
            "GC_ROOM" => Some("beta".to_string()),
            _ => None,
        })
        .unwrap();

    assert!(config.validate().is_ok());
    assert_eq!(config.network.listen_port, 3301);
    assert_eq!(config.chat.display_name, "deviceB");
    assert_eq!(config.chat.room, "beta");
    assert_eq!(
        config.network.bootstrap_addresses().unwrap(),
        vec!["192.168.1.20:3300".parse().unwrap()]
    );
}

#[test]
fn test_invalid_file_reports_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[network]\nlisten_port = \"not a port\"").unwrap();

    assert!(matches!(
        NodeConfig::from_file(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_lan_discovery_config_roundtrip() {
    let config = NodeConfig::from_toml_str(
        r#"
[network]
lan_discovery = true
discovery_port = 7000

[discovery]
beacon_interval_secs = 5
peer_ttl_secs = 30
broadcast_addr = "192.168.1.255"
"#,
    )
    .unwrap();

    assert!(config.network.lan_discovery);
    assert_eq!(config.network.discovery_port, 7000);
    assert_eq!(config.discovery.beacon_interval_secs, 5);
    assert_eq!(config.discovery.peer_ttl_secs, 30);
    assert_eq!(config.discovery.broadcast_addr.to_string(), "192.168.1.255");
    assert!(config.validate().is_ok());
}
