//! LAN beacon codec.
//!
//! ```text
//! ┌───────┬─────────┬───────────────┬──────────────┬──────────┐
//! │ magic │ version │ topic (SHA-1) │ listen port  │ instance │
//! │ GCHB  │   u8    │   20 bytes    │   u16 BE     │  u64 BE  │
//! └───────┴─────────┴───────────────┴──────────────┴──────────┘
//!   4        1          20               2             8      = 35 bytes
//! ```
//!
//! The advertised port is the chat listening port; the beacon's source IP
//! completes the peer address. The instance id is random per process and
//! lets a node recognise its own beacons.

use shared_types::{TopicHash, TOPIC_HASH_LEN};

use crate::events::DiscoveryError;

pub const MAGIC: &[u8; 4] = b"GCHB";
pub const VERSION: u8 = 1;
pub const BEACON_LEN: usize = PORT_OFFSET + 2 + 8;

const TOPIC_OFFSET: usize = 5;
const PORT_OFFSET: usize = TOPIC_OFFSET + TOPIC_HASH_LEN;
const INSTANCE_OFFSET: usize = PORT_OFFSET + 2;

/// "Someone listening on `port` is in room `topic`."
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Beacon {
    pub topic: TopicHash,
    pub port: u16,
    /// Sender's per-process instance id.
    pub instance: u64,
}

impl Beacon {
    pub fn new(topic: TopicHash, port: u16, instance: u64) -> Self {
        Self {
            topic,
            port,
            instance,
        }
    }

    pub fn encode(&self) -> [u8; BEACON_LEN] {
        let mut buf = [0u8; BEACON_LEN];
        buf[..4].copy_from_slice(MAGIC);
        buf[4] = VERSION;
        buf[TOPIC_OFFSET..PORT_OFFSET].copy_from_slice(self.topic.as_bytes());
        buf[PORT_OFFSET..INSTANCE_OFFSET].copy_from_slice(&self.port.to_be_bytes());
        buf[INSTANCE_OFFSET..].copy_from_slice(&self.instance.to_be_bytes());
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, DiscoveryError> {
        if data.len() != BEACON_LEN {
            return Err(DiscoveryError::malformed(format!(
                "expected {} bytes, got {}",
                BEACON_LEN,
                data.len()
            )));
        }
        if &data[..4] != MAGIC {
            return Err(DiscoveryError::malformed("bad magic"));
        }
        if data[4] != VERSION {
            return Err(DiscoveryError::malformed(format!(
                "unsupported version {}",
                data[4]
            )));
        }

        let mut topic = [0u8; TOPIC_HASH_LEN];
        topic.copy_from_slice(&data[TOPIC_OFFSET..PORT_OFFSET]);
        let port = u16::from_be_bytes([data[PORT_OFFSET], data[PORT_OFFSET + 1]]);
        if port == 0 {
            return Err(DiscoveryError::malformed("port 0"));
        }

        let mut instance = [0u8; 8];
        instance.copy_from_slice(&data[INSTANCE_OFFSET..]);

        Ok(Self {
            topic: TopicHash::from_bytes(topic),
            port,
            instance: u64::from_be_bytes(instance),
        })
    }
}
