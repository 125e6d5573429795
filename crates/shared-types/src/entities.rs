//! # Core Domain Entities
//!
//! Defines the chat entities shared by all subsystems.
//!
//! ## Entities
//!
//! - [`TopicHash`]: SHA-1 digest of a room name (routing + discovery key)
//! - [`Author`]: Validated display name (fits the 32-byte wire field)
//! - [`MessageKey`]: Dedup identity `(author, id)`
//! - [`ChatMessage`]: A single chat line as carried on the wire
//! - [`PeerAddress`]: UDP endpoint of a remote participant
//! - [`Timestamp`]: Unix seconds as carried on the wire (u32)

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use sha1::{Digest, Sha1};

use crate::errors::EntityError;

// =============================================================================
// TOPIC HASH
// =============================================================================

/// Length of a topic digest in bytes (SHA-1).
pub const TOPIC_HASH_LEN: usize = 20;

/// Deterministic digest of a human-readable room name.
///
/// Used both as the room-lookup key for inbound datagrams and as the
/// identifier announced to the discovery substrate.
///
/// # Example
///
/// ```rust
/// use shared_types::TopicHash;
///
/// let topic = TopicHash::from_room_name("chatik");
/// assert_eq!(topic.to_hex(), "b8092c0e67fbe36a46c0acf1f879002584f0250d");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicHash([u8; TOPIC_HASH_LEN]);

impl TopicHash {
    /// Hash a room name into its topic.
    pub fn from_room_name(name: &str) -> Self {
        let digest = Sha1::digest(name.as_bytes());
        let mut bytes = [0u8; TOPIC_HASH_LEN];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Wrap a raw digest.
    pub const fn from_bytes(bytes: [u8; TOPIC_HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a 40-character hex digest.
    pub fn from_hex(s: &str) -> Result<Self, EntityError> {
        let raw = hex::decode(s).map_err(|_| EntityError::InvalidTopicHash(s.to_string()))?;
        let bytes: [u8; TOPIC_HASH_LEN] = raw
            .try_into()
            .map_err(|_| EntityError::InvalidTopicHash(s.to_string()))?;
        Ok(Self(bytes))
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; TOPIC_HASH_LEN] {
        &self.0
    }

    /// Lowercase hex form (40 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for TopicHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for TopicHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopicHash({}..)", &self.to_hex()[..8])
    }
}

// =============================================================================
// TIMESTAMP
// =============================================================================

/// Unix timestamp in seconds, as carried in the 4-byte wire field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Timestamp(u32);

impl Timestamp {
    /// Create a timestamp from unix seconds.
    pub const fn new(secs: u32) -> Self {
        Self(secs)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self(u32::try_from(secs).unwrap_or(u32::MAX))
    }

    /// Seconds since the unix epoch.
    pub const fn as_secs(&self) -> u32 {
        self.0
    }

    /// Age of this timestamp relative to `now`.
    ///
    /// Timestamps in the future have age zero.
    pub fn age_at(&self, now: Timestamp) -> u32 {
        now.0.saturating_sub(self.0)
    }

    /// Timestamp `secs` seconds earlier, clamped at the epoch.
    pub fn saturating_sub_secs(&self, secs: u32) -> Self {
        Self(self.0.saturating_sub(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// AUTHOR
// =============================================================================

/// Display name of a message author.
///
/// Guaranteed non-empty, at most [`Author::MAX_LEN`] bytes of UTF-8, and free
/// of NUL bytes (NUL is the padding byte of the wire field).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Author(String);

impl Author {
    /// Width of the author field on the wire.
    pub const MAX_LEN: usize = 32;

    /// Validate and wrap a display name.
    pub fn new(name: impl Into<String>) -> Result<Self, EntityError> {
        let name = name.into();
        let reason = if name.is_empty() {
            Some("empty")
        } else if name.len() > Self::MAX_LEN {
            Some("longer than 32 bytes")
        } else if name.contains('\0') {
            Some("contains NUL")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(EntityError::InvalidAuthor { name, reason }),
            None => Ok(Self(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// MESSAGE
// =============================================================================

/// Dedup identity of a message.
///
/// Ids are assigned by each author's local counter, so two authors can
/// legitimately reuse the same id; only the pair is unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey {
    pub author: Author,
    pub id: u32,
}

/// A chat message as gossiped between peers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Room the message belongs to.
    pub topic: TopicHash,
    /// Per-author monotonically increasing id.
    pub id: u32,
    /// Author display name.
    pub author: Author,
    /// When the author created the message.
    pub sent_at: Timestamp,
    /// Message body.
    pub text: String,
}

impl ChatMessage {
    pub fn new(
        topic: TopicHash,
        id: u32,
        author: Author,
        sent_at: Timestamp,
        text: impl Into<String>,
    ) -> Self {
        Self {
            topic,
            id,
            author,
            sent_at,
            text: text.into(),
        }
    }

    /// Dedup key `(author, id)`.
    pub fn key(&self) -> MessageKey {
        MessageKey {
            author: self.author.clone(),
            id: self.id,
        }
    }
}

// =============================================================================
// PEER ADDRESS
// =============================================================================

/// UDP endpoint of a remote participant. Equality is by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerAddress {
    pub host: IpAddr,
    pub port: u16,
}

impl PeerAddress {
    pub const fn new(host: IpAddr, port: u16) -> Self {
        Self { host, port }
    }

    /// Parse `"ip:port"`, or a bare `"ip"` using `default_port`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shared_types::PeerAddress;
    ///
    /// let a = PeerAddress::parse_with_default_port("10.0.0.7", 3301).unwrap();
    /// let b: PeerAddress = "10.0.0.7:3301".parse().unwrap();
    /// assert_eq!(a, b);
    /// ```
    pub fn parse_with_default_port(s: &str, default_port: u16) -> Result<Self, EntityError> {
        let s = s.trim();
        if let Ok(host) = s.parse::<IpAddr>() {
            return Ok(Self::new(host, default_port));
        }
        s.parse()
    }

    pub fn to_socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl From<SocketAddr> for PeerAddress {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip(), addr.port())
    }
}

impl FromStr for PeerAddress {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<SocketAddr>()
            .map(Self::from)
            .map_err(|_| EntityError::InvalidPeerAddress(s.to_string()))
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_socket_addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::net::Ipv4Addr;

    #[test]
    fn test_topic_hash_is_sha1_of_room_name() {
        let topic = TopicHash::from_room_name("chatik");
        assert_eq!(topic.to_hex(), "b8092c0e67fbe36a46c0acf1f879002584f0250d");
        assert_eq!(topic, TopicHash::from_room_name("chatik"));
        assert_ne!(topic, TopicHash::from_room_name("alpha"));
    }

    #[test]
    fn test_topic_hash_hex_roundtrip() {
        let topic = TopicHash::from_room_name("alpha");
        let parsed = TopicHash::from_hex(&topic.to_hex()).unwrap();
        assert_eq!(parsed, topic);
        assert!(TopicHash::from_hex("abcd").is_err());
        assert!(TopicHash::from_hex("zz").is_err());
    }

    #[test]
    fn test_author_validation() {
        assert!(Author::new("deviceA").is_ok());
        assert!(Author::new("x".repeat(32)).is_ok());
        assert!(matches!(
            Author::new(""),
            Err(EntityError::InvalidAuthor { reason: "empty", .. })
        ));
        assert!(Author::new("x".repeat(33)).is_err());
        assert!(Author::new("a\0b").is_err());
    }

    #[test]
    fn test_message_key_distinguishes_authors() {
        let topic = TopicHash::from_room_name("chatik");
        let a = ChatMessage::new(topic, 1, Author::new("a").unwrap(), Timestamp::new(0), "x");
        let b = ChatMessage::new(topic, 1, Author::new("b").unwrap(), Timestamp::new(0), "x");
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key(), a.clone().key());
    }

    #[test]
    fn test_timestamp_age_saturates() {
        let sent = Timestamp::new(1_000);
        assert_eq!(sent.age_at(Timestamp::new(1_500)), 500);
        assert_eq!(sent.age_at(Timestamp::new(900)), 0);
        assert_eq!(Timestamp::new(10).saturating_sub_secs(20), Timestamp::new(0));
    }

    #[test]
    fn test_peer_address_parsing() {
        let with_port: PeerAddress = "192.168.1.5:3301".parse().unwrap();
        assert_eq!(with_port.host, IpAddr::V4(Ipv4Addr::new(192, 168, 1, 5)));
        assert_eq!(with_port.port, 3301);

        let bare = PeerAddress::parse_with_default_port("192.168.1.5", 3301).unwrap();
        assert_eq!(bare, with_port);

        assert!("not-an-address".parse::<PeerAddress>().is_err());
        assert_eq!(with_port.to_string(), "192.168.1.5:3301");
    }

    #[test]
    fn test_peer_address_set_is_idempotent() {
        let mut peers = HashSet::new();
        let addr: PeerAddress = "10.0.0.1:3301".parse().unwrap();
        assert!(peers.insert(addr));
        assert!(!peers.insert("10.0.0.1:3301".parse().unwrap()));
        assert_eq!(peers.len(), 1);
    }
}
