//! Inbound ports (API) for the Room Gossip subsystem.

use shared_types::{ChatMessage, PeerAddress, TopicHash};

use crate::events::GossipError;

/// Primary API of the room registry.
///
/// One registry represents one local author; it is the only writer of
/// message ids and the only owner of the room map.
pub trait RoomRegistryApi: Send + Sync {
    /// Join a room by name and start its dissemination loop.
    ///
    /// Idempotent: joining twice returns the same topic and starts nothing new.
    fn join(&self, room_name: &str) -> TopicHash;

    /// Allocate the next message id for the local author and stamp it.
    ///
    /// # Errors
    ///
    /// `MessageTooLarge` if the text would not fit one datagram,
    /// `IdsExhausted` once id `u32::MAX` has been handed out.
    fn allocate_message(&self, topic: TopicHash, text: &str) -> Result<ChatMessage, GossipError>;

    /// Allocate a message and queue it in the room's outbox.
    ///
    /// # Errors
    ///
    /// `RoomNotJoined` for unknown topics, otherwise as above.
    fn post(&self, topic: TopicHash, text: &str) -> Result<ChatMessage, GossipError>;

    /// Decode a datagram and hand it to its room.
    ///
    /// On success returns the topic the datagram was routed to.
    ///
    /// # Errors
    ///
    /// `MalformedDatagram` if decoding fails, `UnknownTopic` if no joined
    /// room matches. Neither mutates any room.
    fn route_inbound(&self, datagram: &[u8], source: PeerAddress)
        -> Result<TopicHash, GossipError>;

    /// Queue discovered peers in a room's intake.
    fn offer_peers(&self, topic: TopicHash, peers: Vec<PeerAddress>) -> Result<(), GossipError>;

    /// Topics of every joined room.
    fn joined_topics(&self) -> Vec<TopicHash>;
}
