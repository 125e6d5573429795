//! # Room State
//!
//! Per-topic state: message history, known peers and three queues.
//!
//! ```text
//!   dispatcher ──Delivery──→ [mailbox] ──→ room worker (first-seen log)
//!   discovery ──PeerAddress→ [intake]  ──→ peers
//!   local input ─ChatMessage→ [outbox] ──→ history (local echo)
//! ```
//!
//! History and peers only ever grow by insert-if-absent, so concurrent
//! writers never need more than the map lock itself. The single removal path
//! is [`Room::evict_older_than`], driven by the eviction sweep.

use parking_lot::{Mutex, RwLock};
use shared_types::{ChatMessage, MessageKey, PeerAddress, Timestamp, TopicHash};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

use super::{invariant_retention, RoomStats};

/// An inbound message handed to a room's mailbox by the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    /// The decoded message.
    pub message: ChatMessage,
    /// Where the datagram came from.
    pub source: PeerAddress,
    /// `true` if this delivery added the message to history.
    pub first_seen: bool,
}

/// Unbounded FIFO with a wake-up signal for its consumer.
///
/// Producers never block; the consumer awaits [`Queue::ready`] and then
/// drains everything queued so far.
pub struct Queue<T> {
    items: Mutex<VecDeque<T>>,
    notify: Notify,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
        }
    }

    /// Enqueue an item and wake the consumer.
    pub fn push(&self, item: T) {
        self.items.lock().push_back(item);
        self.notify.notify_one();
    }

    /// Take every queued item in FIFO order.
    pub fn drain(&self) -> Vec<T> {
        self.items.lock().drain(..).collect()
    }

    /// Resolves once something was pushed since the last wake-up.
    pub async fn ready(&self) {
        self.notify.notified().await;
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A joined chat room.
pub struct Room {
    topic: TopicHash,
    name: String,
    history: RwLock<HashMap<MessageKey, ChatMessage>>,
    peers: RwLock<HashSet<PeerAddress>>,
    /// Dissemination rounds run so far.
    rounds: AtomicUsize,
    /// Inbound deliveries from the dispatcher.
    pub mailbox: Queue<Delivery>,
    /// Peers reported by discovery, not yet merged.
    pub intake: Queue<PeerAddress>,
    /// Locally authored messages, not yet merged.
    pub outbox: Queue<ChatMessage>,
}

impl Room {
    /// Create an empty room for a human-readable name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            topic: TopicHash::from_room_name(&name),
            name,
            history: RwLock::new(HashMap::new()),
            peers: RwLock::new(HashSet::new()),
            rounds: AtomicUsize::new(0),
            mailbox: Queue::new(),
            intake: Queue::new(),
            outbox: Queue::new(),
        }
    }

    pub fn topic(&self) -> TopicHash {
        self.topic
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    /// Insert a message unless `(author, id)` is already present.
    ///
    /// Returns `true` if the message was new.
    pub fn merge(&self, message: ChatMessage) -> bool {
        let key = message.key();
        let mut history = self.history.write();
        if history.contains_key(&key) {
            return false;
        }
        history.insert(key, message);
        true
    }

    pub fn contains(&self, key: &MessageKey) -> bool {
        self.history.read().contains_key(key)
    }

    pub fn get(&self, key: &MessageKey) -> Option<ChatMessage> {
        self.history.read().get(key).cloned()
    }

    pub fn history_len(&self) -> usize {
        self.history.read().len()
    }

    /// Copy of the history ordered by send time, then author and id.
    pub fn history_snapshot(&self) -> Vec<ChatMessage> {
        let mut entries: Vec<ChatMessage> = self.history.read().values().cloned().collect();
        entries.sort_by(|a, b| {
            (a.sent_at, &a.author, a.id).cmp(&(b.sent_at, &b.author, b.id))
        });
        entries
    }

    /// Remove entries sent before `cutoff`. Returns how many were removed.
    pub fn evict_older_than(&self, cutoff: Timestamp) -> usize {
        let mut history = self.history.write();
        let before = history.len();
        history.retain(|_, message| message.sent_at >= cutoff);
        before - history.len()
    }

    // -------------------------------------------------------------------------
    // Peers
    // -------------------------------------------------------------------------

    /// Add a peer. Returns `true` if it was not known yet.
    pub fn add_peer(&self, peer: PeerAddress) -> bool {
        self.peers.write().insert(peer)
    }

    pub fn has_peer(&self, peer: &PeerAddress) -> bool {
        self.peers.read().contains(peer)
    }

    pub fn peer_count(&self) -> usize {
        self.peers.read().len()
    }

    /// Copy of the peer set in address order.
    pub fn peers_snapshot(&self) -> Vec<PeerAddress> {
        let mut peers: Vec<PeerAddress> = self.peers.read().iter().copied().collect();
        peers.sort();
        peers
    }

    /// Start a dissemination round. Returns its number, from 0.
    pub fn next_round(&self) -> usize {
        self.rounds.fetch_add(1, Ordering::Relaxed)
    }

    // -------------------------------------------------------------------------
    // Queue draining
    // -------------------------------------------------------------------------

    /// Merge queued discovery results into the peer set.
    ///
    /// Returns the peers that were new.
    pub fn absorb_intake(&self) -> Vec<PeerAddress> {
        self.intake
            .drain()
            .into_iter()
            .filter(|peer| self.add_peer(*peer))
            .collect()
    }

    /// Merge queued local messages into history (local echo).
    ///
    /// Returns the messages that were new.
    pub fn absorb_outbox(&self) -> Vec<ChatMessage> {
        self.outbox
            .drain()
            .into_iter()
            .filter(|message| self.merge(message.clone()))
            .collect()
    }

    /// Take queued inbound deliveries.
    pub fn take_deliveries(&self) -> Vec<Delivery> {
        self.mailbox.drain()
    }

    pub fn stats(&self, now: Timestamp, retention_secs: u32) -> RoomStats {
        let history = self.history.read();
        RoomStats {
            history: history.len(),
            live: history
                .values()
                .filter(|m| invariant_retention(m, now, retention_secs))
                .count(),
            peers: self.peer_count(),
        }
    }
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("name", &self.name)
            .field("topic", &self.topic)
            .field("history", &self.history_len())
            .field("peers", &self.peer_count())
            .finish()
    }
}
