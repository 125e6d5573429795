//! # Room Registry
//!
//! Owns the room map, the local author's id counter and the transport, and
//! starts one worker task per joined room.
//!
//! ## Thread Safety
//!
//! The registry is shared across tasks via `Arc`. The room map is behind a
//! `RwLock`; rooms themselves only see insert-if-absent writes.

use parking_lot::{Mutex, RwLock};
use shared_types::{Author, ChatMessage, PeerAddress, TopicHash};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{invariant_datagram_size, wire, Delivery, GossipConfig, Room};
use crate::events::GossipError;
use crate::ports::inbound::RoomRegistryApi;
use crate::ports::outbound::{DatagramTransport, TimeSource};
use crate::service::gossip::run_room_worker;

/// Room registry for one local author.
///
/// ## Dependencies
///
/// - `T: DatagramTransport` - outbound datagrams (the bound UDP socket in production)
/// - `C: TimeSource` - timestamps for allocation, retention and eviction
pub struct RoomRegistry<T, C>
where
    T: DatagramTransport + 'static,
    C: TimeSource + 'static,
{
    /// Gossip tunables shared by every room.
    config: GossipConfig,
    /// The author this process speaks as.
    author: Author,
    /// Last allocated message id.
    last_id: AtomicU32,
    /// Joined rooms by topic.
    rooms: RwLock<HashMap<TopicHash, Arc<Room>>>,
    /// Room worker tasks.
    workers: Mutex<Vec<JoinHandle<()>>>,
    transport: Arc<T>,
    clock: Arc<C>,
}

impl<T, C> RoomRegistry<T, C>
where
    T: DatagramTransport + 'static,
    C: TimeSource + 'static,
{
    pub fn new(config: GossipConfig, author: Author, transport: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            config,
            author,
            last_id: AtomicU32::new(0),
            rooms: RwLock::new(HashMap::new()),
            workers: Mutex::new(Vec::new()),
            transport,
            clock,
        }
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn config(&self) -> &GossipConfig {
        &self.config
    }

    /// Look up a joined room.
    pub fn room(&self, topic: &TopicHash) -> Option<Arc<Room>> {
        self.rooms.read().get(topic).cloned()
    }

    /// Every joined room.
    pub fn rooms(&self) -> Vec<Arc<Room>> {
        self.rooms.read().values().cloned().collect()
    }

    /// Abort every room worker and log final room statistics.
    ///
    /// In-flight ticks and queued deliveries are dropped.
    pub fn shutdown(&self) {
        for handle in self.workers.lock().drain(..) {
            handle.abort();
        }

        let now = self.clock.now();
        for room in self.rooms() {
            let stats = room.stats(now, self.config.retention_secs);
            info!(
                "[gc-02] Room '{}' closed: {} messages ({} live), {} peers",
                room.name(),
                stats.history,
                stats.live,
                stats.peers
            );
        }
    }

    fn require_room(&self, topic: TopicHash) -> Result<Arc<Room>, GossipError> {
        self.room(&topic).ok_or(GossipError::RoomNotJoined(topic))
    }
}

impl<T, C> RoomRegistryApi for RoomRegistry<T, C>
where
    T: DatagramTransport + 'static,
    C: TimeSource + 'static,
{
    /// Must be called from within a tokio runtime (spawns the room worker).
    fn join(&self, room_name: &str) -> TopicHash {
        let room = {
            let mut rooms = self.rooms.write();
            let topic = TopicHash::from_room_name(room_name);
            if rooms.contains_key(&topic) {
                return topic;
            }
            let room = Arc::new(Room::new(room_name));
            rooms.insert(topic, Arc::clone(&room));
            room
        };

        let handle = tokio::spawn(run_room_worker(
            Arc::clone(&room),
            Arc::clone(&self.transport),
            Arc::clone(&self.clock),
            self.config.clone(),
        ));
        self.workers.lock().push(handle);

        info!("[gc-02] Joined room '{}' (topic {})", room.name(), room.topic());
        room.topic()
    }

    fn allocate_message(&self, topic: TopicHash, text: &str) -> Result<ChatMessage, GossipError> {
        if !invariant_datagram_size(text.len(), &self.config) {
            return Err(GossipError::MessageTooLarge {
                size: wire::encoded_len(text.len()),
                max: self.config.max_datagram_bytes,
            });
        }

        // Ids never wrap: a reused id would collide with history peers still hold.
        let id = self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .map_err(|_| {
                warn!("[gc-02] Message ids exhausted for '{}'", self.author);
                GossipError::IdsExhausted
            })?
            + 1;
        Ok(ChatMessage::new(
            topic,
            id,
            self.author.clone(),
            self.clock.now(),
            text,
        ))
    }

    fn post(&self, topic: TopicHash, text: &str) -> Result<ChatMessage, GossipError> {
        let room = self.require_room(topic)?;
        let message = self.allocate_message(topic, text)?;
        room.outbox.push(message.clone());
        Ok(message)
    }

    fn route_inbound(
        &self,
        datagram: &[u8],
        source: PeerAddress,
    ) -> Result<TopicHash, GossipError> {
        let message = wire::decode(datagram)?;
        let topic = message.topic;

        let Some(room) = self.room(&topic) else {
            return Err(GossipError::UnknownTopic(topic));
        };

        let first_seen = room.merge(message.clone());
        if room.add_peer(source) {
            info!("[gc-02] New peer {} in '{}' (inbound)", source, room.name());
        }
        debug!(
            "[gc-02] {}#{} from {} -> '{}' (first_seen={})",
            message.author,
            message.id,
            source,
            room.name(),
            first_seen
        );
        room.mailbox.push(Delivery {
            message,
            source,
            first_seen,
        });

        Ok(topic)
    }

    fn offer_peers(&self, topic: TopicHash, peers: Vec<PeerAddress>) -> Result<(), GossipError> {
        let room = self.require_room(topic)?;
        for peer in peers {
            room.intake.push(peer);
        }
        Ok(())
    }

    fn joined_topics(&self) -> Vec<TopicHash> {
        let mut topics: Vec<TopicHash> = self.rooms.read().keys().copied().collect();
        topics.sort();
        topics
    }
}

impl<T, C> Drop for RoomRegistry<T, C>
where
    T: DatagramTransport + 'static,
    C: TimeSource + 'static,
{
    fn drop(&mut self) {
        for handle in self.workers.get_mut().drain(..) {
            handle.abort();
        }
    }
}
