//! # Dissemination Engine
//!
//! Epidemic flood: every tick, every live history entry goes to every known
//! peer. There is no per-peer bookkeeping of what was already delivered; the
//! receiver's `(author, id)` merge makes redundant delivery harmless, at a
//! cost of `|peers| × |live history|` datagrams per tick.
//!
//! The room worker owns the timers of one room and is the consumer of its
//! three queues, so rooms never block each other.

use std::sync::Arc;

use shared_types::Timestamp;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::domain::{invariant_retention, wire, GossipConfig, Room, TickReport};
use crate::ports::outbound::{DatagramTransport, TimeSource};

/// Run one dissemination tick for a room.
///
/// Snapshots peers and history, then sends each entry no older than
/// `retention_secs` to each peer. Expired entries are skipped but stay in
/// history. Send failures are logged and counted, never retried.
///
/// Both the peer order and the message order start one step further each
/// round, so a send buffer that fills up mid-tick drops a different tail
/// next time.
pub fn disseminate<T>(room: &Room, transport: &T, now: Timestamp, retention_secs: u32) -> TickReport
where
    T: DatagramTransport + ?Sized,
{
    let mut peers = room.peers_snapshot();
    let (live, expired): (Vec<_>, Vec<_>) = room
        .history_snapshot()
        .into_iter()
        .partition(|message| invariant_retention(message, now, retention_secs));

    let mut report = TickReport {
        peers: peers.len(),
        eligible: live.len(),
        skipped_expired: expired.len(),
        ..Default::default()
    };

    if peers.is_empty() || live.is_empty() {
        return report;
    }

    let round = room.next_round();
    peers.rotate_left(round % report.peers);

    // Encode once, fan out to all peers.
    let mut datagrams: Vec<Vec<u8>> = live.iter().map(wire::encode).collect();
    datagrams.rotate_left(round % report.eligible);

    for peer in &peers {
        for datagram in &datagrams {
            match transport.send_to(datagram, *peer) {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!("[gc-02] {}", e);
                }
            }
        }
    }

    report
}

/// Drive one room until the task is aborted.
///
/// ## Loop
///
/// - gossip tick: merge pending queues, then [`disseminate`]
/// - eviction tick: drop entries older than the history horizon
/// - outbox ready: merge local messages into history (local echo)
/// - intake ready: merge discovered peers
/// - mailbox ready: surface first-seen inbound messages
pub async fn run_room_worker<T, C>(
    room: Arc<Room>,
    transport: Arc<T>,
    clock: Arc<C>,
    config: GossipConfig,
) where
    T: DatagramTransport + ?Sized,
    C: TimeSource + ?Sized,
{
    let start = Instant::now();
    let mut gossip = interval_at(start + config.gossip_interval(), config.gossip_interval());
    gossip.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut eviction = interval_at(
        start + config.eviction_interval(),
        config.eviction_interval(),
    );
    eviction.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!("[gc-02] Room worker started for '{}'", room.name());

    loop {
        tokio::select! {
            _ = gossip.tick() => {
                absorb_outbox(&room);
                absorb_intake(&room);
                let now = clock.now();
                let report = disseminate(&*room, &*transport, now, config.retention_secs);
                debug!(
                    "[gc-02] Tick '{}': {} peers x {} live = {} sent, {} failed, {} expired",
                    room.name(),
                    report.peers,
                    report.eligible,
                    report.sent,
                    report.failed,
                    report.skipped_expired,
                );
            }
            _ = eviction.tick() => {
                let cutoff = clock.now().saturating_sub_secs(config.history_horizon_secs);
                let evicted = room.evict_older_than(cutoff);
                if evicted > 0 {
                    info!(
                        "[gc-02] Evicted {} entries older than {} from '{}'",
                        evicted,
                        cutoff,
                        room.name()
                    );
                }
            }
            _ = room.outbox.ready() => absorb_outbox(&room),
            _ = room.intake.ready() => absorb_intake(&room),
            _ = room.mailbox.ready() => {
                for delivery in room.take_deliveries() {
                    if delivery.first_seen {
                        let message = &delivery.message;
                        info!(
                            target: "chat",
                            "[{}] <{}> {}",
                            room.name(),
                            message.author,
                            message.text
                        );
                    }
                }
            }
        }
    }
}

fn absorb_outbox(room: &Room) {
    for message in room.absorb_outbox() {
        debug!(
            "[gc-02] Local message {}#{} queued for '{}'",
            message.author,
            message.id,
            room.name()
        );
    }
}

fn absorb_intake(room: &Room) {
    for peer in room.absorb_intake() {
        info!("[gc-02] New peer {} in '{}'", peer, room.name());
    }
}
