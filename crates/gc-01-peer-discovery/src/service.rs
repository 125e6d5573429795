//! # Discovery Poller
//!
//! Periodically asks the substrate for the peers of every joined topic and
//! feeds them to the sink. Topics are announced the first time they are seen.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::TopicHash;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::domain::{DiscoveryConfig, PollReport};
use crate::ports::{DiscoverySubstrate, PeerDiscoveryApi, PeerSink};

/// Drives a [`DiscoverySubstrate`] on behalf of a [`PeerSink`].
pub struct DiscoveryPoller<S: ?Sized, K: ?Sized> {
    substrate: Arc<S>,
    sink: Arc<K>,
    config: DiscoveryConfig,
    /// Topics already announced to the substrate.
    announced: Mutex<HashSet<TopicHash>>,
}

impl<S, K> DiscoveryPoller<S, K>
where
    S: DiscoverySubstrate + ?Sized,
    K: PeerSink + ?Sized,
{
    pub fn new(substrate: Arc<S>, sink: Arc<K>, config: DiscoveryConfig) -> Self {
        Self {
            substrate,
            sink,
            config,
            announced: Mutex::new(HashSet::new()),
        }
    }

    /// Poll every `poll_interval` until the task is aborted. The first poll
    /// runs immediately.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "[gc-01] Discovery poller started (every {}s)",
            self.config.poll_interval_secs
        );

        loop {
            ticker.tick().await;
            let report = self.poll_once().await;
            debug!(
                "[gc-01] Poll: {} topics, {} peers offered, {} failures",
                report.topics, report.offered, report.failures
            );
        }
    }

    async fn announce_if_new(&self, topic: TopicHash) {
        let fresh = self.announced.lock().insert(topic);
        if !fresh {
            return;
        }

        match self.substrate.announce(topic).await {
            Ok(()) => debug!("[gc-01] Announced topic {}", topic),
            Err(e) => {
                // Retried on the next poll.
                self.announced.lock().remove(&topic);
                warn!("[gc-01] Announce of {} failed: {}", topic, e);
            }
        }
    }
}

#[async_trait]
impl<S, K> PeerDiscoveryApi for DiscoveryPoller<S, K>
where
    S: DiscoverySubstrate + ?Sized,
    K: PeerSink + ?Sized,
{
    async fn poll_once(&self) -> PollReport {
        let topics = self.sink.joined_topics();
        let mut report = PollReport {
            topics: topics.len(),
            ..Default::default()
        };

        for topic in topics {
            self.announce_if_new(topic).await;

            match self.substrate.lookup_peers(topic).await {
                Ok(peers) => {
                    report.offered += peers.len();
                    if !peers.is_empty() {
                        self.sink.offer_peers(topic, peers);
                    }
                }
                Err(e) => {
                    report.failures += 1;
                    warn!("[gc-01] Lookup for {} failed: {}", topic, e);
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{InMemorySubstrate, RecordingSink};
    use shared_types::PeerAddress;
    use std::time::Duration;

    fn peer(n: u8) -> PeerAddress {
        format!("10.0.0.{n}:3301").parse().unwrap()
    }

    fn poller(
        substrate: &Arc<InMemorySubstrate>,
        sink: &Arc<RecordingSink>,
    ) -> DiscoveryPoller<InMemorySubstrate, RecordingSink> {
        DiscoveryPoller::new(
            Arc::clone(substrate),
            Arc::clone(sink),
            DiscoveryConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_poll_once_feeds_sink_per_topic() {
        let alpha = TopicHash::from_room_name("alpha");
        let beta = TopicHash::from_room_name("beta");
        let substrate = Arc::new(InMemorySubstrate::new());
        substrate.insert(alpha, peer(1));
        substrate.insert(alpha, peer(2));
        let sink = Arc::new(RecordingSink::with_topics(vec![alpha, beta]));

        let report = poller(&substrate, &sink).poll_once().await;

        assert_eq!(report, PollReport { topics: 2, offered: 2, failures: 0 });
        assert_eq!(sink.offers(), vec![(alpha, vec![peer(1), peer(2)])]);
    }

    #[tokio::test]
    async fn test_topics_announced_once() {
        let topic = TopicHash::from_room_name("chatik");
        let substrate = Arc::new(InMemorySubstrate::new());
        let sink = Arc::new(RecordingSink::with_topics(vec![topic]));
        let poller = poller(&substrate, &sink);

        poller.poll_once().await;
        poller.poll_once().await;

        assert_eq!(substrate.announcements(), vec![topic]);
    }

    #[tokio::test]
    async fn test_lookup_failure_continues_with_next_topic() {
        let alpha = TopicHash::from_room_name("alpha");
        let beta = TopicHash::from_room_name("beta");
        let substrate = Arc::new(InMemorySubstrate::new().failing_for(alpha));
        substrate.insert(beta, peer(3));
        let sink = Arc::new(RecordingSink::with_topics(vec![alpha, beta]));

        let report = poller(&substrate, &sink).poll_once().await;

        assert_eq!(report.failures, 1);
        assert_eq!(sink.offers(), vec![(beta, vec![peer(3)])]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_polls_every_interval() {
        let topic = TopicHash::from_room_name("chatik");
        let substrate = Arc::new(InMemorySubstrate::new());
        substrate.insert(topic, peer(1));
        let sink = Arc::new(RecordingSink::with_topics(vec![topic]));

        let task = tokio::spawn(Arc::new(poller(&substrate, &sink)).run());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(sink.offers().len(), 1, "first poll is immediate");

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(sink.offers().len(), 3);

        task.abort();
    }
}
