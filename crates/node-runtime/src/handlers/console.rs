//! # Console Handler
//!
//! Reads chat lines and posts them to the active room. Each non-blank line
//! becomes one message. End of input stops this handler only; the node keeps
//! relaying for others.

use std::sync::Arc;

use shared_types::TopicHash;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use gc_02_room_gossip::RoomRegistryApi;

/// Posts lines from an input stream into one room.
pub struct ConsoleHandler<R: ?Sized> {
    registry: Arc<R>,
    topic: TopicHash,
}

impl<R: RoomRegistryApi + ?Sized> ConsoleHandler<R> {
    pub fn new(registry: Arc<R>, topic: TopicHash) -> Self {
        Self { registry, topic }
    }

    /// Read from process stdin.
    pub async fn run_stdin(self) -> usize {
        self.run(BufReader::new(tokio::io::stdin())).await
    }

    /// Read lines until EOF. Returns how many messages were posted.
    pub async fn run<Rd>(self, reader: Rd) -> usize
    where
        Rd: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut posted = 0;

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if self.handle_line(&line) {
                        posted += 1;
                    }
                }
                Ok(None) => {
                    info!("[console] Input closed; still relaying");
                    break;
                }
                Err(e) => {
                    warn!("[console] Read error: {}", e);
                    break;
                }
            }
        }

        posted
    }

    fn handle_line(&self, line: &str) -> bool {
        let text = line.trim_end_matches('\r');
        if text.trim().is_empty() {
            return false;
        }

        match self.registry.post(self.topic, text) {
            Ok(message) => {
                debug!("[console] Posted #{} ({} bytes)", message.id, text.len());
                true
            }
            Err(e) => {
                warn!("[console] Message not sent: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gc_02_room_gossip::test_utils::{FixedTimeSource, RecordingTransport};
    use gc_02_room_gossip::{GossipConfig, RoomRegistry};
    use shared_types::Author;

    fn registry() -> Arc<RoomRegistry<RecordingTransport, FixedTimeSource>> {
        Arc::new(RoomRegistry::new(
            GossipConfig::default(),
            Author::new("deviceA").unwrap(),
            Arc::new(RecordingTransport::new()),
            Arc::new(FixedTimeSource::new(1_700_000_000)),
        ))
    }

    #[tokio::test]
    async fn test_lines_become_messages() {
        let registry = registry();
        let topic = registry.join("chatik");
        let input: &[u8] = b"hello\n\n   \nsecond line\r\n";

        let posted = ConsoleHandler::new(Arc::clone(&registry), topic)
            .run(input)
            .await;

        assert_eq!(posted, 2);
        let room = registry.room(&topic).unwrap();
        let texts: Vec<String> = room.outbox.drain().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["hello", "second line"]);
    }

    #[tokio::test]
    async fn test_oversized_line_is_skipped() {
        let registry = registry();
        let topic = registry.join("chatik");
        let input = format!("{}\nok\n", "x".repeat(2_000));

        let posted = ConsoleHandler::new(Arc::clone(&registry), topic)
            .run(input.as_bytes())
            .await;

        assert_eq!(posted, 1);
        let room = registry.room(&topic).unwrap();
        let ids: Vec<u32> = room.outbox.drain().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1]);
    }
}
