//! Inbound ports (API) for the Peer Discovery subsystem.

use async_trait::async_trait;

use crate::domain::PollReport;

/// Primary API of the discovery poller.
#[async_trait]
pub trait PeerDiscoveryApi: Send + Sync {
    /// Announce any newly joined topics, then look up peers for every
    /// joined topic once and hand them to the sink.
    ///
    /// Lookup failures are counted in the report, never returned.
    async fn poll_once(&self) -> PollReport;
}
