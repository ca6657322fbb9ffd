use crate::error::{BrokerError, SourceError};
use crate::models::{AudioSource, RawStatus};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Reads raw playback state from the player controller.
#[async_trait]
pub trait PlayerStateSource: Send + Sync {
    /// Fetch the current status. Implementations must bound the query with a
    /// timeout and must not retry internally; retry policy belongs to the
    /// monitor loop.
    async fn fetch(&self) -> Result<RawStatus, SourceError>;
}

/// Publishes normalized state to the broker's fixed topics.
#[async_trait]
pub trait StatePublisher: Send + Sync {
    /// Establish (or re-establish) the broker session.
    async fn connect(&mut self) -> Result<(), BrokerError>;

    fn is_connected(&self) -> bool;

    /// Publish the source category display name on the source topic.
    async fn publish_source(&mut self, source: AudioSource) -> Result<(), BrokerError>;

    /// Publish the details mapping on the details topic.
    async fn publish_details(
        &mut self,
        details: &BTreeMap<String, String>,
    ) -> Result<(), BrokerError>;
}

/// Forwards a relayed command payload to the player controller.
#[async_trait]
pub trait CommandSink: Send + Sync {
    async fn send_command(&self, payload: &str) -> Result<(), SourceError>;
}
