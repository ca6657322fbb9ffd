use thiserror::Error;

/// Player controller query failures. Never fatal: the monitor loop logs and
/// skips the cycle.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("player controller unreachable: {0}")]
    Unreachable(String),

    #[error("player controller query timed out")]
    Timeout,

    #[error("malformed player controller response: {0}")]
    Malformed(String),
}

/// Broker session failures. Never fatal: the monitor loop reconnects with
/// backoff.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("broker unreachable: {0}")]
    Unreachable(String),

    #[error("broker refused connection: {0}")]
    Refused(String),

    #[error("not connected to broker")]
    NotConnected,

    #[error("publish to {topic} failed: {reason}")]
    Publish { topic: String, reason: String },
}
