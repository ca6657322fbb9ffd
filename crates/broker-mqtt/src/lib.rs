//! MQTT broker integration
//!
//! Publishes normalized playback state to the source and details topics, and
//! relays inbound command-topic payloads to the player controller.

pub mod publisher;
pub mod relay;

pub use publisher::{BrokerOptions, MqttPublisher};
pub use relay::CommandRelay;
