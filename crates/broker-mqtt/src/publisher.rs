use async_trait::async_trait;
use moode2mqtt_core::{details_text, AudioSource, BrokerError, StatePublisher};
use rumqttc::{AsyncClient, ConnectReturnCode, Event, MqttOptions, Packet, QoS};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

const CLIENT_ID: &str = "moode2mqtt";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Broker connection settings and topic names
#[derive(Clone, Debug)]
pub struct BrokerOptions {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub source_topic: String,
    pub details_topic: String,
    pub command_topic: String,
}

/// MQTT-backed state publisher
///
/// Owns one broker session at a time. After a successful handshake the event
/// loop moves to a spawned task that maintains the connected flag and hands
/// inbound command-topic payloads to the relay channel. A publish failure or
/// event-loop error marks the session disconnected; the monitor loop decides
/// when to reconnect. Nothing is queued across disconnects.
pub struct MqttPublisher {
    options: BrokerOptions,
    client: Option<AsyncClient>,
    connected: Arc<AtomicBool>,
    commands: mpsc::Sender<String>,
    event_task: Option<JoinHandle<()>>,
}

impl MqttPublisher {
    pub fn new(options: BrokerOptions, commands: mpsc::Sender<String>) -> Self {
        Self {
            options,
            client: None,
            connected: Arc::new(AtomicBool::new(false)),
            commands,
            event_task: None,
        }
    }

    async fn publish(&mut self, topic: String, payload: String) -> Result<(), BrokerError> {
        if !self.is_connected() {
            return Err(BrokerError::NotConnected);
        }
        let client = self.client.as_ref().ok_or(BrokerError::NotConnected)?;

        // QoS 1, retained: a late-joining consumer sees the current state.
        match client
            .publish(topic.as_str(), QoS::AtLeastOnce, true, payload)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) => {
                self.connected.store(false, Ordering::SeqCst);
                Err(BrokerError::Publish {
                    topic,
                    reason: e.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl StatePublisher for MqttPublisher {
    /// Establish a fresh broker session, wait (bounded) for the CONNACK, and
    /// subscribe the command topic. Any previous session is torn down first.
    async fn connect(&mut self) -> Result<(), BrokerError> {
        if let Some(task) = self.event_task.take() {
            task.abort();
        }
        self.client = None;
        self.connected.store(false, Ordering::SeqCst);

        let mut mqtt_options =
            MqttOptions::new(CLIENT_ID, self.options.host.clone(), self.options.port);
        mqtt_options.set_keep_alive(KEEP_ALIVE);
        if let (Some(username), Some(password)) =
            (&self.options.username, &self.options.password)
        {
            mqtt_options.set_credentials(username.clone(), password.clone());
        }

        let (client, mut event_loop) = AsyncClient::new(mqtt_options, 16);

        let ack = timeout(CONNECT_TIMEOUT, async {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(ack))) => return Ok(ack),
                    Ok(_) => continue,
                    Err(e) => return Err(BrokerError::Unreachable(e.to_string())),
                }
            }
        })
        .await
        .map_err(|_| BrokerError::Unreachable("broker handshake timed out".to_string()))??;

        if ack.code != ConnectReturnCode::Success {
            return Err(BrokerError::Refused(connack_message(ack.code).to_string()));
        }
        tracing::info!(
            "connected to MQTT broker at {}:{}",
            self.options.host,
            self.options.port
        );

        client
            .subscribe(self.options.command_topic.as_str(), QoS::AtLeastOnce)
            .await
            .map_err(|e| BrokerError::Unreachable(e.to_string()))?;

        let connected = Arc::clone(&self.connected);
        let commands = self.commands.clone();
        let command_topic = self.options.command_topic.clone();
        connected.store(true, Ordering::SeqCst);

        self.event_task = Some(tokio::spawn(async move {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        if publish.topic == command_topic {
                            let payload = String::from_utf8_lossy(&publish.payload).to_string();
                            if commands.send(payload).await.is_err() {
                                // relay is gone; nothing left to deliver to
                                break;
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("MQTT event loop error: {}", e);
                        connected.store(false, Ordering::SeqCst);
                        break;
                    }
                }
            }
        }));
        self.client = Some(client);

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.client.is_some() && self.connected.load(Ordering::SeqCst)
    }

    async fn publish_source(&mut self, source: AudioSource) -> Result<(), BrokerError> {
        let topic = self.options.source_topic.clone();
        self.publish(topic, source.as_str().to_string()).await
    }

    async fn publish_details(
        &mut self,
        details: &BTreeMap<String, String>,
    ) -> Result<(), BrokerError> {
        // An empty payload clears the retained details left by the previous
        // source.
        let topic = self.options.details_topic.clone();
        self.publish(topic, details_text(details)).await
    }
}

impl Drop for MqttPublisher {
    fn drop(&mut self) {
        if let Some(task) = self.event_task.take() {
            task.abort();
        }
    }
}

/// Human-readable CONNACK refusal reasons
fn connack_message(code: ConnectReturnCode) -> &'static str {
    match code {
        ConnectReturnCode::Success => "connection accepted",
        ConnectReturnCode::RefusedProtocolVersion => "incorrect protocol version",
        ConnectReturnCode::BadClientId => "invalid client identifier",
        ConnectReturnCode::ServiceUnavailable => "server unavailable",
        ConnectReturnCode::BadUserNamePassword => "bad username or password",
        ConnectReturnCode::NotAuthorized => "not authorized",
    }
}
