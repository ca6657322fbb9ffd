use moode2mqtt_core::CommandSink;
use tokio::sync::mpsc;

/// Forwards command-topic payloads to the player controller.
///
/// Runs independently of the polling cycle; it only consumes the inbound
/// channel fed by the broker session's event task, so it never contends with
/// the publisher for outbound traffic. Forwarding failures are logged and the
/// payload dropped; a bad command must never take the process down.
pub struct CommandRelay<C> {
    commands: mpsc::Receiver<String>,
    sink: C,
}

impl<C: CommandSink> CommandRelay<C> {
    pub fn new(commands: mpsc::Receiver<String>, sink: C) -> Self {
        Self { commands, sink }
    }

    /// Run until every sender (the broker session) is gone.
    pub async fn run(mut self) {
        while let Some(payload) = self.commands.recv().await {
            tracing::debug!("relaying command: {}", payload);
            if let Err(e) = self.sink.send_command(&payload).await {
                tracing::warn!("command relay failed, dropping {:?}: {}", payload, e);
            }
        }
        tracing::debug!("command channel closed, relay stopping");
    }
}
