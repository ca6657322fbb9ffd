mod config;

use anyhow::Result;
use clap::Parser;
use config::Config;
use moode2mqtt_broker::{BrokerOptions, CommandRelay, MqttPublisher};
use moode2mqtt_core::{Monitor, StatePublisher};
use moode2mqtt_player::MoodeClient;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Publish moOde playback state over MQTT
#[derive(Parser, Debug)]
#[command(name = "moode2mqtt", version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "moode2mqtt.toml")]
    config: PathBuf,

    /// Log at debug level regardless of the config flag
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_missing = !args.config.exists();
    let config = Config::load(&args.config)?;
    let debug = args.debug || config.debug;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| if debug { "debug".into() } else { "info".into() }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting moode2mqtt");
    if config_missing {
        tracing::warn!(
            "config file {} not found, using default settings",
            args.config.display()
        );
    }

    let player = MoodeClient::new(config.moode_host.clone());

    let (command_tx, command_rx) = mpsc::channel(16);
    let mut publisher = MqttPublisher::new(broker_options(&config), command_tx);

    // Best-effort first connect; the monitor loop reconnects with backoff.
    if let Err(e) = publisher.connect().await {
        tracing::warn!("initial broker connection failed: {}", e);
    }

    // The relay gets its own controller client, so inbound commands never
    // contend with the polling cycle.
    let relay = CommandRelay::new(command_rx, player.clone());
    tokio::spawn(relay.run());

    let mut monitor = Monitor::new(
        player,
        publisher,
        Duration::from_secs(config.poll_interval_secs.max(1)),
    );

    tracing::info!(
        "monitoring playback state of {} every {}s",
        config.moode_host,
        config.poll_interval_secs.max(1)
    );

    tokio::select! {
        _ = monitor.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received, stopping monitor");
        }
    }

    Ok(())
}

fn broker_options(config: &Config) -> BrokerOptions {
    BrokerOptions {
        host: config.mqtt_server.clone(),
        port: config.mqtt_port,
        username: config.mqtt_username.clone(),
        password: config.mqtt_password.clone(),
        source_topic: config.source_topic.clone(),
        details_topic: config.details_topic.clone(),
        command_topic: config.command_topic.clone(),
    }
}
