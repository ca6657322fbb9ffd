use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Runtime configuration, loaded from a TOML file. Every key has a default so
/// a partial (or absent) file still yields a working monitor against a local
/// broker and player.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_mqtt_server")]
    pub mqtt_server: String,
    #[serde(default = "default_mqtt_port")]
    pub mqtt_port: u16,
    #[serde(default)]
    pub mqtt_username: Option<String>,
    #[serde(default)]
    pub mqtt_password: Option<String>,
    #[serde(default = "default_source_topic")]
    pub source_topic: String,
    #[serde(default = "default_details_topic")]
    pub details_topic: String,
    #[serde(default = "default_command_topic")]
    pub command_topic: String,
    #[serde(default = "default_moode_host")]
    pub moode_host: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub debug: bool,
}

fn default_mqtt_server() -> String {
    "localhost".to_string()
}

fn default_mqtt_port() -> u16 {
    1883
}

fn default_source_topic() -> String {
    "moode/audio/source".to_string()
}

fn default_details_topic() -> String {
    "moode/audio/details".to_string()
}

fn default_command_topic() -> String {
    "moode/audio/command".to_string()
}

fn default_moode_host() -> String {
    "localhost".to_string()
}

fn default_poll_interval_secs() -> u64 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mqtt_server: default_mqtt_server(),
            mqtt_port: default_mqtt_port(),
            mqtt_username: None,
            mqtt_password: None,
            source_topic: default_source_topic(),
            details_topic: default_details_topic(),
            command_topic: default_command_topic(),
            moode_host: default_moode_host(),
            poll_interval_secs: default_poll_interval_secs(),
            debug: false,
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to full defaults when the
    /// file does not exist. A present-but-invalid file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        Ok(config)
    }
}
