use crate::models::{CurrentSong, PlaybackStatus, RendererStatus};
use async_trait::async_trait;
use moode2mqtt_core::{CommandSink, PlayerStateSource, RawStatus, SourceError};
use reqwest::Client;
use std::time::Duration;

const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// moOde player client using the local HTTP command API
///
/// API format: http://{host}/command/?cmd={command}
///
/// Cheap to clone; the underlying HTTP client is shared.
#[derive(Clone)]
pub struct MoodeClient {
    host: String,
    client: Client,
}

impl MoodeClient {
    pub fn new(host: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(QUERY_TIMEOUT)
            .build()
            .unwrap();

        Self {
            host: host.into(),
            client,
        }
    }

    /// Execute a moOde command-API query and return the response body.
    async fn execute_command(&self, command: &str) -> Result<String, SourceError> {
        let url = format!("http://{}/command/?cmd={}", self.host, command);
        tracing::debug!("moOde API call: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout
            } else {
                SourceError::Unreachable(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(SourceError::Malformed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))
    }

    fn parse<T: serde::de::DeserializeOwned>(body: &str, command: &str) -> Result<T, SourceError> {
        serde_json::from_str(body)
            .map_err(|e| SourceError::Malformed(format!("{} response: {}", command, e)))
    }
}

#[async_trait]
impl PlayerStateSource for MoodeClient {
    /// Read one raw snapshot: daemon status, current song tags, and renderer
    /// activity flags. Each request carries the client timeout; no retries.
    async fn fetch(&self) -> Result<RawStatus, SourceError> {
        let status: PlaybackStatus =
            Self::parse(&self.execute_command("status").await?, "status")?;
        let song: CurrentSong =
            Self::parse(&self.execute_command("currentsong").await?, "currentsong")?;
        let renderers: RendererStatus = Self::parse(
            &self.execute_command("get_renderer_status").await?,
            "get_renderer_status",
        )?;

        Ok(assemble(status, song, renderers))
    }
}

#[async_trait]
impl CommandSink for MoodeClient {
    /// Forward a relayed payload to the controller's command interface
    /// unmodified (transport URL-encoding aside).
    async fn send_command(&self, payload: &str) -> Result<(), SourceError> {
        let url = format!("http://{}/command/", self.host);
        tracing::debug!("forwarding command to moOde: {}", payload);

        let response = self
            .client
            .get(&url)
            .query(&[("cmd", payload)])
            .send()
            .await
            .map_err(|e| SourceError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Malformed(format!(
                "HTTP status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Combine the three controller responses into one snapshot. With no renderer
/// active the input is the local daemon.
fn assemble(status: PlaybackStatus, song: CurrentSong, renderers: RendererStatus) -> RawStatus {
    let input = if renderers.input.is_empty() {
        "MPD".to_string()
    } else {
        renderers.input.clone()
    };

    RawStatus {
        input,
        playback_state: status.state,
        spotify_active: renderers.spotify_active(),
        airplay_active: renderers.airplay_active(),
        file: song.file,
        title: song.title,
        artist: song.artist,
        album: song.album,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_local_playback() {
        let status = PlaybackStatus {
            state: "play".to_string(),
            ..Default::default()
        };
        let song = CurrentSong {
            file: Some("NAS/music/song_a.flac".to_string()),
            title: Some("Song A".to_string()),
            artist: Some("Artist B".to_string()),
            album: None,
        };
        let raw = assemble(status, song, RendererStatus::default());

        assert_eq!(raw.input, "MPD");
        assert_eq!(raw.playback_state, "play");
        assert!(!raw.spotify_active);
        assert!(!raw.airplay_active);
        assert_eq!(raw.title.as_deref(), Some("Song A"));
    }

    #[test]
    fn test_assemble_keeps_reported_input_name() {
        let renderers = RendererStatus {
            input: "Spotify Connect".to_string(),
            spotactive: "1".to_string(),
            ..Default::default()
        };
        let raw = assemble(
            PlaybackStatus::default(),
            CurrentSong::default(),
            renderers,
        );

        assert_eq!(raw.input, "Spotify Connect");
        assert!(raw.spotify_active);
        assert!(raw.file.is_none());
    }
}
