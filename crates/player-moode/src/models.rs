use serde::Deserialize;

/// Response to `cmd=status` (daemon playback status proxied by the controller)
///
/// All fields arrive as strings; only the playback state matters here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaybackStatus {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
}

/// Response to `cmd=currentsong`
///
/// Tag fields may be missing entirely depending on the playback source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentSong {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
}

/// Response to `cmd=get_renderer_status`; activity flags are "1"/"0" strings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RendererStatus {
    /// Friendly name of the active input, when the controller reports one
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub aplactive: String,
    #[serde(default)]
    pub spotactive: String,
}

impl RendererStatus {
    pub fn airplay_active(&self) -> bool {
        flag(&self.aplactive)
    }

    pub fn spotify_active(&self) -> bool {
        flag(&self.spotactive)
    }
}

fn flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "yes" | "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_playback_status() {
        let json = r#"{
            "state": "play",
            "song": "12",
            "volume": "39",
            "repeat": "0",
            "random": "0"
        }"#;

        let status: PlaybackStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.state, "play");
        assert_eq!(status.song.as_deref(), Some("12"));
    }

    #[test]
    fn test_parse_current_song() {
        let json = r#"{
            "file": "NAS/music/Pink Floyd/Time.flac",
            "title": "Time",
            "artist": "Pink Floyd",
            "album": "The Dark Side of the Moon"
        }"#;

        let song: CurrentSong = serde_json::from_str(json).unwrap();
        assert_eq!(song.title.as_deref(), Some("Time"));
        assert_eq!(song.artist.as_deref(), Some("Pink Floyd"));
        assert_eq!(song.album.as_deref(), Some("The Dark Side of the Moon"));
    }

    #[test]
    fn test_parse_current_song_without_tags() {
        let song: CurrentSong = serde_json::from_str("{}").unwrap();
        assert!(song.file.is_none());
        assert!(song.title.is_none());
    }

    #[test]
    fn test_parse_renderer_status_flags() {
        let json = r#"{"input": "Spotify Connect", "aplactive": "0", "spotactive": "1"}"#;

        let renderers: RendererStatus = serde_json::from_str(json).unwrap();
        assert!(renderers.spotify_active());
        assert!(!renderers.airplay_active());
        assert_eq!(renderers.input, "Spotify Connect");
    }

    #[test]
    fn test_parse_renderer_status_defaults() {
        let renderers: RendererStatus = serde_json::from_str("{}").unwrap();
        assert!(!renderers.spotify_active());
        assert!(!renderers.airplay_active());
        assert!(renderers.input.is_empty());
    }
}
