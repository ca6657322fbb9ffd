use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw playback snapshot read from the player controller on one poll cycle.
///
/// Re-fetched every cycle; nothing here is persisted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStatus {
    /// Input/renderer identifier as reported by the controller (e.g. "MPD",
    /// "Spotify Connect")
    pub input: String,
    /// Local daemon playback state ("play", "pause", "stop")
    pub playback_state: String,
    /// A streaming-service session currently holds the output
    pub spotify_active: bool,
    /// Wireless-cast reception currently holds the output
    pub airplay_active: bool,
    /// Current file path or stream URL, when one is loaded
    pub file: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl RawStatus {
    /// Whether the loaded source is a network stream rather than a local file
    pub fn is_stream(&self) -> bool {
        self.file.as_deref().is_some_and(|f| {
            let f = f.trim().to_lowercase();
            f.starts_with("http://") || f.starts_with("https://")
        })
    }
}

/// Normalized category of whatever is currently feeding audio
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioSource {
    Spotify,
    AirPlay,
    LocalPlayback,
    Radio,
    Unknown,
}

impl AudioSource {
    /// Display name, also the exact payload published on the source topic
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioSource::Spotify => "Spotify",
            AudioSource::AirPlay => "AirPlay",
            AudioSource::LocalPlayback => "LocalPlayback",
            AudioSource::Radio => "Radio",
            AudioSource::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for AudioSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized state snapshot: the classified source plus whatever track
/// metadata applies to it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedState {
    pub source: AudioSource,
    pub details: BTreeMap<String, String>,
}

impl NormalizedState {
    /// Build a snapshot from a raw status and its classified source.
    ///
    /// Tag values are trimmed; empty or missing tags are omitted entirely so
    /// downstream consumers never see a blank field that looks like a real
    /// (empty) title.
    pub fn from_raw(raw: &RawStatus, source: AudioSource) -> Self {
        let mut details = BTreeMap::new();
        for (key, value) in [
            ("Title", &raw.title),
            ("Artist", &raw.artist),
            ("Album", &raw.album),
        ] {
            if let Some(v) = value {
                let v = v.trim();
                if !v.is_empty() {
                    details.insert(key.to_string(), v.to_string());
                }
            }
        }
        Self { source, details }
    }
}

/// Render the details mapping as the details-topic payload, one field per line
/// ("Artist: X"). Empty mapping renders as an empty payload.
pub fn details_text(details: &BTreeMap<String, String>) -> String {
    details
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Structural change detection between successive snapshots: any difference in
/// source or in the details mapping (keys or values) counts as a change.
pub fn has_changed(previous: &NormalizedState, current: &NormalizedState) -> bool {
    previous != current
}
