use crate::models::{AudioSource, RawStatus};

/// One entry in the classification precedence table
struct Rule {
    source: AudioSource,
    applies: fn(&RawStatus) -> bool,
}

/// Classification precedence, highest priority first: a streaming-service
/// session outranks cast reception, which outranks the local daemon. The
/// controller can report stale overlapping signals (e.g. a cast flag left set
/// while a streaming session starts); the table order resolves those
/// deterministically.
///
/// New overlapping-signal cases belong here as rules, not as a fallthrough to
/// `Unknown`.
const RULES: &[Rule] = &[
    Rule {
        source: AudioSource::Spotify,
        applies: |raw| raw.spotify_active || input_matches(raw, "spotify"),
    },
    Rule {
        source: AudioSource::AirPlay,
        applies: |raw| raw.airplay_active || input_matches(raw, "airplay"),
    },
    Rule {
        source: AudioSource::LocalPlayback,
        // A radio stream also plays through the local daemon, so local
        // playback requires a non-stream source; streams fall through to the
        // Radio rule.
        applies: |raw| daemon_playing(raw) && !raw.is_stream(),
    },
    Rule {
        source: AudioSource::Radio,
        applies: RawStatus::is_stream,
    },
];

fn input_matches(raw: &RawStatus, needle: &str) -> bool {
    raw.input.to_lowercase().contains(needle)
}

fn daemon_playing(raw: &RawStatus) -> bool {
    matches!(raw.playback_state.to_lowercase().as_str(), "play" | "pause")
}

/// Map a raw status to its source category. First matching rule wins; no
/// signal at all means `Unknown`.
pub fn classify(raw: &RawStatus) -> AudioSource {
    for rule in RULES {
        if (rule.applies)(raw) {
            tracing::debug!("classified input {:?} as {}", raw.input, rule.source);
            return rule.source;
        }
    }
    tracing::debug!("no active signal for input {:?}", raw.input);
    AudioSource::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_no_signals_is_unknown() {
        let raw = RawStatus {
            input: "MPD".to_string(),
            playback_state: "stop".to_string(),
            ..Default::default()
        };
        assert_eq!(classify(&raw), AudioSource::Unknown);
    }

    #[test]
    fn test_classify_spotify_session() {
        let raw = RawStatus {
            input: "Spotify Connect".to_string(),
            spotify_active: true,
            ..Default::default()
        };
        assert_eq!(classify(&raw), AudioSource::Spotify);
    }

    #[test]
    fn test_classify_spotify_outranks_stale_cast_flag() {
        let raw = RawStatus {
            input: "Spotify Connect".to_string(),
            spotify_active: true,
            airplay_active: true,
            ..Default::default()
        };
        assert_eq!(classify(&raw), AudioSource::Spotify);
    }

    #[test]
    fn test_classify_cast_outranks_local_daemon() {
        let raw = RawStatus {
            input: "AirPlay".to_string(),
            airplay_active: true,
            playback_state: "play".to_string(),
            file: Some("NAS/music/song.flac".to_string()),
            ..Default::default()
        };
        assert_eq!(classify(&raw), AudioSource::AirPlay);
    }

    #[test]
    fn test_classify_input_name_match_is_case_insensitive() {
        let raw = RawStatus {
            input: "SPOTIFY connect".to_string(),
            ..Default::default()
        };
        assert_eq!(classify(&raw), AudioSource::Spotify);
    }

    #[test]
    fn test_classify_local_playback() {
        for state in ["play", "pause", "Play"] {
            let raw = RawStatus {
                input: "MPD".to_string(),
                playback_state: state.to_string(),
                file: Some("NAS/music/song.flac".to_string()),
                ..Default::default()
            };
            assert_eq!(classify(&raw), AudioSource::LocalPlayback, "state {state}");
        }
    }

    #[test]
    fn test_classify_stream_url_is_radio() {
        let raw = RawStatus {
            input: "MPD".to_string(),
            playback_state: "play".to_string(),
            file: Some("http://icecast.example.org:8000/stream".to_string()),
            ..Default::default()
        };
        assert_eq!(classify(&raw), AudioSource::Radio);
    }

    #[test]
    fn test_classify_stopped_daemon_is_not_local_playback() {
        let raw = RawStatus {
            input: "MPD".to_string(),
            playback_state: "stop".to_string(),
            file: Some("NAS/music/song.flac".to_string()),
            ..Default::default()
        };
        assert_eq!(classify(&raw), AudioSource::Unknown);
    }
}
