use std::sync::OnceLock;

use regex::Regex;

/// A resolved, immediately playable track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Direct audio URL, ready to hand to the voice driver.
    pub url: String,
    pub title: String,
}

impl Track {
    /// Get a cleaned up title, with the usual "(official music video)"
    /// style suffixes stripped out.
    pub fn display_title(&self) -> String {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"(?i) (\(|\[|\| )( ?(official|mv|audio|video|music|lyrics|lyric) ?)+(\)|\])?")
                .expect("title cleanup regex is valid")
        });
        re.replace_all(&self.title, "").to_string()
    }
}

/// Stores info about formats in a track.
#[derive(Debug, serde::Deserialize, Clone)]
pub struct Format {
    pub url: String,
    #[serde(rename = "acodec")]
    pub codec: Option<String>,
    #[serde(rename = "abr")]
    pub bitrate: Option<f32>,
}

/// One entry of `yt-dlp --print-json` output, as emitted per line.
#[derive(Debug, serde::Deserialize, Clone, Default)]
pub struct RawTrack {
    title: Option<String>,
    /// Direct URL when yt-dlp already selected a format (search results).
    url: Option<String>,
    formats: Option<Vec<Format>>,

    pub playlist_title: Option<String>,
}

impl RawTrack {
    /// Convert to a playable [`Track`]; `None` when no usable audio URL
    /// exists in any format, in which case the entry is dropped.
    pub fn into_track(self) -> Option<Track> {
        let title = self
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled".to_string());
        let url = self.playable_url()?;
        Some(Track { url, title })
    }

    /// Get a playable direct URL of the track from the format list,
    /// falling back to the top-level `url` field.
    fn playable_url(&self) -> Option<String> {
        if let Some(formats) = &self.formats {
            let mut best_url = None;
            let mut best_bitrate = 0.0;

            let mut mp3_url = None;
            let mut mp3_bitrate = 0.0;

            for format in formats.iter() {
                if let (Some(codec), Some(bitrate)) = (format.codec.as_deref(), format.bitrate) {
                    match codec {
                        // lossless codecs, return immediately
                        "alac" | "flac" | "pcm" => {
                            return Some(format.url.clone());
                        }
                        // lossy codecs, can't go wrong when
                        // choose one with the highest bitrate
                        "opus" | "aac" | "vorbis" => {
                            if bitrate > best_bitrate {
                                best_url = Some(format.url.clone());
                                best_bitrate = bitrate;
                            }
                        }
                        // final resort if can't find a better one
                        "mp3" => {
                            if bitrate > mp3_bitrate {
                                mp3_url = Some(format.url.clone());
                                mp3_bitrate = bitrate;
                            }
                        }
                        _ => (),
                    }
                }
            }

            if let Some(url) = best_url.or(mp3_url) {
                return Some(url);
            }
        }

        self.url.clone().filter(|u| !u.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(codec: &str, bitrate: f32) -> Format {
        Format {
            url: format!("https://cdn.example/{codec}-{bitrate}"),
            codec: Some(codec.to_string()),
            bitrate: Some(bitrate),
        }
    }

    #[test]
    fn parses_print_json_line() {
        let line = r#"{
            "title": "Some Song",
            "url": "https://cdn.example/audio",
            "playlist_title": "Mix",
            "duration": 215
        }"#;
        let raw: RawTrack = serde_json::from_str(line).unwrap();
        assert_eq!(raw.playlist_title.as_deref(), Some("Mix"));

        let track = raw.into_track().unwrap();
        assert_eq!(track.title, "Some Song");
        assert_eq!(track.url, "https://cdn.example/audio");
    }

    #[test]
    fn lossless_format_wins_outright() {
        let raw = RawTrack {
            title: Some("t".into()),
            formats: Some(vec![format("opus", 160.0), format("flac", 900.0)]),
            ..Default::default()
        };
        let track = raw.into_track().unwrap();
        assert!(track.url.contains("flac"));
    }

    #[test]
    fn highest_bitrate_lossy_beats_mp3() {
        let raw = RawTrack {
            title: Some("t".into()),
            formats: Some(vec![
                format("mp3", 320.0),
                format("aac", 96.0),
                format("opus", 128.0),
            ]),
            ..Default::default()
        };
        let track = raw.into_track().unwrap();
        assert!(track.url.contains("opus-128"));
    }

    #[test]
    fn entry_without_usable_url_is_dropped() {
        let raw = RawTrack {
            title: Some("ghost".into()),
            ..Default::default()
        };
        assert!(raw.into_track().is_none());
    }

    #[test]
    fn untitled_fallback() {
        let raw = RawTrack {
            url: Some("https://cdn.example/a".into()),
            ..Default::default()
        };
        assert_eq!(raw.into_track().unwrap().title, "Untitled");
    }

    #[test]
    fn display_title_strips_suffixes() {
        let track = Track {
            url: String::new(),
            title: "Cool Song (Official Music Video)".into(),
        };
        assert_eq!(track.display_title(), "Cool Song");
    }
}
