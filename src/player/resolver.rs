use std::fmt;
use std::process::Stdio;

use anyhow::anyhow;
use tokio::process::Command;
use tracing::error;

use crate::data::player_data::{RawTrack, Track};

/// Outcome of a resolution run: at least one playable track, plus the
/// playlist title when the query expanded into one.
#[derive(Debug)]
pub struct Resolved {
    pub tracks: Vec<Track>,
    pub playlist_title: Option<String>,
}

#[derive(Debug)]
pub enum ResolveError {
    /// The query produced no usable entries.
    NoResults,
    /// yt-dlp could not be run or exited without output.
    Backend(anyhow::Error),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResults => write!(f, "no results"),
            Self::Backend(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Resolve a direct URL or a best-effort text search into playable tracks.
/// URLs pass through as-is (playlists expand to all entries); anything else
/// becomes a single YouTube search.
pub async fn resolve(yt_dlp_path: &str, query: &str) -> Result<Resolved, ResolveError> {
    run_yt_dlp(yt_dlp_path, query).await
}

/// Multi-result similarity search seeded by a track title.
pub async fn resolve_similar(
    yt_dlp_path: &str,
    seed_title: &str,
    limit: usize,
) -> Result<Resolved, ResolveError> {
    let query = format!("ytsearch{}:{} similar songs", limit, seed_title);
    run_yt_dlp(yt_dlp_path, &query).await
}

async fn run_yt_dlp(yt_dlp_path: &str, query: &str) -> Result<Resolved, ResolveError> {
    let output = Command::new(yt_dlp_path)
        .arg("-x")
        .arg("--default-search")
        .arg("ytsearch")
        .arg("--skip-download")
        .arg("--print-json")
        .arg(query)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|e| ResolveError::Backend(anyhow!("can't run yt-dlp: {}", e)))?;

    if !output.status.success() && output.stdout.is_empty() {
        return Err(ResolveError::Backend(anyhow!(
            "yt-dlp exited with {}",
            output.status
        )));
    }

    parse_output(&output.stdout)
}

/// `--print-json` emits one JSON object per line, one per resolved entry.
/// Unparseable lines and entries without a playable URL are skipped.
fn parse_output(stdout: &[u8]) -> Result<Resolved, ResolveError> {
    let text = String::from_utf8_lossy(stdout);

    let mut tracks = Vec::new();
    let mut playlist_title = None;
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        let raw: RawTrack = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(e) => {
                error!("can't parse yt-dlp output: {}", e);
                continue;
            }
        };

        if playlist_title.is_none() {
            playlist_title.clone_from(&raw.playlist_title);
        }
        if let Some(track) = raw.into_track() {
            tracks.push(track);
        }
    }

    if tracks.is_empty() {
        return Err(ResolveError::NoResults);
    }
    Ok(Resolved {
        tracks,
        playlist_title,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_entry_per_line() {
        let stdout = concat!(
            r#"{"title": "One", "url": "https://cdn.example/1"}"#,
            "\n",
            r#"{"title": "Two", "url": "https://cdn.example/2"}"#,
            "\n",
        );
        let resolved = parse_output(stdout.as_bytes()).unwrap();
        assert_eq!(resolved.tracks.len(), 2);
        assert_eq!(resolved.tracks[0].title, "One");
        assert_eq!(resolved.playlist_title, None);
    }

    #[test]
    fn picks_up_the_playlist_title() {
        let stdout = concat!(
            r#"{"title": "One", "url": "https://cdn.example/1", "playlist_title": "Mix"}"#,
            "\n",
            r#"{"title": "Two", "url": "https://cdn.example/2", "playlist_title": "Mix"}"#,
            "\n",
        );
        let resolved = parse_output(stdout.as_bytes()).unwrap();
        assert_eq!(resolved.playlist_title.as_deref(), Some("Mix"));
    }

    #[test]
    fn skips_garbage_lines_and_unplayable_entries() {
        let stdout = concat!(
            "not json at all\n",
            r#"{"title": "no url here"}"#,
            "\n",
            r#"{"title": "Good", "url": "https://cdn.example/good"}"#,
            "\n",
        );
        let resolved = parse_output(stdout.as_bytes()).unwrap();
        assert_eq!(resolved.tracks.len(), 1);
        assert_eq!(resolved.tracks[0].title, "Good");
    }

    #[test]
    fn empty_output_is_no_results() {
        assert!(matches!(
            parse_output(b""),
            Err(ResolveError::NoResults)
        ));
        assert!(matches!(
            parse_output(br#"{"title": "unplayable"}"#),
            Err(ResolveError::NoResults)
        ));
    }
}
