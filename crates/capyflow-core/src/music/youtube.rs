//! Video/playlist reference parsing for pasted YouTube links.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static VIDEO_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:youtube\.com/watch\?v=|youtube\.com/watch\?.+&v=)([^&\s]+)",
        r"youtu\.be/([^?\s]+)",
        r"youtube\.com/embed/([^?\s]+)",
        r"youtube\.com/v/([^?\s]+)",
        r"youtube\.com/shorts/([^?\s]+)",
        r"^([a-zA-Z0-9_-]{11})$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static PLAYLIST_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]list=([^&\s]+)").unwrap());

static YOUTUBE_HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)youtube\.com|youtu\.be").unwrap());

static BARE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").unwrap());

/// Playlist ids this short are auto-generated mixes and are ignored.
const MIN_PLAYLIST_ID_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum YouTubeRef {
    Video {
        video_id: String,
    },
    Playlist {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        video_id: Option<String>,
        playlist_id: String,
    },
    Invalid,
}

impl YouTubeRef {
    pub fn is_valid(&self) -> bool {
        !matches!(self, YouTubeRef::Invalid)
    }
}

pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn extract_playlist_id(url: &str) -> Option<String> {
    let id = PLAYLIST_PATTERN.captures(url)?.get(1)?.as_str();
    (id.len() >= MIN_PLAYLIST_ID_LEN).then(|| id.to_string())
}

/// Looks like a YouTube link or a bare 11-character video id.
pub fn is_youtube_input(input: &str) -> bool {
    let trimmed = input.trim();
    YOUTUBE_HOST.is_match(trimmed) || BARE_ID.is_match(trimmed)
}

pub fn is_valid_video_id(id: &str) -> bool {
    BARE_ID.is_match(id)
}

pub fn parse_youtube_url(input: &str) -> YouTubeRef {
    let trimmed = input.trim();
    if trimmed.is_empty() || !is_youtube_input(trimmed) {
        return YouTubeRef::Invalid;
    }

    match (extract_video_id(trimmed), extract_playlist_id(trimmed)) {
        (video_id, Some(playlist_id)) => YouTubeRef::Playlist {
            video_id,
            playlist_id,
        },
        (Some(video_id), None) => YouTubeRef::Video { video_id },
        (None, None) => YouTubeRef::Invalid,
    }
}
