//! Background music selection: mood matcher, link parser, player state.

mod mapper;
mod youtube;

pub use mapper::{
    character_overlap, find_best_match, score_mapping, suggestions, MusicMapping, MIN_MATCH_SCORE,
    MUSIC_MAPPINGS,
};
pub use youtube::{
    extract_playlist_id, extract_video_id, is_valid_video_id, is_youtube_input, parse_youtube_url,
    YouTubeRef,
};

use serde::{Deserialize, Serialize};

use crate::events::Event;

pub const DEFAULT_VOLUME: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicState {
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub playlist_id: Option<String>,
    pub volume: f64,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub playing: bool,
}

impl Default for MusicState {
    fn default() -> Self {
        Self {
            mood: None,
            video_id: None,
            playlist_id: None,
            volume: DEFAULT_VOLUME,
            muted: false,
            playing: false,
        }
    }
}

impl MusicState {
    /// Pick music for a free-text mood. A blank query changes nothing.
    pub fn apply_mood_query(&mut self, query: &str) -> Option<Event> {
        let mapping = find_best_match(query)?;
        self.mood = Some(mapping.mood.to_string());
        self.video_id = Some(mapping.video_id.to_string());
        self.playlist_id = None;
        Some(self.changed())
    }

    /// Load a parsed link. `Invalid` changes nothing.
    pub fn apply_reference(&mut self, reference: &YouTubeRef) -> Option<Event> {
        match reference {
            YouTubeRef::Video { video_id } => {
                self.video_id = Some(video_id.clone());
                self.playlist_id = None;
            }
            YouTubeRef::Playlist {
                video_id,
                playlist_id,
            } => {
                self.video_id = video_id.clone();
                self.playlist_id = Some(playlist_id.clone());
            }
            YouTubeRef::Invalid => return None,
        }
        self.mood = None;
        Some(self.changed())
    }

    /// Clamped to `[0, 1]`; NaN is ignored.
    pub fn set_volume(&mut self, volume: f64) -> Option<Event> {
        if volume.is_nan() {
            return None;
        }
        self.volume = volume.clamp(0.0, 1.0);
        Some(self.volume_event())
    }

    pub fn toggle_mute(&mut self) -> Event {
        self.muted = !self.muted;
        self.volume_event()
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    fn changed(&self) -> Event {
        Event::MusicChanged {
            mood: self.mood.clone(),
            video_id: self.video_id.clone(),
            playlist_id: self.playlist_id.clone(),
        }
    }

    fn volume_event(&self) -> Event {
        Event::VolumeChanged {
            volume: self.volume,
            muted: self.muted,
        }
    }
}
