use clap::Subcommand;
use capyflow_core::music::suggestions;
use capyflow_core::YouTubeRef;

use crate::session::{print_json, with_session};

#[derive(Subcommand)]
pub enum MusicAction {
    /// Pick music matching a free-text mood
    Mood {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// List moods matching a partial query
    Suggest {
        query: Vec<String>,
    },
    /// Play a YouTube video or playlist link
    Link {
        url: String,
    },
    /// Set volume between 0.0 and 1.0
    Volume {
        level: f64,
    },
    /// Toggle mute
    Mute,
    /// Mark the player as playing
    Play,
    /// Mark the player as paused
    Pause,
    /// Print the player state as JSON
    Status,
}

pub fn run(action: MusicAction) -> Result<(), Box<dyn std::error::Error>> {
    with_session(|session| {
        let flow = session.flow();
        let events = match action {
            MusicAction::Mood { query } => flow.music_query(&query.join(" ")).into_iter().collect(),
            MusicAction::Suggest { query } => {
                print_json(&suggestions(&query.join(" ")))?;
                Vec::new()
            }
            MusicAction::Link { url } => match flow.load_music_link(&url) {
                (YouTubeRef::Invalid, _) => {
                    return Err(format!("not a YouTube video or playlist link: {url}").into())
                }
                (_, event) => event.into_iter().collect(),
            },
            MusicAction::Volume { level } => flow.set_volume(level).into_iter().collect(),
            MusicAction::Mute => vec![flow.toggle_mute()],
            MusicAction::Play => {
                flow.set_playing(true);
                Vec::new()
            }
            MusicAction::Pause => {
                flow.set_playing(false);
                Vec::new()
            }
            MusicAction::Status => {
                print_json(flow.state().music())?;
                Vec::new()
            }
        };
        Ok(events)
    })
}
