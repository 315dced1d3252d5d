use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::capy::{CapyMood, ChatTopic};
use crate::panels::Panel;
use crate::rewards::{Accessory, Fish, JournalEntry};
use crate::theme::Theme;
use crate::timer::{SessionType, TimerState};

/// Every state change in the system produces an Event.
/// Front ends render from them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        session_type: SessionType,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        session_type: SessionType,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Session type or durations changed while idle.
    SessionConfigured {
        session_type: SessionType,
        focus_duration_min: u32,
        break_duration_min: u32,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero; `next` is the type now loaded.
    SessionCompleted {
        session_type: SessionType,
        duration_min: u32,
        next: SessionType,
        at: DateTime<Utc>,
    },

    // ── Rewards ──────────────────────────────────────────────────────
    FishCaught {
        fish: Fish,
    },
    StreakIncreased {
        streak: u32,
    },
    AccessoryUnlocked {
        accessory: Accessory,
        streak: u32,
    },
    AccessoryEquipped {
        id: Option<String>,
    },
    JournalWritten {
        entry: JournalEntry,
    },
    HistoryRecorded {
        date: NaiveDate,
        count: u32,
        ecosystem_score: u8,
    },
    CatchDismissed {
        fish: Fish,
    },

    // ── Engagement ───────────────────────────────────────────────────
    TabHidden {
        /// The away counter started for this absence.
        tracking_away: bool,
        at: DateTime<Utc>,
    },
    TabVisible {
        away_secs: u32,
        at: DateTime<Utc>,
    },
    LineBroken {
        away_secs: u32,
        streak_lost: u32,
        at: DateTime<Utc>,
    },
    LineRepaired {
        at: DateTime<Utc>,
    },

    // ── Capybara ─────────────────────────────────────────────────────
    MoodChanged {
        from: CapyMood,
        to: CapyMood,
    },
    CastStarted {
        at: DateTime<Utc>,
    },
    CastEnded {
        at: DateTime<Utc>,
    },
    CapyReplied {
        topic: ChatTopic,
        message: String,
        response: String,
    },
    CapyReplyCleared {
        at: DateTime<Utc>,
    },

    // ── Scene ────────────────────────────────────────────────────────
    ThemeChanged {
        theme: Theme,
        auto_theme: bool,
    },
    MusicChanged {
        mood: Option<String>,
        video_id: Option<String>,
        playlist_id: Option<String>,
    },
    VolumeChanged {
        volume: f64,
        muted: bool,
    },
    PanelToggled {
        panel: Panel,
        open: bool,
    },
    SettingToggled {
        setting: String,
        enabled: bool,
    },

    StateSnapshot {
        state: TimerState,
        session_type: SessionType,
        remaining_secs: u32,
        total_secs: u32,
        progress_pct: f64,
        focus_duration_min: u32,
        break_duration_min: u32,
        current_streak: u32,
        fish_caught_count: u32,
        equipped_accessory: Option<String>,
        line_broken: bool,
        tab_active: bool,
        away_secs: u32,
        mood: CapyMood,
        casting: bool,
        theme: Theme,
        ecosystem_score: u8,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The serde tag, handy for logs and filters.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "TimerStarted",
            Event::TimerPaused { .. } => "TimerPaused",
            Event::TimerResumed { .. } => "TimerResumed",
            Event::TimerReset { .. } => "TimerReset",
            Event::SessionConfigured { .. } => "SessionConfigured",
            Event::SessionCompleted { .. } => "SessionCompleted",
            Event::FishCaught { .. } => "FishCaught",
            Event::StreakIncreased { .. } => "StreakIncreased",
            Event::AccessoryUnlocked { .. } => "AccessoryUnlocked",
            Event::AccessoryEquipped { .. } => "AccessoryEquipped",
            Event::JournalWritten { .. } => "JournalWritten",
            Event::HistoryRecorded { .. } => "HistoryRecorded",
            Event::CatchDismissed { .. } => "CatchDismissed",
            Event::TabHidden { .. } => "TabHidden",
            Event::TabVisible { .. } => "TabVisible",
            Event::LineBroken { .. } => "LineBroken",
            Event::LineRepaired { .. } => "LineRepaired",
            Event::MoodChanged { .. } => "MoodChanged",
            Event::CastStarted { .. } => "CastStarted",
            Event::CastEnded { .. } => "CastEnded",
            Event::CapyReplied { .. } => "CapyReplied",
            Event::CapyReplyCleared { .. } => "CapyReplyCleared",
            Event::ThemeChanged { .. } => "ThemeChanged",
            Event::MusicChanged { .. } => "MusicChanged",
            Event::VolumeChanged { .. } => "VolumeChanged",
            Event::PanelToggled { .. } => "PanelToggled",
            Event::SettingToggled { .. } => "SettingToggled",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}
