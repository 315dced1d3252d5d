//! Saving and restoring application state through the kv table.
//!
//! Two blobs live side by side:
//! - `capyflow-storage`: the long-lived subset (rewards, history, settings).
//! - `capyflow-runtime`: the whole [`AppState`], so an in-flight session
//!   survives between CLI invocations.
//!
//! Both are best effort. A missing or unreadable blob falls back to the next
//! source, and failed writes are logged and dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Database;
use crate::app::AppState;
use crate::history::{FocusHistory, HistoryRecorder, INITIAL_ECOSYSTEM_SCORE};
use crate::music::DEFAULT_VOLUME;
use crate::rewards::{Accessory, Fish, JournalEntry, RewardLedger};
use crate::theme::Theme;
use crate::timer::{SessionEngine, DEFAULT_BREAK_MIN, DEFAULT_FOCUS_MIN};

pub const STORAGE_KEY: &str = "capyflow-storage";
pub const RUNTIME_KEY: &str = "capyflow-runtime";

fn default_true() -> bool {
    true
}
fn default_focus() -> u32 {
    DEFAULT_FOCUS_MIN
}
fn default_break() -> u32 {
    DEFAULT_BREAK_MIN
}
fn default_volume() -> f64 {
    DEFAULT_VOLUME
}
fn default_score() -> u8 {
    INITIAL_ECOSYSTEM_SCORE
}

/// The long-lived part of the state. Every field has a default so blobs
/// written by older builds still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub fish_caught_count: u32,
    #[serde(default)]
    pub fish_collection: Vec<Fish>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub auto_theme: bool,
    #[serde(default = "default_focus")]
    pub focus_duration: u32,
    #[serde(default = "default_break")]
    pub break_duration: u32,
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default)]
    pub accessories: Vec<Accessory>,
    #[serde(default)]
    pub equipped_accessory: Option<String>,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub focus_fog_enabled: bool,
    #[serde(default)]
    pub journal_entries: Vec<JournalEntry>,
    #[serde(default)]
    pub focus_history: FocusHistory,
    #[serde(default = "default_score")]
    pub ecosystem_score: u8,
}

impl PersistedState {
    pub fn from_state(state: &AppState) -> Self {
        let rewards = &state.rewards;
        Self {
            fish_caught_count: rewards.fish_caught_count,
            fish_collection: rewards.fish_collection.clone(),
            current_streak: rewards.current_streak,
            theme: state.theme,
            auto_theme: state.auto_theme,
            focus_duration: state.session.focus_duration_min(),
            break_duration: state.session.break_duration_min(),
            volume: state.music.volume,
            accessories: rewards.accessories.clone(),
            equipped_accessory: rewards.equipped_accessory.clone(),
            sound_enabled: state.sound_enabled,
            focus_fog_enabled: state.fog_enabled,
            journal_entries: rewards.journal_entries.clone(),
            focus_history: state.history.history.clone(),
            ecosystem_score: state.history.ecosystem_score,
        }
    }

    /// A fresh idle state carrying the persisted fields.
    pub fn into_state(self, now: DateTime<Utc>) -> AppState {
        let mut state = AppState::new(now);
        state.session = SessionEngine::new(self.focus_duration, self.break_duration);
        state.rewards = RewardLedger {
            fish_caught_count: self.fish_caught_count,
            fish_collection: self.fish_collection,
            current_streak: self.current_streak,
            accessories: self.accessories,
            equipped_accessory: self.equipped_accessory,
            journal_entries: self.journal_entries,
            pending_catch: None,
        };
        state.history = HistoryRecorder {
            history: self.focus_history,
            ecosystem_score: self.ecosystem_score.min(100),
        };
        state.theme = self.theme;
        state.auto_theme = self.auto_theme;
        state.music.volume = self.volume.clamp(0.0, 1.0);
        state.sound_enabled = self.sound_enabled;
        state.fog_enabled = self.focus_fog_enabled;
        state
    }
}

fn read_blob<T: for<'de> Deserialize<'de>>(db: &Database, key: &str) -> Option<T> {
    let raw = match db.kv_get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(key, "failed to read stored state: {e}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, "ignoring unreadable stored state: {e}");
            None
        }
    }
}

/// Runtime blob, else the persisted subset on a fresh state, else a fresh
/// state with the given default durations.
pub fn load_state(db: &Database, focus_min: u32, break_min: u32, now: DateTime<Utc>) -> AppState {
    if let Some(state) = read_blob::<AppState>(db, RUNTIME_KEY) {
        debug!("restored runtime state");
        return state;
    }
    if let Some(persisted) = read_blob::<PersistedState>(db, STORAGE_KEY) {
        debug!("restored persisted state");
        return persisted.into_state(now);
    }
    AppState::with_durations(focus_min, break_min, now)
}

/// Write both blobs. Failures are logged and otherwise ignored.
pub fn save_state(db: &Database, state: &AppState) {
    write_blob(db, STORAGE_KEY, &PersistedState::from_state(state));
    write_blob(db, RUNTIME_KEY, state);
}

fn write_blob<T: Serialize>(db: &Database, key: &str, value: &T) {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            warn!(key, "failed to serialize state: {e}");
            return;
        }
    };
    if let Err(e) = db.kv_set(key, &json) {
        warn!(key, "failed to save state: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-17T09:00:00+07:00")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn empty_database_gives_configured_defaults() {
        let db = Database::open_memory().unwrap();
        let state = load_state(&db, 50, 10, now());
        assert_eq!(state.session().focus_duration_min(), 50);
        assert_eq!(state.session().remaining_secs(), 50 * 60);
    }

    #[test]
    fn persisted_subset_survives_without_runtime_blob() {
        let db = Database::open_memory().unwrap();
        let mut state = AppState::new(now());
        state.rewards.current_streak = 4;
        state.theme = Theme::Night;
        state.fog_enabled = false;
        save_state(&db, &state);
        db.kv_delete(RUNTIME_KEY).unwrap();

        let restored = load_state(&db, 25, 5, now());
        assert_eq!(restored.rewards().current_streak(), 4);
        assert_eq!(restored.theme(), Theme::Night);
        assert!(!restored.fog_enabled());
        assert_eq!(
            PersistedState::from_state(&restored),
            PersistedState::from_state(&state)
        );
    }

    #[test]
    fn runtime_blob_wins() {
        let db = Database::open_memory().unwrap();
        let mut state = AppState::new(now());
        state.session.start(now());
        save_state(&db, &state);
        assert_eq!(load_state(&db, 25, 5, now()), state);
    }

    #[test]
    fn corrupt_blob_falls_back() {
        let db = Database::open_memory().unwrap();
        db.kv_set(RUNTIME_KEY, "{not json").unwrap();
        db.kv_set(STORAGE_KEY, r#"{"currentStreak": 2, "unknownField": true}"#)
            .unwrap();
        let state = load_state(&db, 25, 5, now());
        assert_eq!(state.rewards().current_streak(), 2);
        assert_eq!(state.history().ecosystem_score, 50);
        assert!(state.auto_theme());
    }

    #[test]
    fn uses_camel_case_field_names() {
        let json = serde_json::to_value(PersistedState::from_state(&AppState::new(now()))).unwrap();
        assert!(json.get("fishCaughtCount").is_some());
        assert!(json.get("focusFogEnabled").is_some());
        assert_eq!(json["volume"], 0.7);
    }
}
