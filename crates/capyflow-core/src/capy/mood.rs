//! Capybara mood and the casting animation flag.
//!
//! Timed reverts (happy/waking back to idle, end of a cast) are armed in
//! [`TimeoutSlot`]s and fired by [`Capy::poll`], so a revert scheduled before
//! a newer mood change can never clobber it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::TimeoutSlot;
use crate::events::Event;

pub const PET_SECS: i64 = 2;
pub const CAST_SECS: i64 = 2;
pub const WAKE_SECS: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapyMood {
    Idle,
    Sleeping,
    Happy,
    Fishing,
    Waking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capy {
    mood: CapyMood,
    casting: bool,
    #[serde(default)]
    mood_revert: TimeoutSlot,
    #[serde(default)]
    cast_end: TimeoutSlot,
}

impl Default for Capy {
    fn default() -> Self {
        Self {
            mood: CapyMood::Idle,
            casting: false,
            mood_revert: TimeoutSlot::default(),
            cast_end: TimeoutSlot::default(),
        }
    }
}

impl Capy {
    pub fn mood(&self) -> CapyMood {
        self.mood
    }

    pub fn is_casting(&self) -> bool {
        self.casting
    }

    pub fn is_sleeping(&self) -> bool {
        self.mood == CapyMood::Sleeping
    }

    pub fn pet(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let event = self.set_mood(CapyMood::Happy);
        self.mood_revert.arm(now, Duration::seconds(PET_SECS));
        event
    }

    pub fn sleep(&mut self) -> Option<Event> {
        self.set_mood(CapyMood::Sleeping)
    }

    /// Only a sleeping capybara wakes up.
    pub fn wake(&mut self, now: DateTime<Utc>, wake_secs: u64) -> Option<Event> {
        if !self.is_sleeping() {
            return None;
        }
        let event = self.set_mood(CapyMood::Waking);
        self.mood_revert.arm(now, Duration::seconds(wake_secs as i64));
        event
    }

    /// Throw the line. Refused while the line is broken or a cast is running.
    pub fn start_casting(&mut self, now: DateTime<Utc>, line_broken: bool) -> Vec<Event> {
        if line_broken || self.casting {
            return Vec::new();
        }
        self.casting = true;
        self.cast_end.arm(now, Duration::seconds(CAST_SECS));
        let mut events = vec![Event::CastStarted { at: now }];
        events.extend(self.set_mood(CapyMood::Fishing));
        events
    }

    /// Fire whatever deadlines are due at `now`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();
        if self.cast_end.fire_due(now) {
            self.casting = false;
            events.push(Event::CastEnded { at: now });
            events.extend(self.set_mood(CapyMood::Idle));
        }
        if self.mood_revert.fire_due(now) {
            events.extend(self.set_mood(CapyMood::Idle));
        }
        events
    }

    pub fn has_pending(&self) -> bool {
        self.cast_end.is_armed() || self.mood_revert.is_armed()
    }

    /// Every mood change cancels a pending revert; callers re-arm as needed.
    fn set_mood(&mut self, mood: CapyMood) -> Option<Event> {
        self.mood_revert.cancel();
        if self.mood == mood {
            return None;
        }
        let from = std::mem::replace(&mut self.mood, mood);
        debug!(?from, to = ?mood, "mood changed");
        Some(Event::MoodChanged { from, to: mood })
    }
}
