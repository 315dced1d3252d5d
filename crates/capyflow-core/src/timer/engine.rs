//! Focus/break session state machine.
//!
//! The engine counts whole seconds. It has no internal thread: the caller
//! drives it with `tick()` once per wall-clock second while it is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --resume--> Running
//!   ^                |                  |
//!   +----reset-------+------reset-------+
//!   +----countdown reaches 0 (type flips Focus <-> Break)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SessionEngine::default();
//! engine.start(now);
//! // Once per second:
//! if let Some(done) = engine.tick() { /* hand rewards out */ }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ValidationError;
use crate::events::Event;

pub const DEFAULT_FOCUS_MIN: u32 = 25;
pub const DEFAULT_BREAK_MIN: u32 = 5;
pub const MAX_DURATION_MIN: u32 = 180;

/// Quick (focus, break) presets offered next to the duration controls.
pub const DURATION_PRESETS: [(u32, u32); 3] = [(25, 5), (50, 10), (90, 20)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Focus,
    Break,
}

impl SessionType {
    pub fn other(self) -> Self {
        match self {
            SessionType::Focus => SessionType::Break,
            SessionType::Break => SessionType::Focus,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Focus => "focus",
            SessionType::Break => "break",
        }
    }
}

impl std::str::FromStr for SessionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "focus" => Ok(SessionType::Focus),
            "break" => Ok(SessionType::Break),
            other => Err(ValidationError::InvalidValue {
                field: "session_type".into(),
                message: format!("expected 'focus' or 'break', got '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// A countdown that reached zero. Produced at most once per `start()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub session_type: SessionType,
    pub duration_min: u32,
    /// Countdown generation this completion settled.
    pub countdown: u64,
}

/// Core session engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEngine {
    session_type: SessionType,
    state: TimerState,
    remaining_secs: u32,
    focus_duration_min: u32,
    break_duration_min: u32,
    /// Bumped by every `start()`.
    #[serde(default)]
    countdown: u64,
    /// Last countdown whose completion has fired. Equal to `countdown` when
    /// there is nothing left to settle.
    #[serde(default)]
    settled: u64,
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_MIN, DEFAULT_BREAK_MIN)
    }
}

impl SessionEngine {
    /// Create an idle focus session with the given durations.
    ///
    /// Out-of-range durations fall back to the 25/5 defaults.
    pub fn new(focus_duration_min: u32, break_duration_min: u32) -> Self {
        let focus = validate_minutes("focus_duration", focus_duration_min)
            .unwrap_or(DEFAULT_FOCUS_MIN);
        let brk = validate_minutes("break_duration", break_duration_min)
            .unwrap_or(DEFAULT_BREAK_MIN);
        Self {
            session_type: SessionType::Focus,
            state: TimerState::Idle,
            remaining_secs: focus * 60,
            focus_duration_min: focus,
            break_duration_min: brk,
            countdown: 0,
            settled: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn focus_duration_min(&self) -> u32 {
        self.focus_duration_min
    }

    pub fn break_duration_min(&self) -> u32 {
        self.break_duration_min
    }

    pub fn is_active(&self) -> bool {
        self.state != TimerState::Idle
    }

    pub fn is_paused(&self) -> bool {
        self.state == TimerState::Paused
    }

    pub fn is_focus_active(&self) -> bool {
        self.is_active() && self.session_type == SessionType::Focus
    }

    pub fn duration_min(&self, session_type: SessionType) -> u32 {
        match session_type {
            SessionType::Focus => self.focus_duration_min,
            SessionType::Break => self.break_duration_min,
        }
    }

    pub fn total_secs(&self) -> u32 {
        self.duration_min(self.session_type) * 60
    }

    /// 0.0 .. 1.0 progress within the current countdown.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    /// `MM:SS` display of the remaining time.
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, at: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Idle {
            return None;
        }
        self.state = TimerState::Running;
        self.remaining_secs = self.total_secs();
        self.countdown += 1;
        debug!(session = self.session_type.as_str(), secs = self.remaining_secs, "session started");
        Some(Event::TimerStarted {
            session_type: self.session_type,
            duration_secs: self.remaining_secs,
            at,
        })
    }

    pub fn pause(&mut self, at: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Paused;
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at,
        })
    }

    pub fn resume(&mut self, at: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        self.state = TimerState::Running;
        Some(Event::TimerResumed {
            remaining_secs: self.remaining_secs,
            at,
        })
    }

    /// Start, pause or resume depending on the current state.
    pub fn toggle(&mut self, at: DateTime<Utc>) -> Option<Event> {
        match self.state {
            TimerState::Idle => self.start(at),
            TimerState::Paused => self.resume(at),
            TimerState::Running => self.pause(at),
        }
    }

    /// Back to idle with a full countdown for the current type.
    ///
    /// An abandoned countdown is settled so it can never complete later.
    pub fn reset(&mut self, at: DateTime<Utc>) -> Option<Event> {
        self.state = TimerState::Idle;
        self.settled = self.countdown;
        self.remaining_secs = self.total_secs();
        Some(Event::TimerReset {
            session_type: self.session_type,
            remaining_secs: self.remaining_secs,
            at,
        })
    }

    /// Advance one second. Returns the completion when the countdown hits 0.
    pub fn tick(&mut self) -> Option<Completion> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return self.complete();
        }
        None
    }

    pub fn set_session_type(
        &mut self,
        session_type: SessionType,
        at: DateTime<Utc>,
    ) -> Result<Event, ValidationError> {
        self.ensure_idle("change the session type")?;
        self.session_type = session_type;
        self.remaining_secs = self.total_secs();
        Ok(self.durations_event(at))
    }

    pub fn set_focus_duration(&mut self, minutes: u32, at: DateTime<Utc>) -> Result<Event, ValidationError> {
        self.ensure_idle("change the focus duration")?;
        self.focus_duration_min = validate_minutes("focus_duration", minutes)?;
        self.remaining_secs = self.total_secs();
        Ok(self.durations_event(at))
    }

    pub fn set_break_duration(&mut self, minutes: u32, at: DateTime<Utc>) -> Result<Event, ValidationError> {
        self.ensure_idle("change the break duration")?;
        self.break_duration_min = validate_minutes("break_duration", minutes)?;
        self.remaining_secs = self.total_secs();
        Ok(self.durations_event(at))
    }

    /// Set both durations at once; nothing changes unless both are valid.
    pub fn set_durations(
        &mut self,
        focus_min: u32,
        break_min: u32,
        at: DateTime<Utc>,
    ) -> Result<Event, ValidationError> {
        self.ensure_idle("change durations")?;
        let focus = validate_minutes("focus_duration", focus_min)?;
        let brk = validate_minutes("break_duration", break_min)?;
        self.focus_duration_min = focus;
        self.break_duration_min = brk;
        self.remaining_secs = self.total_secs();
        Ok(self.durations_event(at))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Option<Completion> {
        if self.settled == self.countdown {
            return None;
        }
        self.settled = self.countdown;
        let finished = self.session_type;
        let duration_min = self.duration_min(finished);
        self.session_type = finished.other();
        self.state = TimerState::Idle;
        self.remaining_secs = self.total_secs();
        info!(session = finished.as_str(), duration_min, "session completed");
        Some(Completion {
            session_type: finished,
            duration_min,
            countdown: self.countdown,
        })
    }

    fn ensure_idle(&self, action: &str) -> Result<(), ValidationError> {
        if self.is_active() {
            return Err(ValidationError::SessionActive {
                action: action.to_string(),
            });
        }
        Ok(())
    }

    fn durations_event(&self, at: DateTime<Utc>) -> Event {
        Event::SessionConfigured {
            session_type: self.session_type,
            focus_duration_min: self.focus_duration_min,
            break_duration_min: self.break_duration_min,
            remaining_secs: self.remaining_secs,
            at,
        }
    }
}

fn validate_minutes(field: &str, minutes: u32) -> Result<u32, ValidationError> {
    if minutes == 0 || minutes > MAX_DURATION_MIN {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("must be between 1 and {MAX_DURATION_MIN} minutes, got {minutes}"),
        });
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-17T02:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn run_out(engine: &mut SessionEngine) -> Vec<Completion> {
        let mut fired = Vec::new();
        for _ in 0..engine.remaining_secs() + 5 {
            if let Some(done) = engine.tick() {
                fired.push(done);
            }
        }
        fired
    }

    #[test]
    fn start_pause_resume() {
        let mut engine = SessionEngine::default();
        assert_eq!(engine.state(), TimerState::Idle);

        assert!(engine.start(t0()).is_some());
        assert_eq!(engine.state(), TimerState::Running);
        assert!(engine.start(t0()).is_none());

        assert!(engine.pause(t0()).is_some());
        assert_eq!(engine.state(), TimerState::Paused);
        assert!(engine.pause(t0()).is_none());

        assert!(engine.resume(t0()).is_some());
        assert_eq!(engine.state(), TimerState::Running);
        assert!(engine.resume(t0()).is_none());
    }

    #[test]
    fn tick_only_counts_while_running() {
        let mut engine = SessionEngine::default();
        engine.tick();
        assert_eq!(engine.remaining_secs(), 1500);

        engine.start(t0());
        engine.tick();
        assert_eq!(engine.remaining_secs(), 1499);

        engine.pause(t0());
        engine.tick();
        assert_eq!(engine.remaining_secs(), 1499);
    }

    #[test]
    fn focus_completion_flips_to_break() {
        let mut engine = SessionEngine::default();
        engine.start(t0());
        let fired = run_out(&mut engine);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].session_type, SessionType::Focus);
        assert_eq!(fired[0].duration_min, 25);
        assert_eq!(engine.session_type(), SessionType::Break);
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(), 300);
    }

    #[test]
    fn break_completion_flips_to_focus() {
        let mut engine = SessionEngine::new(25, 5);
        engine.set_session_type(SessionType::Break, t0()).unwrap();
        engine.start(t0());
        let fired = run_out(&mut engine);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].session_type, SessionType::Break);
        assert_eq!(engine.session_type(), SessionType::Focus);
        assert_eq!(engine.remaining_secs(), 1500);
    }

    #[test]
    fn reset_settles_abandoned_countdown() {
        let mut engine = SessionEngine::new(1, 1);
        engine.start(t0());
        for _ in 0..30 {
            engine.tick();
        }
        engine.reset(t0());
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(), 60);
        assert_eq!(engine.session_type(), SessionType::Focus);
        assert!(engine.complete().is_none());
    }

    #[test]
    fn completion_is_single_flight() {
        let mut engine = SessionEngine::new(1, 1);
        engine.start(t0());
        let first = run_out(&mut engine);
        assert_eq!(first.len(), 1);
        // A re-entrant settle for the same countdown must not fire again.
        assert!(engine.complete().is_none());
    }

    #[test]
    fn config_changes_rejected_while_active() {
        let mut engine = SessionEngine::default();
        engine.start(t0());
        assert!(matches!(
            engine.set_focus_duration(50, t0()),
            Err(ValidationError::SessionActive { .. })
        ));
        assert!(engine.set_session_type(SessionType::Break, t0()).is_err());
        engine.pause(t0());
        assert!(engine.set_break_duration(10, t0()).is_err());
        assert_eq!(engine.focus_duration_min(), 25);
        assert_eq!(engine.session_type(), SessionType::Focus);
    }

    #[test]
    fn config_changes_recompute_remaining_when_idle() {
        let mut engine = SessionEngine::default();
        engine.set_focus_duration(50, t0()).unwrap();
        assert_eq!(engine.remaining_secs(), 3000);
        engine.set_break_duration(10, t0()).unwrap();
        assert_eq!(engine.remaining_secs(), 3000);
        engine.set_session_type(SessionType::Break, t0()).unwrap();
        assert_eq!(engine.remaining_secs(), 600);
    }

    #[test]
    fn zero_minutes_rejected() {
        let mut engine = SessionEngine::default();
        assert!(engine.set_focus_duration(0, t0()).is_err());
        assert!(engine.set_durations(25, 0, t0()).is_err());
        assert_eq!(engine.break_duration_min(), 5);
    }

    #[test]
    fn display_formats_minutes_and_seconds() {
        let mut engine = SessionEngine::default();
        assert_eq!(engine.display(), "25:00");
        engine.start(t0());
        engine.tick();
        assert_eq!(engine.display(), "24:59");
    }

    #[test]
    fn events_carry_the_given_time() {
        let mut engine = SessionEngine::default();
        match engine.start(t0()) {
            Some(Event::TimerStarted { at, .. }) => assert_eq!(at, t0()),
            other => panic!("expected TimerStarted, got {other:?}"),
        }
        match engine.set_focus_duration(30, t0()) {
            Err(ValidationError::SessionActive { .. }) => {}
            other => panic!("expected SessionActive, got {other:?}"),
        }
        engine.reset(t0());
        match engine.set_focus_duration(30, t0()) {
            Ok(Event::SessionConfigured { at, .. }) => assert_eq!(at, t0()),
            other => panic!("expected SessionConfigured, got {other:?}"),
        }
    }

    #[test]
    fn session_type_parses() {
        assert_eq!("Focus".parse::<SessionType>().unwrap(), SessionType::Focus);
        assert!("nap".parse::<SessionType>().is_err());
    }
}
