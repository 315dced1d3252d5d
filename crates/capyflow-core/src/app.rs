//! The application state container and its transition functions.
//!
//! [`AppState`] is plain data: every component state plus the persisted
//! toggles. [`CapyFlow`] owns one together with the random and clock seams
//! and is the only way to mutate it. Each transition returns the events it
//! produced, in order.
//!
//! The caller drives [`CapyFlow::tick`] once per wall-clock second. A tick
//! advances the countdown, hands out focus rewards, counts away seconds,
//! fires due cosmetic deadlines and checks input idleness.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::capy::{Capy, CapyChat, WAKE_SECS};
use crate::clock::{Clock, SystemClock, TimeoutSlot};
use crate::engagement::{EngagementMonitor, IdleTracker, AWAY_THRESHOLD_SECS, IDLE_TIMEOUT_SECS};
use crate::error::ValidationError;
use crate::events::Event;
use crate::history::{HeatmapDay, HistoryRecorder, HistorySummary};
use crate::music::{parse_youtube_url, MusicState, YouTubeRef};
use crate::panels::{Panel, Panels, Shortcut};
use crate::random::{PcgRandom, RandomSource};
use crate::rewards::RewardLedger;
use crate::theme::{auto_theme, Theme};
use crate::timer::{Completion, SessionEngine, SessionType, DEFAULT_BREAK_MIN, DEFAULT_FOCUS_MIN};

/// Seconds between auto-theme evaluations.
pub const THEME_CHECK_SECS: i64 = 60;

/// Upper bound on ticks replayed by [`CapyFlow::catch_up`].
pub const MAX_CATCH_UP_SECS: u64 = 24 * 60 * 60;

/// Engagement thresholds, normally read from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tunables {
    pub away_threshold_secs: u32,
    pub idle_timeout_secs: u64,
    pub wake_secs: u64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            away_threshold_secs: AWAY_THRESHOLD_SECS,
            idle_timeout_secs: IDLE_TIMEOUT_SECS,
            wake_secs: WAKE_SECS,
        }
    }
}

fn default_true() -> bool {
    true
}

fn idle_from_now() -> IdleTracker {
    IdleTracker::new(Utc::now())
}

/// Everything the application knows, in one serializable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub(crate) session: SessionEngine,
    #[serde(default)]
    pub(crate) engagement: EngagementMonitor,
    #[serde(default = "idle_from_now")]
    pub(crate) idle: IdleTracker,
    #[serde(default)]
    pub(crate) rewards: RewardLedger,
    #[serde(default)]
    pub(crate) history: HistoryRecorder,
    #[serde(default)]
    pub(crate) capy: Capy,
    #[serde(default)]
    pub(crate) chat: CapyChat,
    #[serde(default)]
    pub(crate) music: MusicState,
    #[serde(default)]
    pub(crate) theme: Theme,
    #[serde(default = "default_true")]
    pub(crate) auto_theme: bool,
    #[serde(default = "default_true")]
    pub(crate) sound_enabled: bool,
    #[serde(default = "default_true")]
    pub(crate) fog_enabled: bool,
    #[serde(default)]
    pub(crate) panels: Panels,
    #[serde(default)]
    pub(crate) theme_check: TimeoutSlot,
}

impl AppState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_durations(DEFAULT_FOCUS_MIN, DEFAULT_BREAK_MIN, now)
    }

    /// Fresh state with configured durations (invalid ones fall back to 25/5).
    pub fn with_durations(focus_min: u32, break_min: u32, now: DateTime<Utc>) -> Self {
        Self {
            session: SessionEngine::new(focus_min, break_min),
            engagement: EngagementMonitor::default(),
            idle: IdleTracker::new(now),
            rewards: RewardLedger::default(),
            history: HistoryRecorder::default(),
            capy: Capy::default(),
            chat: CapyChat::default(),
            music: MusicState::default(),
            theme: Theme::default(),
            auto_theme: true,
            sound_enabled: true,
            fog_enabled: true,
            panels: Panels::default(),
            theme_check: TimeoutSlot::default(),
        }
    }

    pub fn session(&self) -> &SessionEngine {
        &self.session
    }

    pub fn engagement(&self) -> &EngagementMonitor {
        &self.engagement
    }

    pub fn idle(&self) -> &IdleTracker {
        &self.idle
    }

    pub fn rewards(&self) -> &RewardLedger {
        &self.rewards
    }

    pub fn history(&self) -> &HistoryRecorder {
        &self.history
    }

    pub fn capy(&self) -> &Capy {
        &self.capy
    }

    pub fn chat(&self) -> &CapyChat {
        &self.chat
    }

    pub fn music(&self) -> &MusicState {
        &self.music
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn auto_theme(&self) -> bool {
        self.auto_theme
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn fog_enabled(&self) -> bool {
        self.fog_enabled
    }

    pub fn panels(&self) -> &Panels {
        &self.panels
    }
}

pub struct CapyFlow {
    state: AppState,
    tunables: Tunables,
    rng: Box<dyn RandomSource>,
    clock: Box<dyn Clock>,
}

impl CapyFlow {
    /// System clock and an entropy-seeded random source.
    pub fn new(state: AppState, tunables: Tunables) -> Self {
        Self::with_parts(
            state,
            tunables,
            Box::new(PcgRandom::from_entropy()),
            Box::new(SystemClock),
        )
    }

    pub fn with_parts(
        state: AppState,
        tunables: Tunables,
        rng: Box<dyn RandomSource>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            state,
            tunables,
            rng,
            clock,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    pub fn tunables(&self) -> Tunables {
        self.tunables
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        self.state.session.start(self.clock.now_utc()).into_iter().collect()
    }

    pub fn pause(&mut self) -> Vec<Event> {
        self.state.session.pause(self.clock.now_utc()).into_iter().collect()
    }

    pub fn resume(&mut self) -> Vec<Event> {
        self.state.session.resume(self.clock.now_utc()).into_iter().collect()
    }

    /// Space bar: start, pause or resume.
    pub fn toggle_timer(&mut self) -> Vec<Event> {
        self.state.session.toggle(self.clock.now_utc()).into_iter().collect()
    }

    /// Back to idle. Streak and line state are untouched.
    pub fn reset(&mut self) -> Vec<Event> {
        self.state.session.reset(self.clock.now_utc()).into_iter().collect()
    }

    pub fn set_session_type(&mut self, session_type: SessionType) -> Result<Event, ValidationError> {
        let at = self.clock.now_utc();
        self.state
            .session
            .set_session_type(session_type, at)
            .inspect_err(|e| warn!("{e}"))
    }

    pub fn set_focus_duration(&mut self, minutes: u32) -> Result<Event, ValidationError> {
        let at = self.clock.now_utc();
        self.state
            .session
            .set_focus_duration(minutes, at)
            .inspect_err(|e| warn!("{e}"))
    }

    pub fn set_break_duration(&mut self, minutes: u32) -> Result<Event, ValidationError> {
        let at = self.clock.now_utc();
        self.state
            .session
            .set_break_duration(minutes, at)
            .inspect_err(|e| warn!("{e}"))
    }

    pub fn set_durations(&mut self, focus_min: u32, break_min: u32) -> Result<Event, ValidationError> {
        let at = self.clock.now_utc();
        self.state
            .session
            .set_durations(focus_min, break_min, at)
            .inspect_err(|e| warn!("{e}"))
    }

    /// One wall-clock second.
    pub fn tick(&mut self) -> Vec<Event> {
        let now = self.clock.now();
        let at = now.with_timezone(&Utc);
        let mut events = Vec::new();

        if let Some(done) = self.state.session.tick() {
            events.extend(self.on_completion(done, now));
        }

        let focus_active = self.state.session.is_focus_active();
        if let Some(broke) = self
            .state
            .engagement
            .tick(focus_active, self.tunables.away_threshold_secs)
        {
            let streak_lost = self.state.rewards.break_streak();
            info!(away_secs = broke.away_secs, streak_lost, "streak lost to a broken line");
            events.push(Event::LineBroken {
                away_secs: broke.away_secs,
                streak_lost,
                at,
            });
        }

        events.extend(self.state.capy.poll(at));
        events.extend(self.state.chat.poll(at));

        if !self.state.session.is_active()
            && !self.state.capy.is_sleeping()
            && self.state.idle.is_idle(at, self.tunables.idle_timeout_secs)
        {
            events.extend(self.state.capy.sleep());
        }

        if self.state.auto_theme
            && (!self.state.theme_check.is_armed() || self.state.theme_check.fire_due(at))
        {
            events.extend(self.apply_auto_theme());
        }

        events
    }

    /// Replay `secs` missed ticks, e.g. after the process was not running.
    pub fn catch_up(&mut self, secs: u64) -> Vec<Event> {
        let secs = secs.min(MAX_CATCH_UP_SECS);
        if secs > 0 {
            debug!(secs, "catching up");
        }
        (0..secs).flat_map(|_| self.tick()).collect()
    }

    fn on_completion(&mut self, done: Completion, now: DateTime<FixedOffset>) -> Vec<Event> {
        let at = now.with_timezone(&Utc);
        let mut events = vec![Event::SessionCompleted {
            session_type: done.session_type,
            duration_min: done.duration_min,
            next: self.state.session.session_type(),
            at,
        }];
        if done.session_type != SessionType::Focus {
            return events;
        }

        let reward = self.state.rewards.on_focus_complete(
            &mut self.state.history,
            done.duration_min,
            self.rng.as_mut(),
            now,
        );
        events.push(Event::FishCaught { fish: reward.fish });
        events.push(Event::StreakIncreased {
            streak: reward.streak,
        });
        if let Some(accessory) = reward.accessory {
            let id = accessory.id.clone();
            events.push(Event::AccessoryUnlocked {
                accessory,
                streak: reward.streak,
            });
            events.push(Event::AccessoryEquipped { id: Some(id) });
        }
        events.push(Event::JournalWritten {
            entry: reward.journal_entry,
        });
        events.push(Event::HistoryRecorded {
            date: reward.history.date,
            count: reward.history.count,
            ecosystem_score: reward.history.ecosystem_score,
        });
        events
    }

    // ── Engagement ───────────────────────────────────────────────────

    pub fn set_tab_visible(&mut self, visible: bool) -> Vec<Event> {
        let focus_active = self.state.session.is_focus_active();
        let at = self.clock.now_utc();
        self.state
            .engagement
            .set_tab_visible(visible, focus_active, at)
            .into_iter()
            .collect()
    }

    /// Manual repair. The lost streak stays lost.
    pub fn repair_line(&mut self) -> Vec<Event> {
        self.state
            .engagement
            .repair_line(self.clock.now_utc())
            .into_iter()
            .collect()
    }

    /// Any input-device activity: wakes a sleeping capybara, otherwise
    /// just refreshes the interaction time.
    pub fn record_activity(&mut self) -> Vec<Event> {
        let at = self.clock.now_utc();
        self.state.idle.touch(at);
        self.state
            .capy
            .wake(at, self.tunables.wake_secs)
            .into_iter()
            .collect()
    }

    // ── Capybara ─────────────────────────────────────────────────────

    pub fn pet(&mut self) -> Vec<Event> {
        let at = self.clock.now_utc();
        self.state.idle.touch(at);
        self.state.capy.pet(at).into_iter().collect()
    }

    pub fn cast(&mut self) -> Vec<Event> {
        let at = self.clock.now_utc();
        let line_broken = self.state.engagement.is_line_broken();
        self.state.capy.start_casting(at, line_broken)
    }

    pub fn chat(&mut self, message: &str) -> Event {
        let at = self.clock.now_utc();
        self.state.chat.send(message, self.rng.as_mut(), at)
    }

    // ── Rewards ──────────────────────────────────────────────────────

    /// Equip an owned accessory, or `None` to take it off.
    pub fn equip(&mut self, id: Option<&str>) -> Result<Event, ValidationError> {
        self.state.rewards.equip(id).inspect_err(|e| warn!("{e}"))?;
        Ok(Event::AccessoryEquipped {
            id: id.map(str::to_string),
        })
    }

    pub fn dismiss_catch(&mut self) -> Option<Event> {
        self.state
            .rewards
            .dismiss_catch()
            .map(|fish| Event::CatchDismissed { fish })
    }

    pub fn heatmap(&self, days: usize) -> Vec<HeatmapDay> {
        self.state.history.history.heatmap(self.clock.today(), days)
    }

    pub fn history_summary(&self) -> HistorySummary {
        self.state.history.history.summary(self.clock.today())
    }

    // ── Scene ────────────────────────────────────────────────────────

    /// Manual theme choice. Auto theme, when on, may replace it at the
    /// next evaluation.
    pub fn set_theme(&mut self, theme: Theme) -> Option<Event> {
        if self.state.theme == theme {
            return None;
        }
        self.state.theme = theme;
        Some(self.theme_event())
    }

    /// Turning auto theme on evaluates it right away.
    pub fn toggle_auto_theme(&mut self) -> Vec<Event> {
        self.state.auto_theme = !self.state.auto_theme;
        self.state.theme_check.cancel();
        let mut events = vec![self.theme_event()];
        if self.state.auto_theme {
            events.extend(self.apply_auto_theme());
        }
        events
    }

    /// One auto-theme evaluation; re-arms the next check.
    pub fn apply_auto_theme(&mut self) -> Option<Event> {
        let at = self.clock.now_utc();
        self.state
            .theme_check
            .arm(at, Duration::seconds(THEME_CHECK_SECS));
        let theme = auto_theme(self.clock.hour(), self.rng.as_mut());
        if theme == self.state.theme {
            return None;
        }
        debug!(%theme, "auto theme");
        self.state.theme = theme;
        Some(self.theme_event())
    }

    fn theme_event(&self) -> Event {
        Event::ThemeChanged {
            theme: self.state.theme,
            auto_theme: self.state.auto_theme,
        }
    }

    pub fn music_query(&mut self, query: &str) -> Option<Event> {
        self.state.music.apply_mood_query(query)
    }

    /// Parse and load a pasted link. An invalid link changes nothing and
    /// is reported through the returned reference.
    pub fn load_music_link(&mut self, input: &str) -> (YouTubeRef, Option<Event>) {
        let reference = parse_youtube_url(input);
        let event = self.state.music.apply_reference(&reference);
        (reference, event)
    }

    pub fn set_volume(&mut self, volume: f64) -> Option<Event> {
        self.state.music.set_volume(volume)
    }

    pub fn toggle_mute(&mut self) -> Event {
        self.state.music.toggle_mute()
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.state.music.set_playing(playing);
    }

    pub fn toggle_sound(&mut self) -> Event {
        self.state.sound_enabled = !self.state.sound_enabled;
        Event::SettingToggled {
            setting: "sound".into(),
            enabled: self.state.sound_enabled,
        }
    }

    pub fn toggle_fog(&mut self) -> Event {
        self.state.fog_enabled = !self.state.fog_enabled;
        Event::SettingToggled {
            setting: "fog".into(),
            enabled: self.state.fog_enabled,
        }
    }

    pub fn toggle_panel(&mut self, panel: Panel) -> Event {
        let open = self.state.panels.toggle(panel);
        Event::PanelToggled { panel, open }
    }

    pub fn handle_shortcut(&mut self, shortcut: Shortcut) -> Vec<Event> {
        match shortcut {
            Shortcut::ToggleTimer => self.toggle_timer(),
            Shortcut::ToggleMute => vec![self.toggle_mute()],
            Shortcut::Cast => self.cast(),
            Shortcut::MoodPicker => vec![self.toggle_panel(Panel::MoodPicker)],
            Shortcut::Journal => vec![self.toggle_panel(Panel::Journal)],
            Shortcut::MiniMode => vec![self.toggle_panel(Panel::MiniMode)],
            Shortcut::Chat => vec![self.toggle_panel(Panel::Chat)],
            Shortcut::Escape => self.close_topmost(),
        }
    }

    /// Esc: fish modal, then mood picker, journal, chat.
    fn close_topmost(&mut self) -> Vec<Event> {
        if let Some(event) = self.dismiss_catch() {
            return vec![event];
        }
        match self.state.panels.topmost_closable() {
            Some(panel) => vec![self.toggle_panel(panel)],
            None => Vec::new(),
        }
    }

    pub fn snapshot(&self) -> Event {
        let s = &self.state;
        Event::StateSnapshot {
            state: s.session.state(),
            session_type: s.session.session_type(),
            remaining_secs: s.session.remaining_secs(),
            total_secs: s.session.total_secs(),
            progress_pct: s.session.progress() * 100.0,
            focus_duration_min: s.session.focus_duration_min(),
            break_duration_min: s.session.break_duration_min(),
            current_streak: s.rewards.current_streak(),
            fish_caught_count: s.rewards.fish_caught_count(),
            equipped_accessory: s.rewards.equipped_accessory().map(str::to_string),
            line_broken: s.engagement.is_line_broken(),
            tab_active: s.engagement.is_tab_active(),
            away_secs: s.engagement.away_secs(),
            mood: s.capy.mood(),
            casting: s.capy.is_casting(),
            theme: s.theme,
            ecosystem_score: s.history.ecosystem_score,
            at: self.clock.now_utc(),
        }
    }
}
