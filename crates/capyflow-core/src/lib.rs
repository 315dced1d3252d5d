//! # CapyFlow Core Library
//!
//! This library provides the core logic for CapyFlow, a gamified focus timer
//! with a capybara companion. Every rule lives here; front ends (the
//! `capyflow` CLI) only feed it input events and a 1 Hz tick and render the
//! [`Event`]s it returns.
//!
//! ## Architecture
//!
//! - **Session engine**: focus/break countdown with a single-flight completion
//! - **Engagement**: tab-away counter with the line-break penalty, input idleness
//! - **Rewards**: fish catches, streak, accessory unlocks, journal
//! - **History**: per-day focus counts and the weekly ecosystem score
//! - **Capy / music / theme / panels**: cosmetic state driven by the above
//! - **Storage**: SQLite kv blobs and TOML configuration
//!
//! ## Key Components
//!
//! - [`CapyFlow`]: owns [`AppState`] and exposes every transition
//! - [`SessionEngine`]: timer state machine
//! - [`Database`]: persisted state
//! - [`Config`]: application configuration management

pub mod app;
pub mod capy;
pub mod clock;
pub mod engagement;
pub mod error;
pub mod events;
pub mod history;
pub mod music;
pub mod panels;
pub mod random;
pub mod rewards;
pub mod storage;
pub mod theme;
pub mod timer;

pub use app::{AppState, CapyFlow, Tunables};
pub use capy::{CapyMood, ChatTopic};
pub use clock::{Clock, FixedClock, SystemClock, TimeoutSlot};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use history::{BestDay, FocusHistory, HeatLevel, HeatmapDay, HistorySummary};
pub use music::YouTubeRef;
pub use panels::{Panel, Shortcut};
pub use random::{PcgRandom, RandomSource};
pub use rewards::{Accessory, Fish, JournalEntry, Rarity};
pub use storage::{Config, Database};
pub use theme::Theme;
pub use timer::{SessionEngine, SessionType, TimerState};
