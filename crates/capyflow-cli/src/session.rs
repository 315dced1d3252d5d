//! Loading, advancing and saving the app state around one CLI command.
//!
//! Each invocation restores the state, replays the seconds that passed since
//! the previous invocation, applies the command, prints the resulting events
//! as JSON lines and writes the state back.

use std::error::Error;

use capyflow_core::storage::{load_state, save_state};
use capyflow_core::{AppState, CapyFlow, Config, Database, Event};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

/// Wall-clock milliseconds up to which the stored state has been ticked.
const DRIVEN_UNTIL_KEY: &str = "capyflow-driven-until";

pub struct Session {
    db: Database,
    config: Config,
    flow: CapyFlow,
    driven_until_ms: i64,
}

impl Session {
    /// Open the store and catch up on missed ticks. The catch-up events are
    /// printed right away so completions that happened in between are not lost.
    pub fn open() -> Result<Self, Box<dyn Error>> {
        let config = Config::load_or_default();
        let db = Database::open()?;
        let (state, driven_until_ms) = read_stored(&db, &config)?;
        let mut session = Self {
            flow: CapyFlow::new(state, config.tunables()),
            db,
            config,
            driven_until_ms,
        };
        let events = session.sync();
        emit(&events)?;
        Ok(session)
    }

    /// Pick up whatever other invocations saved since this session last
    /// loaded or saved. Long-running drivers call this before every tick.
    pub fn reload(&mut self) -> Result<(), Box<dyn Error>> {
        let (state, driven_until_ms) = read_stored(&self.db, &self.config)?;
        self.flow = CapyFlow::new(state, self.config.tunables());
        self.driven_until_ms = driven_until_ms;
        Ok(())
    }

    pub fn flow(&mut self) -> &mut CapyFlow {
        &mut self.flow
    }

    pub fn state(&self) -> &AppState {
        self.flow.state()
    }

    /// Tick once per whole second elapsed since the last sync. Leftover
    /// milliseconds carry over to the next call.
    pub fn sync(&mut self) -> Vec<Event> {
        let now_ms = Utc::now().timestamp_millis();
        let elapsed_ms = now_ms - self.driven_until_ms;
        if elapsed_ms < 0 {
            warn!(elapsed_ms, "clock went backwards; not catching up");
            self.driven_until_ms = now_ms;
            return Vec::new();
        }
        let secs = elapsed_ms / 1000;
        self.driven_until_ms += secs * 1000;
        self.flow.catch_up(secs as u64)
    }

    /// The command itself counts as user input.
    pub fn touch(&mut self) -> Vec<Event> {
        self.flow.record_activity()
    }

    /// Persist state and the driver position, then release the write lock.
    pub fn save(&self) {
        save_state(&self.db, self.flow.state());
        if let Err(e) = self
            .db
            .kv_set(DRIVEN_UNTIL_KEY, &self.driven_until_ms.to_string())
        {
            warn!("failed to save driver position: {e}");
        }
        if let Err(e) = self.db.commit() {
            warn!("failed to commit state: {e}");
        }
        debug!(driven_until_ms = self.driven_until_ms, "state saved");
    }
}

/// Load under the write lock; [`Session::save`] releases it.
fn read_stored(db: &Database, config: &Config) -> Result<(AppState, i64), Box<dyn Error>> {
    db.begin_write()?;
    let now = Utc::now();
    let state = load_state(
        db,
        config.defaults.focus_duration,
        config.defaults.break_duration,
        now,
    );
    let driven_until_ms = db
        .kv_get(DRIVEN_UNTIL_KEY)?
        .and_then(|raw| raw.parse::<i64>().ok())
        .unwrap_or_else(|| now.timestamp_millis());
    Ok((state, driven_until_ms))
}

/// Open a session, run `f` with it and save. Events returned by `f` are
/// printed one JSON object per line.
pub fn with_session<F>(f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut Session) -> Result<Vec<Event>, Box<dyn Error>>,
{
    let mut session = Session::open()?;
    let woke = session.touch();
    emit(&woke)?;
    let result = f(&mut session);
    session.save();
    emit(&result?)?;
    Ok(())
}

pub fn emit(events: &[Event]) -> Result<(), serde_json::Error> {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}

/// Query output, pretty printed like the rest of the CLI's reports.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
