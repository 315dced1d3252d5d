use std::time::Duration;

use clap::Subcommand;
use capyflow_core::timer::DURATION_PRESETS;
use capyflow_core::SessionType;
use tokio::time::MissedTickBehavior;

use crate::session::{emit, print_json, with_session, Session};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the current session
    Start,
    /// Pause a running session
    Pause,
    /// Resume a paused session
    Resume,
    /// Start, pause or resume depending on the current state
    Toggle,
    /// Abandon the countdown and refill it
    Reset,
    /// Print the full state snapshot as JSON
    Status,
    /// Switch between focus and break
    Type {
        /// "focus" or "break"
        session_type: SessionType,
    },
    /// Set session lengths in minutes
    Duration {
        /// Focus length (1-180)
        #[arg(long)]
        focus: Option<u32>,
        /// Break length (1-180)
        #[arg(long = "break")]
        break_min: Option<u32>,
    },
    /// Apply one of the preset pairs: 25/5, 50/10, 90/20
    Preset {
        /// Focus minutes of the preset
        focus: u32,
    },
    /// Keep ticking once per second, printing events as they happen
    Watch {
        /// Stop after this many seconds instead of when the session ends
        #[arg(long)]
        secs: Option<u64>,
    },
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    if let TimerAction::Watch { secs } = action {
        return watch(secs);
    }
    with_session(|session| {
        let flow = session.flow();
        let events = match action {
            TimerAction::Start => flow.start(),
            TimerAction::Pause => flow.pause(),
            TimerAction::Resume => flow.resume(),
            TimerAction::Toggle => flow.toggle_timer(),
            TimerAction::Reset => flow.reset(),
            TimerAction::Status => {
                print_json(&flow.snapshot())?;
                Vec::new()
            }
            TimerAction::Type { session_type } => vec![flow.set_session_type(session_type)?],
            TimerAction::Duration { focus, break_min } => {
                let focus = focus.unwrap_or(flow.state().session().focus_duration_min());
                let break_min = break_min.unwrap_or(flow.state().session().break_duration_min());
                vec![flow.set_durations(focus, break_min)?]
            }
            TimerAction::Preset { focus } => {
                let (focus, break_min) = DURATION_PRESETS
                    .iter()
                    .copied()
                    .find(|(f, _)| *f == focus)
                    .ok_or_else(|| format!("no preset with {focus} focus minutes"))?;
                vec![flow.set_durations(focus, break_min)?]
            }
            TimerAction::Watch { .. } => Vec::new(),
        };
        Ok(events)
    })
}

fn watch(limit_secs: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(async {
        let mut session = Session::open()?;
        emit(&session.touch())?;
        session.save();
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;

        let mut watched = 0u64;
        loop {
            interval.tick().await;
            watched += 1;
            // Other invocations may have changed the state meanwhile.
            session.reload()?;
            emit(&session.sync())?;
            session.save();

            let done = match limit_secs {
                Some(limit) => watched >= limit,
                None => !session.state().session().is_active(),
            };
            if done {
                break;
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
