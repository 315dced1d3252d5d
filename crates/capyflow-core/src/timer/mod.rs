mod engine;

pub use engine::{
    Completion, SessionEngine, SessionType, TimerState, DEFAULT_BREAK_MIN, DEFAULT_FOCUS_MIN,
    DURATION_PRESETS, MAX_DURATION_MIN,
};
