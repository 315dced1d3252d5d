//! User-presence tracking: tab visibility (line break) and input idleness.

mod idle;
mod monitor;

pub use idle::{IdleTracker, IDLE_TIMEOUT_SECS};
pub use monitor::{EngagementMonitor, LineBreak, AWAY_THRESHOLD_SECS};
