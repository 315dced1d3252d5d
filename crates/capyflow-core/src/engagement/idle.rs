//! Input-idle detection. Purely cosmetic: it only puts the capybara to sleep.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const IDLE_TIMEOUT_SECS: u64 = 5 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleTracker {
    last_input_at: DateTime<Utc>,
}

impl IdleTracker {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { last_input_at: now }
    }

    pub fn last_input_at(&self) -> DateTime<Utc> {
        self.last_input_at
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_input_at = now;
    }

    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_input_at
    }

    pub fn is_idle(&self, now: DateTime<Utc>, timeout_secs: u64) -> bool {
        self.idle_for(now) >= Duration::seconds(timeout_secs as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_after_timeout() {
        let start = Utc::now();
        let mut t = IdleTracker::new(start);
        assert!(!t.is_idle(start + Duration::seconds(299), IDLE_TIMEOUT_SECS));
        assert!(t.is_idle(start + Duration::seconds(300), IDLE_TIMEOUT_SECS));
        t.touch(start + Duration::seconds(300));
        assert!(!t.is_idle(start + Duration::seconds(301), IDLE_TIMEOUT_SECS));
    }
}
