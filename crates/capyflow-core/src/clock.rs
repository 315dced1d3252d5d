//! Wall-clock seam and cancellable deadlines.
//!
//! Day bucketing uses the local calendar date of [`Clock::now`], so the clock
//! hands out times with their UTC offset attached.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;

    fn now_utc(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }

    /// Local calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Local hour of day, 0..24.
    fn hour(&self) -> u32 {
        self.now().hour()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Manually advanced clock for tests and replay.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    /// Parse an RFC 3339 timestamp, e.g. `2026-10-17T09:00:00+07:00`.
    pub fn at(rfc3339: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self::new(DateTime::parse_from_rfc3339(rfc3339)?))
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        self.now.set(now);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}

/// Armed deadline identified by a generation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeout {
    pub token: u64,
    pub due_at: DateTime<Utc>,
}

/// Holds at most one pending deadline.
///
/// Re-arming or cancelling bumps the token, so a callback carrying an old
/// token is a detectable no-op instead of a stale mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutSlot {
    pending: Option<Timeout>,
    generation: u64,
}

impl TimeoutSlot {
    pub fn arm(&mut self, now: DateTime<Utc>, after: Duration) -> u64 {
        self.generation += 1;
        self.pending = Some(Timeout {
            token: self.generation,
            due_at: now + after,
        });
        self.generation
    }

    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.generation += 1;
        }
    }

    pub fn pending(&self) -> Option<Timeout> {
        self.pending
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume the deadline if `token` is still current.
    pub fn fire(&mut self, token: u64) -> bool {
        match self.pending {
            Some(t) if t.token == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Consume the deadline if it is due at `now`.
    pub fn fire_due(&mut self, now: DateTime<Utc>) -> bool {
        match self.pending {
            Some(t) if t.due_at <= now => self.fire(t.token),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_local_date() {
        let clock = FixedClock::at("2026-10-17T23:30:00+07:00").unwrap();
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!(clock.hour(), 23);
        assert_eq!(clock.now_utc().date_naive(), NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        clock.advance(Duration::hours(1));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    }

    #[test]
    fn stale_token_is_noop() {
        let now = Utc::now();
        let mut slot = TimeoutSlot::default();
        let first = slot.arm(now, Duration::seconds(2));
        let second = slot.arm(now, Duration::seconds(2));
        assert!(!slot.fire(first));
        assert!(slot.is_armed());
        assert!(slot.fire(second));
        assert!(!slot.fire(second));
    }

    #[test]
    fn cancel_invalidates_token() {
        let now = Utc::now();
        let mut slot = TimeoutSlot::default();
        let token = slot.arm(now, Duration::seconds(1));
        slot.cancel();
        assert!(!slot.fire(token));
        assert!(slot.pending().is_none());
    }

    #[test]
    fn fire_due_respects_deadline() {
        let now = Utc::now();
        let mut slot = TimeoutSlot::default();
        slot.arm(now, Duration::seconds(2));
        assert!(!slot.fire_due(now + Duration::seconds(1)));
        assert!(slot.fire_due(now + Duration::seconds(2)));
        assert!(!slot.is_armed());
    }
}
