//! Tab-visibility watcher and the line-break penalty.
//!
//! The caller's 1 Hz driver calls [`EngagementMonitor::tick`] every second.
//! Away time accrues only while the tab is hidden, a focus session is active
//! and the line is intact, whatever order those conditions came about in.
//! Once the hidden stretch reaches the threshold the line breaks; only
//! [`EngagementMonitor::repair_line`] clears it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::events::Event;

pub const AWAY_THRESHOLD_SECS: u32 = 30;

/// The line just broke after `away_secs` hidden seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBreak {
    pub away_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementMonitor {
    tab_active: bool,
    away_secs: u32,
    line_broken: bool,
}

impl Default for EngagementMonitor {
    fn default() -> Self {
        Self {
            tab_active: true,
            away_secs: 0,
            line_broken: false,
        }
    }
}

impl EngagementMonitor {
    pub fn is_tab_active(&self) -> bool {
        self.tab_active
    }

    pub fn away_secs(&self) -> u32 {
        self.away_secs
    }

    pub fn is_line_broken(&self) -> bool {
        self.line_broken
    }

    /// Whether the next tick adds an away second.
    pub fn is_tracking_away(&self, focus_active: bool) -> bool {
        !self.tab_active && focus_active && !self.line_broken
    }

    /// Visibility edge. Repeated reports of the same visibility are ignored.
    pub fn set_tab_visible(
        &mut self,
        visible: bool,
        focus_active: bool,
        at: DateTime<Utc>,
    ) -> Option<Event> {
        if visible == self.tab_active {
            return None;
        }
        if visible {
            let away_secs = self.away_secs;
            self.tab_active = true;
            self.away_secs = 0;
            debug!(away_secs, "tab visible");
            Some(Event::TabVisible { away_secs, at })
        } else {
            self.tab_active = false;
            let tracking_away = self.is_tracking_away(focus_active);
            debug!(tracking = tracking_away, "tab hidden");
            Some(Event::TabHidden { tracking_away, at })
        }
    }

    /// One second of the away counter. The counter holds its value while
    /// no focus session is active and resumes when one starts again.
    pub fn tick(&mut self, focus_active: bool, threshold_secs: u32) -> Option<LineBreak> {
        if !self.is_tracking_away(focus_active) {
            return None;
        }
        self.away_secs = self.away_secs.saturating_add(1);
        if self.away_secs >= threshold_secs {
            self.line_broken = true;
            info!(away_secs = self.away_secs, "line broken");
            return Some(LineBreak {
                away_secs: self.away_secs,
            });
        }
        None
    }

    pub fn repair_line(&mut self, at: DateTime<Utc>) -> Option<Event> {
        if !self.line_broken {
            return None;
        }
        self.line_broken = false;
        info!("line repaired");
        Some(Event::LineRepaired { at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-17T02:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn hide_for(monitor: &mut EngagementMonitor, secs: u32, focus_active: bool) -> Option<LineBreak> {
        monitor.set_tab_visible(false, focus_active, t0());
        let mut broke = None;
        for _ in 0..secs {
            if let Some(b) = monitor.tick(focus_active, AWAY_THRESHOLD_SECS) {
                broke = Some(b);
            }
        }
        broke
    }

    #[test]
    fn breaks_at_thirty_seconds() {
        let mut m = EngagementMonitor::default();
        m.set_tab_visible(false, true, t0());
        for _ in 0..29 {
            assert!(m.tick(true, AWAY_THRESHOLD_SECS).is_none());
        }
        assert!(!m.is_line_broken());
        let broke = m.tick(true, AWAY_THRESHOLD_SECS).unwrap();
        assert_eq!(broke.away_secs, 30);
        assert!(m.is_line_broken());
        // Exactly once.
        assert!(m.tick(true, AWAY_THRESHOLD_SECS).is_none());
        assert_eq!(m.away_secs(), 30);
    }

    #[test]
    fn short_absence_is_forgiven() {
        let mut m = EngagementMonitor::default();
        assert!(hide_for(&mut m, 29, true).is_none());
        m.set_tab_visible(true, true, t0());
        assert_eq!(m.away_secs(), 0);
        assert!(hide_for(&mut m, 29, true).is_none());
        assert!(!m.is_line_broken());
    }

    #[test]
    fn no_tracking_without_focus() {
        let mut m = EngagementMonitor::default();
        assert!(hide_for(&mut m, 120, false).is_none());
        assert_eq!(m.away_secs(), 0);
        assert!(!m.is_line_broken());
    }

    #[test]
    fn counter_holds_outside_focus_and_resumes() {
        let mut m = EngagementMonitor::default();
        m.set_tab_visible(false, true, t0());
        for _ in 0..10 {
            m.tick(true, AWAY_THRESHOLD_SECS);
        }
        assert!(m.tick(false, AWAY_THRESHOLD_SECS).is_none());
        assert!(!m.is_tracking_away(false));
        for _ in 0..60 {
            m.tick(false, AWAY_THRESHOLD_SECS);
        }
        assert_eq!(m.away_secs(), 10);

        // The next focus session, still hidden, picks the count back up.
        for _ in 0..19 {
            assert!(m.tick(true, AWAY_THRESHOLD_SECS).is_none());
        }
        assert_eq!(m.tick(true, AWAY_THRESHOLD_SECS).unwrap().away_secs, 30);
    }

    #[test]
    fn hidden_before_focus_starts_still_counts() {
        let mut m = EngagementMonitor::default();
        let hidden = m.set_tab_visible(false, false, t0()).unwrap();
        assert!(matches!(hidden, Event::TabHidden { tracking_away: false, .. }));
        assert!(m.is_tracking_away(true));
        let mut broke = None;
        for _ in 0..30 {
            broke = broke.or(m.tick(true, AWAY_THRESHOLD_SECS));
        }
        assert_eq!(broke, Some(LineBreak { away_secs: 30 }));
        assert!(m.is_line_broken());
    }

    #[test]
    fn events_carry_the_given_time() {
        let mut m = EngagementMonitor::default();
        match m.set_tab_visible(false, true, t0()) {
            Some(Event::TabHidden { at, tracking_away }) => {
                assert_eq!(at, t0());
                assert!(tracking_away);
            }
            other => panic!("expected TabHidden, got {other:?}"),
        }
    }

    #[test]
    fn repeated_visibility_is_ignored() {
        let mut m = EngagementMonitor::default();
        assert!(m.set_tab_visible(true, true, t0()).is_none());
        assert!(m.set_tab_visible(false, true, t0()).is_some());
        assert!(m.set_tab_visible(false, true, t0()).is_none());
    }

    #[test]
    fn repair_is_manual_only() {
        let mut m = EngagementMonitor::default();
        hide_for(&mut m, 30, true);
        m.set_tab_visible(true, true, t0());
        assert!(m.is_line_broken());
        assert!(m.repair_line(t0()).is_some());
        assert!(!m.is_line_broken());
        assert!(m.repair_line(t0()).is_none());
    }

    #[test]
    fn hidden_while_broken_does_not_track() {
        let mut m = EngagementMonitor::default();
        hide_for(&mut m, 30, true);
        m.set_tab_visible(true, true, t0());
        m.set_tab_visible(false, true, t0());
        assert!(!m.is_tracking_away(true));
    }
}
