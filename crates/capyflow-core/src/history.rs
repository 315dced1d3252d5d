//! Per-day focus counts and the weekly ecosystem score.
//!
//! Days are local calendar dates. The score looks at the trailing seven days
//! ending at the date the caller passes in (wall-clock "today" at compute time).

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sessions per week that earn a full score (4 a day).
pub const WEEKLY_TARGET: u32 = 28;
/// Days in the scoring window, today included.
pub const SCORE_WINDOW_DAYS: i64 = 7;
/// Days shown in the heatmap (12 weeks).
pub const HEATMAP_DAYS: usize = 84;
/// Score before the first completion.
pub const INITIAL_ECOSYSTEM_SCORE: u8 = 50;

/// Date -> completed focus sessions that day. Never decremented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FocusHistory {
    days: BTreeMap<NaiveDate, u32>,
}

impl FocusHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.days.get(&date).copied().unwrap_or(0)
    }

    /// Add one session to `date`, returning that day's new count.
    pub fn increment(&mut self, date: NaiveDate) -> u32 {
        let count = self.days.entry(date).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &u32)> {
        self.days.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Sum of sessions from `today - 6` through `today`.
    pub fn week_total(&self, today: NaiveDate) -> u32 {
        let start = today - Duration::days(SCORE_WINDOW_DAYS - 1);
        self.days
            .range(start..=today)
            .map(|(_, count)| *count)
            .fold(0u32, |acc, c| acc.saturating_add(c))
    }

    /// `min(100, round(week_total / 28 * 100))`.
    pub fn ecosystem_score(&self, today: NaiveDate) -> u8 {
        let pct = (self.week_total(today) as f64 / WEEKLY_TARGET as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }

    /// The last `days` dates ending today, oldest first.
    pub fn heatmap(&self, today: NaiveDate, days: usize) -> Vec<HeatmapDay> {
        (0..days as i64)
            .rev()
            .map(|back| {
                let date = today - Duration::days(back);
                let count = self.count_on(date);
                HeatmapDay {
                    date,
                    count,
                    level: HeatLevel::from_count(count),
                }
            })
            .collect()
    }

    /// The day with the most sessions; the earliest such day on a tie.
    pub fn best_day(&self) -> Option<BestDay> {
        self.days
            .iter()
            .fold(None, |best: Option<BestDay>, (date, count)| match best {
                Some(b) if b.count >= *count => Some(b),
                _ => Some(BestDay {
                    date: *date,
                    count: *count,
                }),
            })
    }

    pub fn summary(&self, today: NaiveDate) -> HistorySummary {
        HistorySummary {
            total_sessions: self.days.values().fold(0u32, |acc, c| acc.saturating_add(*c)),
            active_days: self.days.len(),
            best_day: self.best_day(),
            this_week: self.week_total(today),
            ecosystem_score: self.ecosystem_score(today),
        }
    }
}

/// Heatmap cell intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatLevel {
    None,
    Light,
    Medium,
    Deep,
}

impl HeatLevel {
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => HeatLevel::None,
            1 => HeatLevel::Light,
            2 => HeatLevel::Medium,
            _ => HeatLevel::Deep,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    pub count: u32,
    pub level: HeatLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestDay {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_sessions: u32,
    pub active_days: usize,
    pub best_day: Option<BestDay>,
    pub this_week: u32,
    pub ecosystem_score: u8,
}

/// Result of recording one completed focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryUpdate {
    pub date: NaiveDate,
    pub count: u32,
    pub ecosystem_score: u8,
}

/// Owns the history map and the last computed score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecorder {
    #[serde(default)]
    pub history: FocusHistory,
    #[serde(default = "default_score")]
    pub ecosystem_score: u8,
}

fn default_score() -> u8 {
    INITIAL_ECOSYSTEM_SCORE
}

impl Default for HistoryRecorder {
    fn default() -> Self {
        Self {
            history: FocusHistory::default(),
            ecosystem_score: INITIAL_ECOSYSTEM_SCORE,
        }
    }
}

impl HistoryRecorder {
    /// Count one session for `today` and recompute the score from the whole map.
    pub fn record_session(&mut self, today: NaiveDate) -> HistoryUpdate {
        let count = self.history.increment(today);
        self.ecosystem_score = self.history.ecosystem_score(today);
        debug!(%today, count, score = self.ecosystem_score, "focus session recorded");
        HistoryUpdate {
            date: today,
            count,
            ecosystem_score: self.ecosystem_score,
        }
    }
}
